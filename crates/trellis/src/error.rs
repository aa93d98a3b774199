//! Error types for Trellis operations.
//!
//! [`LayoutError`] covers the fatal conditions of the layout pipeline itself;
//! [`TrellisError`] wraps it together with the failures of the surrounding
//! document and configuration handling.

use std::io;

use thiserror::Error;

use trellis_core::identifier::Id;

/// Fatal layout failures. No partial layout is produced when one is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("cannot lay out an empty roadmap")]
    EmptyInput,

    #[error("node `{id}` is defined more than once")]
    DuplicateNode { id: Id },

    #[error("spine contains a cycle through node `{node}`")]
    CyclicSpine { node: Id },

    #[error("spine engine failed: {0}")]
    Engine(String),

    #[error("invalid layout configuration: {0}")]
    Config(String),
}

/// The main error type for Trellis operations.
///
/// The `Document` variant keeps the JSON text it failed on, so callers can
/// point at the offending line and column.
#[derive(Debug, Error)]
pub enum TrellisError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid roadmap document: {err}")]
    Document { err: serde_json::Error, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
}

impl TrellisError {
    /// Create a new `Document` error with the associated JSON text.
    pub fn new_document_error(err: serde_json::Error, src: impl Into<String>) -> Self {
        Self::Document {
            err,
            src: src.into(),
        }
    }
}

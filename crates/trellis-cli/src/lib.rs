//! CLI logic for the Trellis roadmap layout tool.
//!
//! Reads a roadmap document, lays it out and writes the positioned document
//! back as JSON.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{fs, io};

use log::{info, warn};

use trellis::{
    LayoutBuilder, TrellisError,
    document::{RoadmapDocument, strip_code_fence},
};

/// Run the Trellis CLI application
///
/// This function lays out the roadmap document at `args.input` and writes
/// the result to `args.output`.
///
/// # Errors
///
/// Returns `TrellisError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed roadmap documents
/// - Layout errors
pub fn run(args: &Args) -> Result<(), TrellisError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing roadmap"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;
    let body = strip_code_fence(&source);
    let mut document = RoadmapDocument::from_json(body)
        .map_err(|err| TrellisError::new_document_error(err, body))?;

    let builder = LayoutBuilder::new(app_config);
    let diagnostics = builder.layout_document(&mut document)?;
    if !diagnostics.is_empty() {
        warn!(count = diagnostics.len(); "Roadmap laid out with diagnostics");
    }

    let json = document.to_json_pretty().map_err(io::Error::from)?;
    fs::write(&args.output, json)?;

    info!(output_file = args.output; "Roadmap exported successfully");

    Ok(())
}

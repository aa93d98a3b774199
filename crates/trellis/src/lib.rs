//! Trellis - deterministic layout for spine-and-rib roadmaps.
//!
//! A roadmap is a directed graph whose main sequence of topics (the spine)
//! runs top to bottom, with sub-topics (ribs) branching left and right of
//! their spine parent. Trellis assigns every node a non-overlapping position
//! and annotates every edge with connection handles, a line style and an
//! arrow flag.
//!
//! # Examples
//!
//! ```
//! use trellis::element::{LayoutEdge, LayoutNode};
//!
//! let nodes = vec![
//!     LayoutNode::spine("basics"),
//!     LayoutNode::spine("ownership"),
//!     LayoutNode::rib("borrowing"),
//! ];
//! let edges = vec![
//!     LayoutEdge::new("e1", "basics", "ownership"),
//!     LayoutEdge::new("e2", "ownership", "borrowing"),
//! ];
//!
//! let layout = trellis::layout(nodes, edges).expect("valid roadmap");
//! let basics = layout.node("basics").unwrap().position();
//! let ownership = layout.node("ownership").unwrap().position();
//! assert!(basics.y() < ownership.y());
//! ```

pub mod config;
pub mod document;
pub mod layout;

mod error;

pub use trellis_core::{element, geometry, identifier};

pub use error::{LayoutError, TrellisError};
pub use layout::{Diagnostic, Layout};

use log::{debug, info};

use config::AppConfig;
use document::RoadmapDocument;
use element::{LayoutEdge, LayoutNode};

/// Lays out a roadmap with the default configuration.
///
/// # Errors
///
/// Returns a [`LayoutError`] for empty input, duplicate node ids, a cyclic
/// spine or a failing spine engine.
pub fn layout(nodes: Vec<LayoutNode>, edges: Vec<LayoutEdge>) -> Result<Layout, LayoutError> {
    LayoutBuilder::default().layout(nodes, edges)
}

/// Builder for laying out roadmaps with a given configuration.
///
/// # Examples
///
/// ```
/// use trellis::{LayoutBuilder, config::AppConfig, document::RoadmapDocument};
///
/// let mut document = RoadmapDocument::from_json(r#"{
///     "nodes": [{ "id": "a" }, { "id": "b", "data": { "isBranch": true } }],
///     "edges": [{ "source": "a", "target": "b" }]
/// }"#).expect("valid JSON");
///
/// let builder = LayoutBuilder::new(AppConfig::default());
/// let diagnostics = builder.layout_document(&mut document).expect("layout");
/// assert!(diagnostics.is_empty());
/// assert_eq!(document.nodes[1].position.x(), 450.0);
/// ```
#[derive(Default)]
pub struct LayoutBuilder {
    config: AppConfig,
}

impl LayoutBuilder {
    /// Create a new layout builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Lays out `nodes` and `edges`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Config`] when the configuration is invalid and
    /// any other [`LayoutError`] raised by the pipeline.
    pub fn layout(
        &self,
        nodes: Vec<LayoutNode>,
        edges: Vec<LayoutEdge>,
    ) -> Result<Layout, LayoutError> {
        self.config.validate().map_err(LayoutError::Config)?;
        layout::Pipeline::new(&self.config).run(nodes, edges)
    }

    /// Sanitizes, lays out and updates a roadmap document in place.
    ///
    /// Returns the diagnostics raised while laying it out.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] when the document cannot be laid out; the
    /// document is left sanitized but otherwise unchanged.
    pub fn layout_document(
        &self,
        document: &mut RoadmapDocument,
    ) -> Result<Vec<Diagnostic>, LayoutError> {
        info!(
            nodes = document.nodes.len(),
            edges = document.edges.len();
            "Laying out roadmap document"
        );
        document.sanitize();

        let (nodes, edges) = document.to_layout_input();
        let layout = self.layout(nodes, edges)?;
        document.apply_layout(&layout);

        debug!("Document updated with layout");
        let (_, _, diagnostics) = layout.into_parts();
        Ok(diagnostics)
    }
}

//! The roadmap layout pipeline.
//!
//! Stages run strictly in order and never call back into an earlier stage:
//!
//! 1. classification into spine and ribs ([`Classification`]);
//! 2. spine ranking by a pluggable [`SpineRanker`];
//! 3. rib extents per spine node ([`ParentExtent`]);
//! 4. spine compaction;
//! 5. rib placement;
//! 6. collision resolution;
//! 7. edge routing ([`route_edges`]).
//!
//! [`Pipeline`] drives the stages; [`Layout`] is the result.

mod classify;
mod collision;
mod compact;
mod diagnostic;
mod engines;
mod extent;
mod graph;
mod ribs;
mod routing;

pub use classify::Classification;
pub use diagnostic::Diagnostic;
pub use engines::{EngineBuilder, SpineGraph, SpineRanker};
pub use extent::{ParentExtent, RibStack};
pub use graph::{LayoutGraph, NodeIndex};
pub use routing::route_edges;

use log::{debug, info};

use trellis_core::{
    element::{LayoutEdge, LayoutNode},
    geometry::{Bounds, Size},
};

use crate::{
    config::AppConfig,
    error::LayoutError,
    layout::{diagnostic::Diagnostics, ribs::RibSpacing},
};

/// Positioned nodes, routed edges and the diagnostics raised on the way.
///
/// Nodes and edges are returned in input order.
#[derive(Debug, Clone)]
pub struct Layout {
    nodes: Vec<LayoutNode>,
    edges: Vec<LayoutEdge>,
    diagnostics: Vec<Diagnostic>,
    node_size: Size,
}

impl Layout {
    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[LayoutEdge] {
        &self.edges
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    /// Looks up the first edge with the given id.
    pub fn edge(&self, id: &str) -> Option<&LayoutEdge> {
        self.edges.iter().find(|edge| edge.id() == id)
    }

    /// Box size shared by every node.
    pub fn node_size(&self) -> Size {
        self.node_size
    }

    /// Smallest box containing every node.
    pub fn bounds(&self) -> Option<Bounds> {
        self.nodes
            .iter()
            .map(|node| node.position().to_bounds(self.node_size))
            .reduce(|acc, bounds| acc.merge(&bounds))
    }

    pub fn into_parts(self) -> (Vec<LayoutNode>, Vec<LayoutEdge>, Vec<Diagnostic>) {
        (self.nodes, self.edges, self.diagnostics)
    }
}

/// Runs every stage of the pipeline with one configuration.
pub struct Pipeline<'a> {
    config: &'a AppConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self { config }
    }

    /// Lays out `nodes` and `edges`.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] for empty input, duplicate node ids, a
    /// cyclic spine or a failing spine engine.
    pub fn run(
        &self,
        nodes: Vec<LayoutNode>,
        edges: Vec<LayoutEdge>,
    ) -> Result<Layout, LayoutError> {
        let layout_config = self.config.layout();
        let node_size = layout_config.node_size();

        info!(
            nodes = nodes.len(),
            edges = edges.len(),
            engine:% = layout_config.spine_engine();
            "Laying out roadmap"
        );

        let mut graph = LayoutGraph::new(nodes, edges, node_size)?;
        let mut diagnostics = Diagnostics::default();

        let classification = classify::classify(&graph, &mut diagnostics);

        let spine = SpineGraph::new(&graph, &classification);
        let mut engines = EngineBuilder::new()
            .with_node_size(node_size)
            .with_node_separation(layout_config.node_separation())
            .with_rank_separation(layout_config.rank_separation());
        engines::rank_spine(
            engines.engine(layout_config.spine_engine()),
            &spine,
            &mut graph,
        )?;

        let extents = extent::compute_extents(
            &graph,
            &classification,
            layout_config.rib_vertical_spacing(),
        );
        compact::compact_spine(&mut graph, &extents, layout_config.min_gap());

        ribs::place_ribs(
            &mut graph,
            &classification,
            RibSpacing {
                horizontal: layout_config.rib_horizontal_spacing(),
                vertical: layout_config.rib_vertical_spacing(),
            },
            &mut diagnostics,
        );

        let passes = collision::resolve_collisions(
            &mut graph,
            &classification.visit_order(),
            self.config.collision(),
            &mut diagnostics,
        );
        debug!(passes = passes; "Collisions resolved");

        let (nodes, mut edges) = graph.into_parts();
        route_edges(&nodes, &mut edges);

        info!(diagnostics = diagnostics.len(); "Roadmap laid out");
        Ok(Layout {
            nodes,
            edges,
            diagnostics: diagnostics.into_vec(),
            node_size,
        })
    }
}

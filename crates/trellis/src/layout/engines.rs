//! Spine ranking engines.
//!
//! The spine ranker is the one pluggable stage of the pipeline. Each engine
//! receives the spine subgraph and returns the centre of every spine node;
//! [`rank_spine`] turns those centres into normalised top-left positions.
//!
//! Engines are created and cached by [`EngineBuilder`], keyed by
//! [`SpineEngine`].

mod layered;
mod sugiyama;

use std::collections::HashMap;

use log::{debug, trace};
use petgraph::{
    algo::toposort,
    graph::{DiGraph, NodeIndex as PetIndex},
};

use trellis_core::{
    geometry::{Point, Size},
    identifier::Id,
};

use crate::{
    config::SpineEngine,
    error::LayoutError,
    layout::{
        classify::Classification,
        graph::{LayoutGraph, NodeIndex},
    },
};

/// The spine subgraph handed to a [`SpineRanker`].
///
/// Node `i` of the inner petgraph graph is the `i`-th spine node in input
/// order, so engines can report positions as a plain vector.
#[derive(Debug, Clone)]
pub struct SpineGraph {
    graph: DiGraph<Id, ()>,
    members: Vec<NodeIndex>,
}

impl SpineGraph {
    /// Extracts the spine nodes and spine-to-spine edges.
    pub fn new(layout_graph: &LayoutGraph, classification: &Classification) -> Self {
        let mut graph = DiGraph::with_capacity(
            classification.spine().len(),
            classification.spine_edges().len(),
        );
        let mut local = HashMap::with_capacity(classification.spine().len());

        for &member in classification.spine() {
            let pet = graph.add_node(layout_graph.node(member).id());
            local.insert(member, pet);
        }
        for (source, target) in classification.spine_edges() {
            if let (Some(&source), Some(&target)) = (local.get(source), local.get(target)) {
                graph.add_edge(source, target, ());
            }
        }

        Self {
            graph,
            members: classification.spine().to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The petgraph view of the spine, indexed by spine position.
    pub fn graph(&self) -> &DiGraph<Id, ()> {
        &self.graph
    }

    /// Arena index of the spine node at petgraph index `node`.
    pub fn member(&self, node: PetIndex) -> NodeIndex {
        self.members[node.index()]
    }

    /// Spine positions in topological order.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::CyclicSpine`] naming a node on a cycle. Self
    /// loops count as cycles.
    pub fn topological_order(&self) -> Result<Vec<PetIndex>, LayoutError> {
        toposort(&self.graph, None).map_err(|cycle| LayoutError::CyclicSpine {
            node: self.graph[cycle.node_id()],
        })
    }
}

/// A strategy for ranking the spine top to bottom.
pub trait SpineRanker {
    /// Computes the centre of every spine node, indexed by spine position.
    ///
    /// The graph is known to be acyclic when this is called.
    fn layer_dag(&self, spine: &SpineGraph) -> Result<Vec<Point>, LayoutError>;
}

/// Builder for creating and configuring spine engines.
///
/// Engines are created lazily and reused for repeated lookups.
pub struct EngineBuilder {
    engines: HashMap<SpineEngine, Box<dyn SpineRanker>>,

    node_size: Size,
    node_separation: f64,
    rank_separation: f64,
}

impl EngineBuilder {
    /// Create a new engine builder with the default box size and spacing.
    pub fn new() -> Self {
        Self {
            engines: HashMap::new(),
            node_size: Size::new(300.0, 150.0),
            node_separation: 80.0,
            rank_separation: 150.0,
        }
    }

    /// Set the uniform node box size
    pub fn with_node_size(mut self, size: Size) -> Self {
        self.node_size = size;
        self
    }

    /// Set the horizontal gap between nodes of one rank
    pub fn with_node_separation(mut self, separation: f64) -> Self {
        self.node_separation = separation;
        self
    }

    /// Set the vertical gap between ranks
    pub fn with_rank_separation(mut self, separation: f64) -> Self {
        self.rank_separation = separation;
        self
    }

    /// Get an engine of the specified type with configured options
    pub fn engine(&mut self, engine_type: SpineEngine) -> &dyn SpineRanker {
        let engine = self.engines.entry(engine_type).or_insert_with(|| {
            let engine: Box<dyn SpineRanker> = match engine_type {
                SpineEngine::Layered => {
                    let mut e = layered::Engine::new();
                    e.set_node_size(self.node_size)
                        .set_node_separation(self.node_separation)
                        .set_rank_separation(self.rank_separation);
                    Box::new(e)
                }
                SpineEngine::Sugiyama => {
                    let mut e = sugiyama::Engine::new();
                    e.set_node_size(self.node_size)
                        .set_node_separation(self.node_separation)
                        .set_rank_separation(self.rank_separation);
                    Box::new(e)
                }
            };
            engine
        });
        &**engine
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs `ranker` on the spine and writes top-left positions into the graph.
///
/// Cycles are rejected before the engine runs. The resulting positions are
/// shifted so the top-most and left-most spine boxes start at zero.
pub(crate) fn rank_spine(
    ranker: &dyn SpineRanker,
    spine: &SpineGraph,
    graph: &mut LayoutGraph,
) -> Result<(), LayoutError> {
    if spine.is_empty() {
        debug!("Spine is empty, nothing to rank");
        return Ok(());
    }

    spine.topological_order()?;

    let centres = ranker.layer_dag(spine)?;
    if centres.len() != spine.len() {
        return Err(LayoutError::Engine(format!(
            "engine positioned {} of {} spine nodes",
            centres.len(),
            spine.len()
        )));
    }

    let min_x = centres.iter().map(|c| c.x()).fold(f64::INFINITY, f64::min);
    let min_y = centres.iter().map(|c| c.y()).fold(f64::INFINITY, f64::min);
    let origin = Point::new(min_x, min_y);

    for (i, centre) in centres.into_iter().enumerate() {
        let member = spine.member(PetIndex::new(i));
        // Top-left of a box is `centre - half`; the half cancels against the origin shift.
        let position = centre.sub_point(origin);
        trace!(node:% = graph.node(member).id(), x = position.x(), y = position.y(); "Spine node ranked");
        graph.set_position(member, position);
    }

    debug!(nodes = spine.len(), edges = spine.edge_count(); "Spine ranked");
    Ok(())
}

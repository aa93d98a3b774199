//! Built-in layered spine engine.
//!
//! A deterministic variant of the classic layered drawing scheme:
//!
//! 1. Rank assignment by longest path, so every edge points downward.
//! 2. Crossing reduction with alternating barycenter sweeps.
//! 3. Coordinate assignment that centres each node under its predecessors
//!    while keeping `width + node_separation` between neighbours of a rank.
//!
//! A spine without internal edges is stacked vertically in input order.

use log::debug;
use petgraph::{Direction, graph::NodeIndex as PetIndex};

use trellis_core::geometry::{Point, Size};

use crate::{
    error::LayoutError,
    layout::engines::{SpineGraph, SpineRanker},
};

/// Number of down/up barycenter sweep pairs.
const SWEEPS: usize = 4;

/// The layered spine engine.
pub struct Engine {
    node_size: Size,
    node_separation: f64,
    rank_separation: f64,
}

impl Engine {
    /// Create a new layered engine with default spacing
    pub fn new() -> Self {
        Self {
            node_size: Size::new(300.0, 150.0),
            node_separation: 80.0,
            rank_separation: 150.0,
        }
    }

    /// Set the uniform node box size
    pub fn set_node_size(&mut self, size: Size) -> &mut Self {
        self.node_size = size;
        self
    }

    /// Set the horizontal gap between nodes of one rank
    pub fn set_node_separation(&mut self, separation: f64) -> &mut Self {
        self.node_separation = separation;
        self
    }

    /// Set the vertical gap between ranks
    pub fn set_rank_separation(&mut self, separation: f64) -> &mut Self {
        self.rank_separation = separation;
        self
    }

    fn rank_step(&self) -> f64 {
        self.node_size.height() + self.rank_separation
    }

    fn column_step(&self) -> f64 {
        self.node_size.width() + self.node_separation
    }

    /// Longest-path rank of every spine node.
    fn ranks(&self, spine: &SpineGraph) -> Result<Vec<usize>, LayoutError> {
        let graph = spine.graph();
        let mut ranks = vec![0; spine.len()];

        for node in spine.topological_order()? {
            let next = ranks[node.index()] + 1;
            for successor in graph.neighbors_directed(node, Direction::Outgoing) {
                let rank = &mut ranks[successor.index()];
                *rank = (*rank).max(next);
            }
        }

        Ok(ranks)
    }

    /// Groups nodes by rank, keeping input order inside each rank.
    fn layers(ranks: &[usize]) -> Vec<Vec<usize>> {
        let depth = ranks.iter().copied().max().map_or(0, |max| max + 1);
        let mut layers = vec![Vec::new(); depth];
        for (node, &rank) in ranks.iter().enumerate() {
            layers[rank].push(node);
        }
        layers
    }

    /// Reorders each layer by the mean order of its neighbours in the adjacent sweep direction.
    fn reduce_crossings(&self, spine: &SpineGraph, layers: &mut [Vec<usize>]) {
        let mut order = vec![0.0; spine.len()];
        for layer in layers.iter() {
            for (i, &node) in layer.iter().enumerate() {
                order[node] = i as f64;
            }
        }

        for _ in 0..SWEEPS {
            for layer in layers.iter_mut().skip(1) {
                Self::sort_by_barycenter(spine, layer, &mut order, Direction::Incoming);
            }
            let last = layers.len().saturating_sub(1);
            for layer in layers[..last].iter_mut().rev() {
                Self::sort_by_barycenter(spine, layer, &mut order, Direction::Outgoing);
            }
        }
    }

    fn sort_by_barycenter(
        spine: &SpineGraph,
        layer: &mut [usize],
        order: &mut [f64],
        direction: Direction,
    ) {
        let graph = spine.graph();
        let mut keyed: Vec<(usize, f64)> = layer
            .iter()
            .map(|&node| {
                let neighbours: Vec<f64> = graph
                    .neighbors_directed(PetIndex::new(node), direction)
                    .map(|neighbour| order[neighbour.index()])
                    .collect();
                let barycenter = if neighbours.is_empty() {
                    order[node]
                } else {
                    neighbours.iter().sum::<f64>() / neighbours.len() as f64
                };
                (node, barycenter)
            })
            .collect();

        // Stable sort: equal barycenters keep their current relative order.
        keyed.sort_by(|a, b| a.1.total_cmp(&b.1));

        for (i, (node, _)) in keyed.into_iter().enumerate() {
            layer[i] = node;
            order[node] = i as f64;
        }
    }

    /// Horizontal centre of every node; layers are processed top to bottom.
    fn columns(&self, spine: &SpineGraph, layers: &[Vec<usize>]) -> Vec<f64> {
        let graph = spine.graph();
        let separation = self.column_step();
        let mut x = vec![0.0; spine.len()];

        for layer in layers {
            let desired: Vec<Option<f64>> = layer
                .iter()
                .map(|&node| {
                    let parents: Vec<f64> = graph
                        .neighbors_directed(PetIndex::new(node), Direction::Incoming)
                        .map(|parent| x[parent.index()])
                        .collect();
                    (!parents.is_empty())
                        .then(|| parents.iter().sum::<f64>() / parents.len() as f64)
                })
                .collect();

            let mut placed: Vec<f64> = Vec::with_capacity(layer.len());
            for target in &desired {
                let column = match (placed.last(), target) {
                    (Some(&previous), Some(target)) => target.max(previous + separation),
                    (Some(&previous), None) => previous + separation,
                    (None, Some(target)) => *target,
                    (None, None) => 0.0,
                };
                placed.push(column);
            }

            // Shift the whole layer so it sits as close to its targets as possible.
            let offsets: Vec<f64> = desired
                .iter()
                .zip(&placed)
                .filter_map(|(target, x)| target.map(|target| target - x))
                .collect();
            let shift = if offsets.is_empty() {
                let first = placed.first().copied().unwrap_or_default();
                let last = placed.last().copied().unwrap_or_default();
                -(first + last) / 2.0
            } else {
                offsets.iter().sum::<f64>() / offsets.len() as f64
            };

            for (&node, column) in layer.iter().zip(placed) {
                x[node] = column + shift;
            }
        }

        x
    }
}

impl SpineRanker for Engine {
    fn layer_dag(&self, spine: &SpineGraph) -> Result<Vec<Point>, LayoutError> {
        let step = self.rank_step();

        if spine.edge_count() == 0 {
            debug!(nodes = spine.len(); "Spine has no edges, stacking vertically");
            return Ok((0..spine.len())
                .map(|i| Point::new(0.0, i as f64 * step))
                .collect());
        }

        let ranks = self.ranks(spine)?;
        let mut layers = Self::layers(&ranks);
        self.reduce_crossings(spine, &mut layers);
        let columns = self.columns(spine, &layers);

        debug!(nodes = spine.len(), ranks = layers.len(); "Layered spine computed");

        Ok(ranks
            .iter()
            .zip(columns)
            .map(|(&rank, x)| Point::new(x, rank as f64 * step))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;
    use trellis_core::element::{LayoutEdge, LayoutNode};

    use super::*;
    use crate::layout::{classify::classify, diagnostic::Diagnostics, graph::LayoutGraph};

    fn spine_of(nodes: Vec<LayoutNode>, edges: Vec<LayoutEdge>) -> SpineGraph {
        let graph = LayoutGraph::new(nodes, edges, Size::new(300.0, 150.0)).unwrap();
        let classification = classify(&graph, &mut Diagnostics::default());
        SpineGraph::new(&graph, &classification)
    }

    fn spines(ids: &[&str]) -> Vec<LayoutNode> {
        ids.iter().map(|id| LayoutNode::spine(*id)).collect()
    }

    #[test]
    fn test_no_edges_stacks_vertically() {
        let spine = spine_of(spines(&["a", "b", "c"]), vec![]);
        let centres = Engine::new().layer_dag(&spine).unwrap();

        assert_eq!(
            centres,
            vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 300.0),
                Point::new(0.0, 600.0)
            ]
        );
    }

    #[test]
    fn test_chain_is_vertical() {
        let spine = spine_of(
            spines(&["a", "b", "c"]),
            vec![LayoutEdge::new("e1", "a", "b"), LayoutEdge::new("e2", "b", "c")],
        );
        let centres = Engine::new().layer_dag(&spine).unwrap();

        for (i, centre) in centres.iter().enumerate() {
            assert!(approx_eq!(f64, centre.x(), 0.0));
            assert!(approx_eq!(f64, centre.y(), i as f64 * 300.0));
        }
    }

    #[test]
    fn test_skip_edge_uses_longest_path() {
        let spine = spine_of(
            spines(&["a", "b", "c"]),
            vec![
                LayoutEdge::new("e1", "a", "c"),
                LayoutEdge::new("e2", "a", "b"),
                LayoutEdge::new("e3", "b", "c"),
            ],
        );
        let centres = Engine::new().layer_dag(&spine).unwrap();
        assert!(approx_eq!(f64, centres[2].y(), 600.0));
    }

    #[test]
    fn test_diamond_is_centred() {
        let spine = spine_of(
            spines(&["a", "b", "c", "d"]),
            vec![
                LayoutEdge::new("e1", "a", "b"),
                LayoutEdge::new("e2", "a", "c"),
                LayoutEdge::new("e3", "b", "d"),
                LayoutEdge::new("e4", "c", "d"),
            ],
        );
        let centres = Engine::new().layer_dag(&spine).unwrap();

        assert!(approx_eq!(f64, centres[0].x(), 0.0));
        assert!(approx_eq!(f64, centres[1].x(), -190.0));
        assert!(approx_eq!(f64, centres[2].x(), 190.0));
        assert!(approx_eq!(f64, centres[3].x(), 0.0));
        assert!(approx_eq!(f64, centres[1].y(), centres[2].y()));
    }

    #[test]
    fn test_rank_neighbours_keep_separation() {
        let spine = spine_of(
            spines(&["root", "a", "b", "c", "d"]),
            vec![
                LayoutEdge::new("e1", "root", "a"),
                LayoutEdge::new("e2", "root", "b"),
                LayoutEdge::new("e3", "root", "c"),
                LayoutEdge::new("e4", "root", "d"),
            ],
        );
        let centres = Engine::new().layer_dag(&spine).unwrap();

        let mut xs: Vec<f64> = centres[1..].iter().map(|c| c.x()).collect();
        xs.sort_by(f64::total_cmp);
        for pair in xs.windows(2) {
            assert!(pair[1] - pair[0] >= 380.0 - 1e-9);
        }
    }

    #[test]
    fn test_isolated_node_joins_first_rank() {
        let spine = spine_of(
            spines(&["a", "b", "loose"]),
            vec![LayoutEdge::new("e1", "a", "b")],
        );
        let centres = Engine::new().layer_dag(&spine).unwrap();

        assert!(approx_eq!(f64, centres[2].y(), 0.0));
        assert!(approx_eq!(f64, centres[2].x() - centres[0].x(), 380.0));
    }

    #[test]
    fn test_custom_spacing() {
        let spine = spine_of(spines(&["a", "b"]), vec![LayoutEdge::new("e1", "a", "b")]);
        let mut engine = Engine::new();
        engine
            .set_node_size(Size::new(100.0, 50.0))
            .set_rank_separation(25.0);

        let centres = engine.layer_dag(&spine).unwrap();
        assert!(approx_eq!(f64, centres[1].y(), 75.0));
    }
}

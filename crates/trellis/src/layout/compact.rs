//! Spine compaction: opens vertical room for rib stacks.
//!
//! A single top-to-bottom sweep over the spine sorted by y. Each spine node
//! reserves a band: its rib extent joined with its own box. Whenever the band
//! of a node comes closer than `min_gap` to the band of the node above it,
//! that node and every node below it move down by the deficit, so the
//! relative order of the spine never changes.
//!
//! After the sweep the bands are pairwise disjoint, whatever column each node
//! sits in. Ribs stay inside their parent's band, so boxes from different
//! bands are at least `min_gap` apart vertically.

use indexmap::IndexMap;
use log::{debug, trace};

use trellis_core::geometry::Point;

use crate::layout::{
    extent::ParentExtent,
    graph::{LayoutGraph, NodeIndex},
};

/// Pushes spine nodes apart so consecutive bands keep `min_gap`.
///
/// `extents` lists every spine node in spine order; nodes missing from it are
/// treated as having no ribs.
pub(crate) fn compact_spine(
    graph: &mut LayoutGraph,
    extents: &IndexMap<NodeIndex, ParentExtent>,
    min_gap: f64,
) {
    let mut order: Vec<NodeIndex> = extents.keys().copied().collect();
    // Stable: nodes sharing a y keep spine order.
    order.sort_by(|a, b| graph.position(*a).y().total_cmp(&graph.position(*b).y()));

    let node_size = graph.node_size();
    let extent_of = |node: &NodeIndex| {
        extents
            .get(node)
            .copied()
            .unwrap_or_default()
            .covering_parent(node_size)
    };
    let mut total_shift = 0.0;

    for i in 1..order.len() {
        let previous = order[i - 1];
        let current = order[i];

        let previous_bottom = graph.position(previous).y() + extent_of(&previous).max_y();
        let current_top = graph.position(current).y() + extent_of(&current).min_y();
        let deficit = previous_bottom + min_gap - current_top;

        if deficit > 0.0 {
            trace!(
                node:% = graph.node(current).id(),
                deficit = deficit;
                "Pushing spine suffix down"
            );
            for &node in &order[i..] {
                graph.translate(node, Point::new(0.0, deficit));
            }
            total_shift += deficit;
        }
    }

    debug!(nodes = order.len(), total_shift = total_shift; "Spine compacted");
}

//! Spine/rib partition of the roadmap.
//!
//! Roles are fixed on the nodes themselves; this stage resolves the edge
//! structure around them: which spine node owns each rib, the order of the
//! ribs under each parent, and the spine-internal edges used for ranking.

use indexmap::IndexMap;
use log::{debug, trace};

use crate::layout::{
    diagnostic::{Diagnostic, Diagnostics},
    graph::{LayoutGraph, NodeIndex},
};

/// Result of classifying a [`LayoutGraph`].
#[derive(Debug, Clone, Default)]
pub struct Classification {
    spine: Vec<NodeIndex>,
    ribs: Vec<NodeIndex>,
    parent_of: IndexMap<NodeIndex, NodeIndex>,
    children: IndexMap<NodeIndex, Vec<NodeIndex>>,
    orphans: Vec<NodeIndex>,
    spine_edges: Vec<(NodeIndex, NodeIndex)>,
}

impl Classification {
    /// Spine nodes in input order.
    pub fn spine(&self) -> &[NodeIndex] {
        &self.spine
    }

    /// Rib nodes in input order.
    pub fn ribs(&self) -> &[NodeIndex] {
        &self.ribs
    }

    pub fn parent_of(&self, rib: NodeIndex) -> Option<NodeIndex> {
        self.parent_of.get(&rib).copied()
    }

    /// Ribs owned by `parent`, in the order they appear in the input.
    pub fn children_of(&self, parent: NodeIndex) -> &[NodeIndex] {
        self.children.get(&parent).map_or(&[], Vec::as_slice)
    }

    /// Ribs without a spine parent.
    pub fn orphans(&self) -> &[NodeIndex] {
        &self.orphans
    }

    /// Spine-to-spine edges in edge order.
    pub fn spine_edges(&self) -> &[(NodeIndex, NodeIndex)] {
        &self.spine_edges
    }

    /// All nodes with spine nodes first, then ribs, each in input order.
    pub fn visit_order(&self) -> Vec<NodeIndex> {
        self.spine.iter().chain(&self.ribs).copied().collect()
    }
}

/// Partitions the graph and reports edges with unknown endpoints.
pub(crate) fn classify(graph: &LayoutGraph, diagnostics: &mut Diagnostics) -> Classification {
    let mut classification = Classification::default();

    for index in graph.indices() {
        if graph.node(index).role().is_spine() {
            classification.spine.push(index);
        } else {
            classification.ribs.push(index);
        }
    }

    for edge in graph.edges() {
        let source = graph.index_of(edge.source());
        let target = graph.index_of(edge.target());
        let (Some(source), Some(target)) = (source, target) else {
            let missing = if source.is_none() {
                edge.source()
            } else {
                edge.target()
            };
            diagnostics.push(Diagnostic::DanglingEdge {
                edge: edge.id(),
                missing,
            });
            continue;
        };

        let source_role = graph.node(source).role();
        let target_role = graph.node(target).role();
        if source_role.is_spine() && target_role.is_spine() {
            classification.spine_edges.push((source, target));
        } else if source_role.is_spine() && target_role.is_rib() {
            classification.parent_of.entry(target).or_insert(source);
        }
    }

    for &rib in &classification.ribs {
        match classification.parent_of.get(&rib) {
            Some(&parent) => classification.children.entry(parent).or_default().push(rib),
            None => classification.orphans.push(rib),
        }
    }

    trace!(parents:? = classification.parent_of; "Rib parents resolved");
    debug!(
        spine = classification.spine.len(),
        ribs = classification.ribs.len(),
        orphans = classification.orphans.len(),
        spine_edges = classification.spine_edges.len();
        "Graph classified"
    );

    classification
}

//! Arena holding the working copy of the roadmap.
//!
//! Nodes live in a flat vector addressed by [`NodeIndex`]; an id lookup table
//! resolves edge endpoints. Every stage mutates positions in place through the
//! index, so no stage ever holds references into another node.

use indexmap::IndexMap;

use trellis_core::{
    element::{LayoutEdge, LayoutNode},
    geometry::{Point, Size},
    identifier::Id,
};

use crate::error::LayoutError;

/// Position of a node in the [`LayoutGraph`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The roadmap being laid out: nodes, edges and per-node pinning.
#[derive(Debug, Clone)]
pub struct LayoutGraph {
    nodes: Vec<LayoutNode>,
    edges: Vec<LayoutEdge>,
    lookup: IndexMap<Id, NodeIndex>,
    pinned: Vec<bool>,
    node_size: Size,
}

impl LayoutGraph {
    /// Builds the arena, rejecting empty input and duplicate node ids.
    pub fn new(
        nodes: Vec<LayoutNode>,
        edges: Vec<LayoutEdge>,
        node_size: Size,
    ) -> Result<Self, LayoutError> {
        if nodes.is_empty() {
            return Err(LayoutError::EmptyInput);
        }

        let mut lookup = IndexMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if lookup.insert(node.id(), NodeIndex(i)).is_some() {
                return Err(LayoutError::DuplicateNode { id: node.id() });
            }
        }

        let pinned = vec![false; nodes.len()];
        Ok(Self {
            nodes,
            edges,
            lookup,
            pinned,
            node_size,
        })
    }

    pub fn node_size(&self) -> Size {
        self.node_size
    }

    /// Iterates over all node indices in input order.
    pub fn indices(&self) -> impl Iterator<Item = NodeIndex> + use<> {
        (0..self.nodes.len()).map(NodeIndex)
    }

    pub fn index_of(&self, id: Id) -> Option<NodeIndex> {
        self.lookup.get(&id).copied()
    }

    pub fn node(&self, index: NodeIndex) -> &LayoutNode {
        &self.nodes[index.0]
    }

    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[LayoutEdge] {
        &self.edges
    }

    pub fn position(&self, index: NodeIndex) -> Point {
        self.nodes[index.0].position()
    }

    pub fn set_position(&mut self, index: NodeIndex, position: Point) {
        self.nodes[index.0].set_position(position);
    }

    pub fn translate(&mut self, index: NodeIndex, offset: Point) {
        self.nodes[index.0].translate(offset);
    }

    /// Marks a node as immovable for the collision resolver.
    pub fn pin(&mut self, index: NodeIndex) {
        self.pinned[index.0] = true;
    }

    pub fn is_pinned(&self, index: NodeIndex) -> bool {
        self.pinned[index.0]
    }

    pub fn into_parts(self) -> (Vec<LayoutNode>, Vec<LayoutEdge>) {
        (self.nodes, self.edges)
    }
}

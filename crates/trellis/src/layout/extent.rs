//! Vertical room reserved around each spine node for its ribs.

use indexmap::IndexMap;
use log::trace;

use trellis_core::geometry::Size;

use crate::layout::{
    classify::Classification,
    graph::{LayoutGraph, NodeIndex},
};

/// How `count` ribs split into a right and a left column.
///
/// Ribs alternate right, left, right, ... so the right column never holds
/// fewer ribs than the left one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RibStack {
    count: usize,
}

impl RibStack {
    pub fn new(count: usize) -> Self {
        Self { count }
    }

    pub fn count(self) -> usize {
        self.count
    }

    pub fn right_count(self) -> usize {
        self.count.div_ceil(2)
    }

    pub fn left_count(self) -> usize {
        self.count / 2
    }

    /// Length of the taller column.
    pub fn max_side_count(self) -> usize {
        self.right_count().max(self.left_count())
    }

    /// Distance between the top-left corners of the first and last rib of
    /// the taller column.
    pub fn span(self, node_size: Size, vertical_spacing: f64) -> f64 {
        match self.max_side_count() {
            0 => 0.0,
            rows => (rows - 1) as f64 * (node_size.height() + vertical_spacing),
        }
    }
}

/// Vertical extent of a spine node's rib stack, relative to the node's y.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParentExtent {
    min_y: f64,
    max_y: f64,
    child_count: usize,
}

impl ParentExtent {
    /// Computes the extent for `child_count` ribs.
    ///
    /// # Examples
    ///
    /// ```
    /// # use trellis::layout::ParentExtent;
    /// # use trellis_core::geometry::Size;
    /// let extent = ParentExtent::for_children(4, Size::new(300.0, 150.0), 80.0);
    /// assert_eq!(extent.min_y(), -190.0);
    /// assert_eq!(extent.max_y(), 190.0);
    /// ```
    pub fn for_children(child_count: usize, node_size: Size, vertical_spacing: f64) -> Self {
        if child_count == 0 {
            return Self::default();
        }

        let half = RibStack::new(child_count).span(node_size, vertical_spacing) / 2.0;
        let half_height = node_size.height() / 2.0;
        Self {
            min_y: -half - half_height,
            max_y: half + half_height,
            child_count,
        }
    }

    /// The extent widened to also cover the parent's own box.
    ///
    /// A parent without ribs still occupies its box; compaction reserves the
    /// union so that neighbouring bands never reach into it.
    ///
    /// # Examples
    ///
    /// ```
    /// # use trellis::layout::ParentExtent;
    /// # use trellis_core::geometry::Size;
    /// let size = Size::new(300.0, 150.0);
    /// let band = ParentExtent::for_children(0, size, 80.0).covering_parent(size);
    /// assert_eq!(band.min_y(), -75.0);
    /// assert_eq!(band.max_y(), 75.0);
    /// ```
    pub fn covering_parent(self, node_size: Size) -> Self {
        let half_height = node_size.height() / 2.0;
        Self {
            min_y: self.min_y.min(-half_height),
            max_y: self.max_y.max(half_height),
            ..self
        }
    }

    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    pub fn child_count(&self) -> usize {
        self.child_count
    }
}

/// Extent of every spine node, keyed by node, in spine order.
pub(crate) fn compute_extents(
    graph: &LayoutGraph,
    classification: &Classification,
    vertical_spacing: f64,
) -> IndexMap<NodeIndex, ParentExtent> {
    classification
        .spine()
        .iter()
        .map(|&parent| {
            let count = classification.children_of(parent).len();
            let extent = ParentExtent::for_children(count, graph.node_size(), vertical_spacing);
            trace!(
                node:% = graph.node(parent).id(),
                min_y = extent.min_y(),
                max_y = extent.max_y(),
                children = count;
                "Rib extent"
            );
            (parent, extent)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn size() -> Size {
        Size::new(300.0, 150.0)
    }

    #[test]
    fn test_rib_stack_split() {
        let stack = RibStack::new(5);
        assert_eq!(stack.right_count(), 3);
        assert_eq!(stack.left_count(), 2);
        assert_eq!(stack.max_side_count(), 3);
        assert_eq!(RibStack::new(0).max_side_count(), 0);
    }

    #[test]
    fn test_no_children_has_empty_extent() {
        let extent = ParentExtent::for_children(0, size(), 80.0);
        assert_eq!(extent, ParentExtent::default());
    }

    #[test]
    fn test_single_child_covers_one_box() {
        let extent = ParentExtent::for_children(1, size(), 80.0);
        assert_eq!(extent.min_y(), -75.0);
        assert_eq!(extent.max_y(), 75.0);
        assert_eq!(extent.child_count(), 1);
    }

    #[test]
    fn test_three_children_use_two_rows() {
        let extent = ParentExtent::for_children(3, size(), 80.0);
        assert_eq!(extent.min_y(), -190.0);
        assert_eq!(extent.max_y(), 190.0);
    }

    #[test]
    fn test_covering_parent_keeps_larger_stack() {
        let stack = ParentExtent::for_children(4, size(), 80.0).covering_parent(size());
        assert_eq!(stack.min_y(), -190.0);
        assert_eq!(stack.max_y(), 190.0);
        assert_eq!(stack.child_count(), 4);

        let bare = ParentExtent::for_children(0, size(), 80.0).covering_parent(size());
        assert_eq!(bare.min_y(), -75.0);
        assert_eq!(bare.child_count(), 0);
    }

    fn check_extent_is_symmetric(count: usize, height: f64, spacing: f64) {
        let size = Size::new(300.0, height);
        let extent = ParentExtent::for_children(count, size, spacing);

        assert!(approx_eq!(f64, extent.min_y(), -extent.max_y(), ulps = 4));
        if count > 0 {
            let rows = count.div_ceil(2) as f64;
            let expected = (rows - 1.0) * (height + spacing) + height;
            assert!(approx_eq!(
                f64,
                extent.max_y() - extent.min_y(),
                expected,
                epsilon = 1e-9
            ));
        }
    }

    proptest! {
        #[test]
        fn extent_is_symmetric(
            count in 0usize..20,
            height in 1.0f64..500.0,
            spacing in 0.0f64..200.0,
        ) {
            check_extent_is_symmetric(count, height, spacing);
        }
    }
}

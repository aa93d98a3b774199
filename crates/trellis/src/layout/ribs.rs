//! Rib placement around spine parents.
//!
//! The ribs of a parent alternate right, left, right, ... and each side is
//! stacked vertically, centred on the parent's y. Ribs without a spine parent
//! are placed at the origin and pinned there.

use log::{debug, trace};

use trellis_core::geometry::Point;

use crate::layout::{
    classify::Classification,
    diagnostic::{Diagnostic, Diagnostics},
    extent::RibStack,
    graph::LayoutGraph,
};

/// Horizontal and vertical spacing between a parent and its ribs.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RibSpacing {
    pub horizontal: f64,
    pub vertical: f64,
}

/// Positions every rib relative to its parent's final position.
pub(crate) fn place_ribs(
    graph: &mut LayoutGraph,
    classification: &Classification,
    spacing: RibSpacing,
    diagnostics: &mut Diagnostics,
) {
    let size = graph.node_size();
    let column_offset = size.width() + spacing.horizontal;
    let row_step = size.height() + spacing.vertical;

    for &parent in classification.spine() {
        let children = classification.children_of(parent);
        if children.is_empty() {
            continue;
        }

        let origin = graph.position(parent);
        let start_y = origin.y() - RibStack::new(children.len()).span(size, spacing.vertical) / 2.0;

        for (i, &child) in children.iter().enumerate() {
            let x = if i % 2 == 0 {
                origin.x() + column_offset
            } else {
                origin.x() - column_offset
            };
            let y = start_y + (i / 2) as f64 * row_step;

            trace!(
                rib:% = graph.node(child).id(),
                parent:% = graph.node(parent).id(),
                x = x,
                y = y;
                "Rib placed"
            );
            graph.set_position(child, Point::new(x, y));
        }
    }

    for &orphan in classification.orphans() {
        graph.set_position(orphan, Point::default());
        graph.pin(orphan);
        diagnostics.push(Diagnostic::OrphanRib {
            node: graph.node(orphan).id(),
        });
    }

    debug!(
        ribs = classification.ribs().len(),
        orphans = classification.orphans().len();
        "Ribs placed"
    );
}

#[cfg(test)]
mod tests {
    use trellis_core::{
        element::{LayoutEdge, LayoutNode},
        geometry::Size,
        identifier::Id,
    };

    use super::*;
    use crate::layout::classify::classify;

    fn spacing() -> RibSpacing {
        RibSpacing {
            horizontal: 150.0,
            vertical: 80.0,
        }
    }

    fn run(nodes: Vec<LayoutNode>, edges: Vec<LayoutEdge>) -> (LayoutGraph, Vec<Diagnostic>) {
        let mut graph = LayoutGraph::new(nodes, edges, Size::new(300.0, 150.0)).unwrap();
        let mut diagnostics = Diagnostics::default();
        let classification = classify(&graph, &mut diagnostics);
        place_ribs(&mut graph, &classification, spacing(), &mut diagnostics);
        (graph, diagnostics.into_vec())
    }

    fn position(graph: &LayoutGraph, id: &str) -> Point {
        graph.position(graph.index_of(Id::new(id)).unwrap())
    }

    #[test]
    fn test_four_ribs_alternate_sides() {
        let mut nodes = vec![LayoutNode::spine("root")];
        let mut edges = Vec::new();
        for i in 0..4 {
            let id = format!("c{i}");
            nodes.push(LayoutNode::rib(&id));
            edges.push(LayoutEdge::new(&format!("e{i}"), "root", &id));
        }
        let (graph, diagnostics) = run(nodes, edges);

        assert_eq!(position(&graph, "c0"), Point::new(450.0, -115.0));
        assert_eq!(position(&graph, "c1"), Point::new(-450.0, -115.0));
        assert_eq!(position(&graph, "c2"), Point::new(450.0, 115.0));
        assert_eq!(position(&graph, "c3"), Point::new(-450.0, 115.0));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_single_rib_is_level_with_parent() {
        let nodes = vec![
            LayoutNode::spine("root").with_position(Point::new(100.0, 300.0)),
            LayoutNode::rib("only"),
        ];
        let edges = vec![LayoutEdge::new("e", "root", "only")];
        let (graph, _) = run(nodes, edges);

        assert_eq!(position(&graph, "only"), Point::new(550.0, 300.0));
    }

    #[test]
    fn test_odd_count_right_column_is_taller() {
        let nodes = vec![
            LayoutNode::spine("root"),
            LayoutNode::rib("a"),
            LayoutNode::rib("b"),
            LayoutNode::rib("c"),
        ];
        let edges = vec![
            LayoutEdge::new("e1", "root", "a"),
            LayoutEdge::new("e2", "root", "b"),
            LayoutEdge::new("e3", "root", "c"),
        ];
        let (graph, _) = run(nodes, edges);

        assert_eq!(position(&graph, "a"), Point::new(450.0, -115.0));
        assert_eq!(position(&graph, "b"), Point::new(-450.0, -115.0));
        assert_eq!(position(&graph, "c"), Point::new(450.0, 115.0));
    }

    #[test]
    fn test_orphan_pinned_at_origin() {
        let nodes = vec![
            LayoutNode::spine("root").with_position(Point::new(0.0, 500.0)),
            LayoutNode::rib("lost").with_position(Point::new(42.0, 42.0)),
        ];
        let (graph, diagnostics) = run(nodes, vec![]);

        let lost = graph.index_of(Id::new("lost")).unwrap();
        assert_eq!(graph.position(lost), Point::new(0.0, 0.0));
        assert!(graph.is_pinned(lost));
        assert_eq!(
            diagnostics,
            vec![Diagnostic::OrphanRib {
                node: Id::new("lost")
            }]
        );
    }
}

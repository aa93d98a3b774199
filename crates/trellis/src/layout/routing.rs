//! Edge routing: connection handles, line style and arrow flag.
//!
//! Routing reads roles and final positions only. It never moves a node and
//! running it again on the same positions yields the same annotations.

use std::collections::HashMap;

use log::{debug, trace};

use trellis_core::{
    element::{Handle, LayoutEdge, LayoutNode, LineStyle, NodeRole},
    identifier::Id,
};

/// Annotates every edge whose endpoints both exist in `nodes`.
///
/// - spine to spine: bottom to top, dashed, with arrow;
/// - spine to rib: right to left when the rib lies to the right of its
///   parent, left to right otherwise, dotted, with arrow;
/// - anything else: handles face each other along the dominant axis, style
///   and arrow are left as they are.
///
/// Edges that reference unknown nodes are skipped.
///
/// # Examples
///
/// ```
/// # use trellis::layout::route_edges;
/// # use trellis_core::{element::{Handle, LayoutEdge, LayoutNode, LineStyle}, geometry::Point};
/// let nodes = vec![
///     LayoutNode::spine("root"),
///     LayoutNode::rib("left").with_position(Point::new(-450.0, 0.0)),
/// ];
/// let mut edges = vec![LayoutEdge::new("e", "root", "left")];
///
/// route_edges(&nodes, &mut edges);
/// assert_eq!(edges[0].source_handle(), Some(Handle::Left));
/// assert_eq!(edges[0].target_handle(), Some(Handle::Right));
/// assert_eq!(edges[0].line_style(), LineStyle::Dotted);
/// ```
pub fn route_edges(nodes: &[LayoutNode], edges: &mut [LayoutEdge]) {
    let lookup: HashMap<Id, &LayoutNode> = nodes.iter().map(|node| (node.id(), node)).collect();
    let mut routed = 0;

    for edge in edges.iter_mut() {
        let (Some(source), Some(target)) = (lookup.get(&edge.source()), lookup.get(&edge.target()))
        else {
            continue;
        };
        route_edge(source, target, edge);
        trace!(
            edge:% = edge.id(),
            from = edge.source_handle().map_or("none", Handle::as_str),
            to = edge.target_handle().map_or("none", Handle::as_str),
            style:% = edge.line_style();
            "Edge routed"
        );
        routed += 1;
    }

    debug!(routed = routed, total = edges.len(); "Edges routed");
}

fn route_edge(source: &LayoutNode, target: &LayoutNode, edge: &mut LayoutEdge) {
    let delta = target.position().sub_point(source.position());

    match (source.role(), target.role()) {
        (NodeRole::Spine, NodeRole::Spine) => {
            edge.set_handles(Handle::Bottom, Handle::Top);
            edge.set_line_style(LineStyle::Dashed);
            edge.set_arrow(true);
        }
        (NodeRole::Spine, NodeRole::Rib) => {
            if delta.x() > 0.0 {
                edge.set_handles(Handle::Right, Handle::Left);
            } else {
                edge.set_handles(Handle::Left, Handle::Right);
            }
            edge.set_line_style(LineStyle::Dotted);
            edge.set_arrow(true);
        }
        _ => {
            if delta.x().abs() > delta.y().abs() {
                if delta.x() > 0.0 {
                    edge.set_handles(Handle::Right, Handle::Left);
                } else {
                    edge.set_handles(Handle::Left, Handle::Right);
                }
            } else if delta.y() > 0.0 {
                edge.set_handles(Handle::Bottom, Handle::Top);
            } else {
                edge.set_handles(Handle::Top, Handle::Bottom);
            }
        }
    }
}

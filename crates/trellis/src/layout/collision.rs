//! Bounded pairwise overlap repair.
//!
//! Each pass visits every unordered pair of nodes in visit order. A colliding
//! pair is separated along the axis with the smaller overlap by moving the
//! later node away from the earlier one. Pinned nodes never move. The
//! resolver stops after a pass without collisions or after `max_passes`.

use log::{debug, trace};

use trellis_core::geometry::{Point, Size};

use crate::{
    config::CollisionConfig,
    layout::{
        diagnostic::{Diagnostic, Diagnostics},
        graph::{LayoutGraph, NodeIndex},
    },
};

/// Two nodes collide when their padded boxes overlap.
fn collides(a: Point, b: Point, padded: Size) -> bool {
    a.to_bounds(padded).overlaps(&b.to_bounds(padded))
}

/// Shift that moves `b` away from `a`, or `None` when they do not collide.
fn separation(a: Point, b: Point, padded: Size, padding: f64) -> Option<Point> {
    if !collides(a, b, padded) {
        return None;
    }

    let delta = b.sub_point(a);
    let overlap_x = padded.width() - delta.x().abs();
    let overlap_y = padded.height() - delta.y().abs();
    let away = |d: f64, amount: f64| if d > 0.0 { amount } else { -amount };

    Some(if overlap_x < overlap_y {
        Point::new(away(delta.x(), overlap_x / 2.0 + padding), 0.0)
    } else {
        Point::new(0.0, away(delta.y(), overlap_y / 2.0 + padding))
    })
}

/// Runs the resolver over `order` and reports pairs that still overlap.
///
/// Returns the number of passes performed.
pub(crate) fn resolve_collisions(
    graph: &mut LayoutGraph,
    order: &[NodeIndex],
    config: &CollisionConfig,
    diagnostics: &mut Diagnostics,
) -> usize {
    let padding = config.padding();
    let padded = graph.node_size().padded(padding);
    let mut passes = 0;

    while passes < config.max_passes() {
        passes += 1;
        let mut collisions = 0;

        for (i, &a) in order.iter().enumerate() {
            for &b in &order[i + 1..] {
                let (a_pinned, b_pinned) = (graph.is_pinned(a), graph.is_pinned(b));
                if a_pinned && b_pinned {
                    continue;
                }

                let Some(shift) =
                    separation(graph.position(a), graph.position(b), padded, padding)
                else {
                    continue;
                };
                collisions += 1;

                if b_pinned {
                    graph.translate(a, Point::default().sub_point(shift));
                } else {
                    graph.translate(b, shift);
                }
                trace!(
                    first:% = graph.node(a).id(),
                    second:% = graph.node(b).id(),
                    dx = shift.x(),
                    dy = shift.y();
                    "Collision resolved"
                );
            }
        }

        debug!(pass = passes, collisions = collisions; "Collision pass finished");
        if collisions == 0 {
            break;
        }
    }

    for (i, &a) in order.iter().enumerate() {
        for &b in &order[i + 1..] {
            if collides(graph.position(a), graph.position(b), padded) {
                diagnostics.push(Diagnostic::ResidualCollision {
                    first: graph.node(a).id(),
                    second: graph.node(b).id(),
                });
            }
        }
    }

    passes
}

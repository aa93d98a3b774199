//! Spine engine backed by the `rust-sugiyama` crate.
//!
//! `rust-sugiyama` lays out each weakly connected component of the edge list
//! separately and reports its own coordinate convention. The components are
//! placed side by side, their vertical levels converted back to ranks, and
//! spine nodes that take part in no edge are stacked in a column to the right.

use std::{collections::HashMap, panic};

use log::debug;
use petgraph::visit::EdgeRef;
use rust_sugiyama::configure::Config;

use trellis_core::geometry::{Point, Size};

use crate::{
    error::LayoutError,
    layout::engines::{SpineGraph, SpineRanker},
};

/// The Sugiyama spine engine.
pub struct Engine {
    node_size: Size,
    node_separation: f64,
    rank_separation: f64,
}

impl Engine {
    /// Create a new Sugiyama spine engine
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

    fn run(
        &self,
        edges: Vec<(u32, u32)>,
    ) -> Result<Vec<(Vec<(usize, (f64, f64))>, f64, f64)>, LayoutError> {
        let vertex_spacing = self.node_size.width() + self.node_separation;

        // rust-sugiyama panics on some malformed inputs instead of returning an error.
        let layouts = panic::catch_unwind(move || {
            let config = Config {
                minimum_length: 1,
                vertex_spacing,
                ..Default::default()
            };
            rust_sugiyama::from_edges(&edges, &config)
        })
        .map_err(|err| {
            let message = err
                .downcast_ref::<String>()
                .cloned()
                .or_else(|| err.downcast_ref::<&str>().map(|s| s.to_string()))
                .unwrap_or_else(|| "unknown panic".to_string());
            LayoutError::Engine(format!("rust-sugiyama panicked: {message}"))
        })?;

        if layouts.is_empty() {
            return Err(LayoutError::Engine(
                "rust-sugiyama returned no layout".to_string(),
            ));
        }

        Ok(layouts
            .into_iter()
            .map(|(coords, width, height)| {
                let coords = coords
                    .into_iter()
                    .map(|(id, (x, y))| (id as usize, (x as f64, y as f64)))
                    .collect();
                (coords, width as f64, height as f64)
            })
            .collect())
    }
}

impl SpineRanker for Engine {
    fn layer_dag(&self, spine: &SpineGraph) -> Result<Vec<Point>, LayoutError> {
        let rank_step = self.node_size.height() + self.rank_separation;
        let column_step = self.node_size.width() + self.node_separation;

        // Only nodes that take part in an edge are handed to rust-sugiyama,
        // renumbered densely in first-seen order.
        let mut compact: HashMap<usize, u32> = HashMap::new();
        let mut original: Vec<usize> = Vec::new();
        let mut edges: Vec<(u32, u32)> = Vec::with_capacity(spine.edge_count());
        for edge in spine.graph().edge_references() {
            let mut renumber = |node: usize| {
                *compact.entry(node).or_insert_with(|| {
                    original.push(node);
                    (original.len() - 1) as u32
                })
            };
            let source = renumber(edge.source().index());
            let target = renumber(edge.target().index());
            edges.push((source, target));
        }

        let mut centres: Vec<Option<Point>> = vec![None; spine.len()];
        let mut next_column = 0.0;

        if !edges.is_empty() {
            debug!(
                nodes = original.len(),
                edges = edges.len();
                "Applying rust-sugiyama to spine"
            );

            for (coords, _, _) in self.run(edges.clone())? {
                let levels: HashMap<usize, f64> =
                    coords.iter().map(|&(id, (_, y))| (id, y)).collect();

                let mut distinct: Vec<f64> = levels.values().copied().collect();
                distinct.sort_by(f64::total_cmp);
                distinct.dedup();

                // Ranks must grow along edges regardless of the crate's y direction.
                let flipped = edges
                    .iter()
                    .find_map(|&(source, target)| {
                        let source = levels.get(&(source as usize))?;
                        let target = levels.get(&(target as usize))?;
                        Some(source > target)
                    })
                    .unwrap_or(false);

                let min_x = coords
                    .iter()
                    .map(|&(_, (x, _))| x)
                    .fold(f64::INFINITY, f64::min);
                let max_x = coords
                    .iter()
                    .map(|&(_, (x, _))| x)
                    .fold(f64::NEG_INFINITY, f64::max);

                for &(id, (x, y)) in &coords {
                    let Some(&node) = original.get(id) else {
                        debug!(id = id; "Ignoring unknown vertex from rust-sugiyama");
                        continue;
                    };
                    let level = distinct.partition_point(|&level| level < y);
                    let rank = if flipped {
                        distinct.len() - 1 - level
                    } else {
                        level
                    };
                    centres[node] = Some(Point::new(
                        next_column + (x - min_x),
                        rank as f64 * rank_step,
                    ));
                }

                next_column += (max_x - min_x) + column_step;
            }
        }

        let mut stacked = 0;
        let mut positioned = Vec::with_capacity(centres.len());
        for centre in centres {
            let centre = centre.unwrap_or_else(|| {
                let centre = Point::new(next_column, stacked as f64 * rank_step);
                stacked += 1;
                centre
            });
            positioned.push(centre);
        }

        debug!(isolated = stacked; "Spine positioned by rust-sugiyama");
        Ok(positioned)
    }
}

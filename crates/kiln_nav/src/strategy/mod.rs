//! One search function per [`PathStrategy`](crate::PathStrategy) variant.
//!
//! Every function receives a [`SearchContext`] whose endpoints are already
//! validated: both in bounds, distinct, and the goal not blocked.

mod astar;
mod greedy;
mod line;
mod step;

pub(crate) use astar::bounded_astar;
pub(crate) use greedy::greedy_best_first;
pub(crate) use line::direct_line;
pub(crate) use step::immediate_step;

use kiln_core::StampBuffer;

use crate::config::TileMetric;
use crate::direction::{Direction, DirectionSet};
use crate::grid::Grid;
use crate::tile::TilePos;

/// Read-only view of one query.
pub(crate) struct SearchContext<'a> {
    pub grid: &'a Grid,
    pub overlay: &'a StampBuffer,
    pub metric: TileMetric,
    pub directions: DirectionSet,
    pub start: TilePos,
    pub end: TilePos,
}

impl<'a> SearchContext<'a> {
    /// Directions an actor standing on `from` may take.
    ///
    /// The goal cell is exempt from corner sealing but not from the
    /// actor's direction set.
    pub fn open_directions(&self, from: TilePos) -> DirectionSet {
        let overlay = self.overlay;
        let grid = self.grid;
        let mut open = grid.passable_directions(from, |p| {
            grid.index(p).is_some_and(|i| overlay.is_marked(i))
        });
        for dir in Direction::ALL {
            if from.step(dir) == self.end {
                open = open.with(dir);
            }
        }
        open.intersection(self.directions)
    }

    /// Open neighbours of `from` with their flat indices.
    pub fn neighbours(&self, from: TilePos) -> impl Iterator<Item = (TilePos, usize)> + 'a {
        let grid: &'a Grid = self.grid;
        self.open_directions(from).iter().filter_map(move |dir| {
            let next = from.step(dir);
            grid.index(next).map(|i| (next, i))
        })
    }

    /// Heuristic distance to the goal.
    #[inline]
    pub fn heuristic(&self, pos: TilePos) -> f64 {
        self.metric.distance(pos, self.end)
    }
}

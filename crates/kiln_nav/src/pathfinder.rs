//! # Path Finder
//!
//! Owns the obstacle grid and the scratch memory every query reuses.
//!
//! ## Query Rules
//!
//! - `start == end` yields the single-point path `[start]`
//! - either endpoint outside the grid yields the empty path
//! - a goal blocked by the grid or by a dynamic obstacle yields the empty path
//!   (except for [`PathStrategy::DirectLine`], which ignores terrain)
//! - a bounded strategy that never discovers the goal yields the empty path;
//!   [`PathStrategy::ImmediateStep`] instead returns the hops it managed
//!
//! Queries take `&self`. The scratch memory sits behind a `RefCell`, so a
//! `PathFinder` is `Send` but not `Sync`: one instance per thread.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::config::NavConfig;
use crate::direction::DirectionSet;
use crate::error::NavResult;
use crate::grid::Grid;
use crate::scratch::Scratch;
use crate::strategy::{self, SearchContext};
use crate::tile::TilePos;

/// Search strategy, selected per actor class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStrategy {
    /// A handful of greedy hops toward the goal. Reactive skirmish movement.
    ImmediateStep,
    /// Best-first on the heuristic alone. Simple NPC wandering.
    GreedyBestFirst,
    /// A* with the standard budget. AI-controlled actors.
    BoundedAStar,
    /// A* with the large budget. The player-controlled actor.
    BoundedAStarLarge,
    /// Straight line ignoring terrain. Flying actors.
    DirectLine,
}

impl PathStrategy {
    /// All strategies in host index order.
    pub const ALL: [PathStrategy; 5] = [
        PathStrategy::ImmediateStep,
        PathStrategy::GreedyBestFirst,
        PathStrategy::BoundedAStar,
        PathStrategy::BoundedAStarLarge,
        PathStrategy::DirectLine,
    ];

    /// Maps a host-side strategy index (`0..5`) to a strategy.
    #[inline]
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::ImmediateStep),
            1 => Some(Self::GreedyBestFirst),
            2 => Some(Self::BoundedAStar),
            3 => Some(Self::BoundedAStarLarge),
            4 => Some(Self::DirectLine),
            _ => None,
        }
    }
}

/// Grid path finder with reusable scratch memory.
#[derive(Debug)]
pub struct PathFinder {
    grid: Grid,
    config: NavConfig,
    scratch: RefCell<Scratch>,
}

impl PathFinder {
    /// Creates a path finder over an obstacle-free `width × height` grid
    /// with the default budgets and isometric metric.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_config(width, height, NavConfig::default())
    }

    /// Creates a path finder with explicit budgets and metric.
    ///
    /// # Arguments
    ///
    /// * `width`, `height` - Grid size in tiles, fixed for the instance's lifetime
    /// * `config` - Budgets and metric
    #[must_use]
    pub fn with_config(width: i32, height: i32, config: NavConfig) -> Self {
        let grid = Grid::new(width, height);
        let scratch = RefCell::new(Scratch::new(grid.len()));
        Self {
            grid,
            config,
            scratch,
        }
    }

    /// Grid width in tiles.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.grid.width()
    }

    /// Grid height in tiles.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.grid.height()
    }

    /// Read access to the obstacle grid.
    #[inline]
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Active configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &NavConfig {
        &self.config
    }

    /// Sets both obstacle flags of one cell. Writes outside the grid are ignored.
    pub fn set_obstacle(&mut self, x: i32, y: i32, is_obstacle: bool, is_hard: bool) {
        self.grid.set(TilePos::new(x, y), is_obstacle, is_hard);
    }

    /// Replaces the whole grid from `width * height` byte maps
    /// (non-zero = flag set).
    ///
    /// # Errors
    ///
    /// Returns [`NavError::BitmapSize`](crate::NavError::BitmapSize) when a
    /// map has the wrong length; the grid is left unchanged.
    pub fn set_obstacle_bitmap(&mut self, soft: &[u8], hard: &[u8]) -> NavResult<()> {
        self.grid.replace(soft, hard).map_err(|err| {
            tracing::warn!(%err, "rejected obstacle bitmap");
            err
        })
    }

    /// Removes every obstacle.
    pub fn clear_obstacles(&mut self) {
        self.grid.clear();
    }

    /// Returns true if the cell is blocked or outside the grid.
    #[inline]
    #[must_use]
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        self.grid.is_blocked(TilePos::new(x, y))
    }

    /// Returns true if the cell carries the hard flag.
    #[inline]
    #[must_use]
    pub fn is_hard(&self, x: i32, y: i32) -> bool {
        self.grid.is_hard(TilePos::new(x, y))
    }

    /// Finds a path over the static grid.
    ///
    /// # Arguments
    ///
    /// * `start`, `end` - Endpoints, both included in the returned path
    /// * `strategy` - Search strategy
    /// * `move_direction_count` - Directions the actor can face (1, 2, 4 or 8)
    ///
    /// # Returns
    ///
    /// The path from `start` to `end`, or empty when no route was found.
    #[must_use]
    pub fn find_path(
        &self,
        start: TilePos,
        end: TilePos,
        strategy: PathStrategy,
        move_direction_count: i32,
    ) -> Vec<TilePos> {
        self.find_path_with_dynamic(start, end, strategy, move_direction_count, &[])
    }

    /// Finds a path treating `dynamic` as extra obstacles for this call only.
    ///
    /// Dynamic obstacles block like soft obstacles. Entries outside the grid
    /// are ignored. The grid itself is never modified.
    #[must_use]
    pub fn find_path_with_dynamic(
        &self,
        start: TilePos,
        end: TilePos,
        strategy: PathStrategy,
        move_direction_count: i32,
        dynamic: &[TilePos],
    ) -> Vec<TilePos> {
        let grid = &self.grid;
        if !grid.in_bounds(start) || !grid.in_bounds(end) {
            return Vec::new();
        }
        if start == end {
            return vec![start];
        }
        if strategy == PathStrategy::DirectLine {
            return strategy::direct_line(start, end);
        }
        if grid.is_blocked(end) {
            return Vec::new();
        }

        let mut scratch = self.scratch.borrow_mut();
        let Scratch { overlay, search } = &mut *scratch;

        overlay.advance();
        for &pos in dynamic {
            if let Some(i) = grid.index(pos) {
                overlay.mark(i);
            }
        }
        if grid.index(end).is_some_and(|i| overlay.is_marked(i)) {
            return Vec::new();
        }

        let ctx = SearchContext {
            grid,
            overlay,
            metric: self.config.metric,
            directions: DirectionSet::from_move_count(move_direction_count),
            start,
            end,
        };
        let budgets = &self.config.budgets;
        match strategy {
            PathStrategy::ImmediateStep => {
                strategy::immediate_step(&ctx, search, budgets.immediate_step)
            }
            PathStrategy::GreedyBestFirst => {
                strategy::greedy_best_first(&ctx, search, budgets.greedy)
            }
            PathStrategy::BoundedAStar => strategy::bounded_astar(&ctx, search, budgets.astar),
            PathStrategy::BoundedAStarLarge => {
                strategy::bounded_astar(&ctx, search, budgets.astar_large)
            }
            PathStrategy::DirectLine => strategy::direct_line(start, end),
        }
    }

    /// Flat-array form of [`PathFinder::find_path_with_dynamic`].
    ///
    /// `dynamic` and the result are interleaved `[x0, y0, x1, y1, ...]`.
    #[must_use]
    pub fn find_path_flat(
        &self,
        start: (i32, i32),
        end: (i32, i32),
        strategy: PathStrategy,
        move_direction_count: i32,
        dynamic: &[i32],
    ) -> Vec<i32> {
        let path = self.find_path_with_dynamic(
            start.into(),
            end.into(),
            strategy,
            move_direction_count,
            TilePos::from_flat(dynamic),
        );
        TilePos::flatten(&path).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TileMetric;

    fn p(x: i32, y: i32) -> TilePos {
        TilePos::new(x, y)
    }

    #[test]
    fn test_same_start_end_is_single_point() {
        let finder = PathFinder::new(10, 10);
        for strategy in PathStrategy::ALL {
            assert_eq!(finder.find_path(p(5, 5), p(5, 5), strategy, 8), vec![p(5, 5)]);
        }
    }

    #[test]
    fn test_out_of_bounds_endpoints() {
        let finder = PathFinder::new(10, 10);
        assert!(finder
            .find_path(p(-1, 0), p(5, 5), PathStrategy::BoundedAStar, 8)
            .is_empty());
        assert!(finder
            .find_path(p(0, 0), p(10, 5), PathStrategy::DirectLine, 8)
            .is_empty());
    }

    #[test]
    fn test_blocked_goal() {
        let mut finder = PathFinder::new(10, 10);
        finder.set_obstacle(4, 4, true, false);
        for strategy in &PathStrategy::ALL[..4] {
            assert!(finder.find_path(p(0, 0), p(4, 4), *strategy, 8).is_empty());
        }
    }

    #[test]
    fn test_direct_line_ignores_obstacles() {
        let mut finder = PathFinder::new(10, 10);
        finder.set_obstacle(2, 2, true, true);
        finder.set_obstacle(4, 4, true, true);
        let path = finder.find_path(p(0, 0), p(4, 4), PathStrategy::DirectLine, 8);
        assert_eq!(path.len(), 5);
        assert!(path.contains(&p(2, 2)));
    }

    #[test]
    fn test_dynamic_goal_is_blocked() {
        let finder = PathFinder::new(10, 10);
        let path = finder.find_path_with_dynamic(
            p(0, 0),
            p(3, 3),
            PathStrategy::BoundedAStar,
            8,
            &[p(3, 3)],
        );
        assert!(path.is_empty());
    }

    #[test]
    fn test_dynamic_obstacles_do_not_persist() {
        let finder = PathFinder::new(10, 10);
        let blocked = finder.find_path_with_dynamic(
            p(0, 0),
            p(3, 3),
            PathStrategy::BoundedAStar,
            8,
            &[p(3, 3)],
        );
        assert!(blocked.is_empty());
        let free = finder.find_path(p(0, 0), p(3, 3), PathStrategy::BoundedAStar, 8);
        assert_eq!(free.last(), Some(&p(3, 3)));
    }

    #[test]
    fn test_four_direction_path_is_orthogonal() {
        let config = NavConfig {
            metric: TileMetric::Octile,
            ..NavConfig::default()
        };
        let finder = PathFinder::with_config(10, 10, config);
        let path = finder.find_path(p(0, 0), p(3, 3), PathStrategy::BoundedAStar, 4);
        assert_eq!(path.len(), 7);
        for pair in path.windows(2) {
            let dx = (pair[1].x - pair[0].x).abs();
            let dy = (pair[1].y - pair[0].y).abs();
            assert_eq!(dx + dy, 1);
        }
    }

    #[test]
    fn test_flat_interface() {
        let finder = PathFinder::new(10, 10);
        let flat = finder.find_path_flat((0, 0), (2, 0), PathStrategy::DirectLine, 8, &[]);
        assert_eq!(flat, vec![0, 0, 1, 0, 2, 0]);
    }

    #[test]
    fn test_bitmap_size_mismatch_keeps_grid() {
        let mut finder = PathFinder::new(3, 3);
        finder.set_obstacle(1, 1, true, true);
        assert!(finder.set_obstacle_bitmap(&[0; 9], &[0; 8]).is_err());
        assert!(finder.is_hard(1, 1));
    }

    #[test]
    fn test_strategy_index() {
        assert_eq!(PathStrategy::from_index(3), Some(PathStrategy::BoundedAStarLarge));
        assert_eq!(PathStrategy::from_index(5), None);
    }
}

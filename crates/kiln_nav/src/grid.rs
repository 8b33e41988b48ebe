//! # Occupancy Grid
//!
//! One byte per cell carrying two independent flags. Either flag blocks the
//! cell; a hard cell on a diagonal also seals the orthogonal moves that pass
//! beside it, so actors cannot cut the corner of a wall.

use crate::direction::{Direction, DirectionSet};
use crate::error::{NavError, NavResult};
use crate::tile::TilePos;

/// Soft obstacle flag.
const SOFT: u8 = 1 << 0;
/// Hard obstacle flag.
const HARD: u8 = 1 << 1;

/// Fixed-size obstacle grid.
#[derive(Debug, Clone)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<u8>,
}

impl Grid {
    /// Creates an obstacle-free grid. Negative sizes are treated as zero.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cells: vec![0; width as usize * height as usize],
        }
    }

    /// Grid width in tiles.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in tiles.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Number of cells.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the grid has no cells.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns true if the position is inside the grid.
    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, pos: TilePos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    /// Flat cell index, or `None` outside the grid.
    #[inline]
    #[must_use]
    pub fn index(&self, pos: TilePos) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    /// Position of a flat cell index.
    #[inline]
    #[must_use]
    pub(crate) fn position(&self, index: usize) -> TilePos {
        let width = self.width.max(1) as usize;
        TilePos::new((index % width) as i32, (index / width) as i32)
    }

    /// Writes both flags of one cell. Writes outside the grid are ignored.
    pub fn set(&mut self, pos: TilePos, is_obstacle: bool, is_hard: bool) {
        if let Some(i) = self.index(pos) {
            let mut cell = 0;
            if is_obstacle {
                cell |= SOFT;
            }
            if is_hard {
                cell |= HARD;
            }
            self.cells[i] = cell;
        }
    }

    /// Replaces every cell from two `width * height` byte maps
    /// (non-zero = flag set).
    ///
    /// # Errors
    ///
    /// Returns [`NavError::BitmapSize`] if either map has the wrong length.
    /// The grid is left unchanged in that case.
    pub fn replace(&mut self, soft: &[u8], hard: &[u8]) -> NavResult<()> {
        let expected = self.cells.len();
        if soft.len() != expected || hard.len() != expected {
            return Err(NavError::BitmapSize {
                expected,
                soft: soft.len(),
                hard: hard.len(),
            });
        }
        for ((cell, &s), &h) in self.cells.iter_mut().zip(soft).zip(hard) {
            *cell = (if s != 0 { SOFT } else { 0 }) | (if h != 0 { HARD } else { 0 });
        }
        Ok(())
    }

    /// Removes every obstacle.
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Returns true if the cell holds either obstacle flag, or lies outside the grid.
    #[inline]
    #[must_use]
    pub fn is_blocked(&self, pos: TilePos) -> bool {
        self.index(pos).map_or(true, |i| self.cells[i] != 0)
    }

    /// Returns true if the cell carries the hard flag.
    ///
    /// Cells outside the grid are blocked but not hard, so map edges never
    /// seal the moves running along them.
    #[inline]
    #[must_use]
    pub fn is_hard(&self, pos: TilePos) -> bool {
        self.index(pos).is_some_and(|i| self.cells[i] & HARD != 0)
    }

    /// Directions out of `from` that the terrain does not block.
    ///
    /// `extra_blocked` reports cells blocked for this query only; they block
    /// like soft obstacles.
    pub(crate) fn passable_directions(
        &self,
        from: TilePos,
        extra_blocked: impl Fn(TilePos) -> bool,
    ) -> DirectionSet {
        let mut blocked = DirectionSet::EMPTY;
        for dir in Direction::ALL {
            let next = from.step(dir);
            if self.is_blocked(next) {
                blocked = blocked.with(dir);
                if self.is_hard(next) {
                    blocked = blocked.union(dir.flanking());
                }
            } else if extra_blocked(next) {
                blocked = blocked.with(dir);
            }
        }
        DirectionSet::ALL.difference(blocked)
    }
}

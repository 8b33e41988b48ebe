//! # Tile Positions
//!
//! Paths are `Vec<TilePos>`. Hosts that speak flat `[x0, y0, x1, y1, ...]`
//! arrays get a zero-copy view through [`TilePos::flatten`] and
//! [`TilePos::from_flat`].

use bytemuck::{Pod, Zeroable};

use crate::direction::Direction;

/// Integer tile coordinate. `+y` points south.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Pod, Zeroable)]
#[repr(C)]
pub struct TilePos {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl TilePos {
    /// Creates a tile position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring tile one step in `dir`.
    #[inline]
    #[must_use]
    pub const fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.offset();
        Self::new(self.x.wrapping_add(dx), self.y.wrapping_add(dy))
    }

    /// Views a path as interleaved `[x, y]` coordinates.
    #[inline]
    #[must_use]
    pub fn flatten(path: &[TilePos]) -> &[i32] {
        bytemuck::cast_slice(path)
    }

    /// Views interleaved `[x, y]` coordinates as tile positions.
    ///
    /// A trailing unpaired coordinate is ignored.
    #[inline]
    #[must_use]
    pub fn from_flat(flat: &[i32]) -> &[TilePos] {
        bytemuck::cast_slice(&flat[..flat.len() & !1])
    }
}

impl From<(i32, i32)> for TilePos {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

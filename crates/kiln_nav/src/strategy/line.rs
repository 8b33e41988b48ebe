//! Direct line: diagonal until one axis lines up, then straight.
//! Terrain is ignored entirely.

use kiln_core::geometry::chebyshev;

use crate::tile::TilePos;

pub(crate) fn direct_line(start: TilePos, end: TilePos) -> Vec<TilePos> {
    let sx = (end.x - start.x).signum();
    let sy = (end.y - start.y).signum();
    let mut path = Vec::with_capacity(chebyshev(end.x - start.x, end.y - start.y) as usize + 1);
    let mut current = start;
    while current != end {
        path.push(current);
        if current.x != end.x {
            current.x += sx;
        }
        if current.y != end.y {
            current.y += sy;
        }
    }
    path.push(end);
    path
}

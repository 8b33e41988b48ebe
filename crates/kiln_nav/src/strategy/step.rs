//! Immediate step: hop toward the goal, trying the target direction first
//! and fanning out by 45° until a free, unvisited neighbour is found.

use crate::direction::Direction;
use crate::scratch::SearchState;
use crate::strategy::SearchContext;
use crate::tile::TilePos;

/// Offsets from the target direction, in probe order.
const PROBE_ORDER: [usize; 8] = [0, 1, 7, 2, 6, 3, 5, 4];

pub(crate) fn immediate_step(
    ctx: &SearchContext<'_>,
    state: &mut SearchState,
    max_hops: u32,
) -> Vec<TilePos> {
    state.begin();
    let mut path = vec![ctx.start];
    if let Some(i) = ctx.grid.index(ctx.start) {
        state.discover(i, None, 0.0);
    }

    let mut current = ctx.start;
    for _ in 0..max_hops {
        let target = Direction::toward(
            f64::from(ctx.end.x - current.x),
            f64::from(ctx.end.y - current.y),
        );
        let open = ctx.open_directions(current);

        let next = PROBE_ORDER
            .iter()
            .map(|&k| Direction::from_index(target.index() + k))
            .filter(|&dir| open.contains(dir))
            .map(|dir| current.step(dir))
            .find_map(|pos| {
                ctx.grid
                    .index(pos)
                    .filter(|&i| !state.is_discovered(i))
                    .map(|i| (pos, i))
            });

        let Some((pos, index)) = next else {
            break;
        };
        state.discover(index, None, 0.0);
        path.push(pos);
        current = pos;
        if current == ctx.end {
            break;
        }
    }

    if path.len() < 2 {
        return Vec::new();
    }
    path
}

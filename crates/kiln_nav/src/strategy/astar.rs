//! Bounded A*. Optimal whenever the goal is expanded within budget; if the
//! budget runs out after the goal was discovered, the best-known route to it
//! is returned.

use crate::scratch::SearchState;
use crate::strategy::SearchContext;
use crate::tile::TilePos;

pub(crate) fn bounded_astar(
    ctx: &SearchContext<'_>,
    state: &mut SearchState,
    max_expansions: u32,
) -> Vec<TilePos> {
    let (Some(start), Some(end)) = (ctx.grid.index(ctx.start), ctx.grid.index(ctx.end)) else {
        return Vec::new();
    };

    state.begin();
    state.discover(start, None, 0.0);
    let h = ctx.heuristic(ctx.start);
    state.push(start, h, h);

    let mut expansions = 0u32;
    while let Some(node) = state.pop() {
        let index = node.index as usize;
        if state.is_closed(index) {
            continue;
        }
        if expansions >= max_expansions {
            tracing::trace!(budget = max_expansions, "A* search budget exhausted");
            break;
        }
        expansions += 1;
        state.close(index);

        if index == end {
            break;
        }
        let current = ctx.grid.position(index);
        let g = state.cost(index);
        for (next, next_index) in ctx.neighbours(current) {
            if state.is_closed(next_index) {
                continue;
            }
            let tentative = g + ctx.metric.distance(current, next);
            if state.is_discovered(next_index) && tentative >= state.cost(next_index) {
                continue;
            }
            state.discover(next_index, Some(index), tentative);
            let h = ctx.heuristic(next);
            state.push(next_index, tentative + h, h);
        }
    }

    state.reconstruct(ctx.grid, start, end)
}

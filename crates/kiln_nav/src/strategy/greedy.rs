//! Greedy best-first: always expand the frontier node closest to the goal.
//! A node's parent is fixed when it is first discovered.

use crate::scratch::SearchState;
use crate::strategy::SearchContext;
use crate::tile::TilePos;

pub(crate) fn greedy_best_first(
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
        if expansions >= max_expansions {
            tracing::trace!(budget = max_expansions, "greedy search budget exhausted");
            break;
        }
        expansions += 1;

        let index = node.index as usize;
        if index == end {
            break;
        }
        let current = ctx.grid.position(index);
        for (next, next_index) in ctx.neighbours(current) {
            if state.is_discovered(next_index) {
                continue;
            }
            state.discover(next_index, Some(index), 0.0);
            let h = ctx.heuristic(next);
            state.push(next_index, h, h);
        }
    }

    state.reconstruct(ctx.grid, start, end)
}

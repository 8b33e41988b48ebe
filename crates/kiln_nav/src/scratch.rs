//! Reusable per-query search state.
//!
//! Tables are sized to the grid once and invalidated by generation stamps,
//! so a query only pays for the cells it touches.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use kiln_core::StampBuffer;

use crate::grid::Grid;
use crate::tile::TilePos;

/// Parent sentinel for the start node.
const NO_PARENT: u32 = u32::MAX;

/// Frontier entry. Orders as a min-heap on `f`, then `h`, then insertion order.
#[derive(Clone, Copy, Debug)]
pub(crate) struct OpenNode {
    pub f: f64,
    pub h: f64,
    pub seq: u64,
    pub index: u32,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: reverse every key.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.h.total_cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Parent/cost tables plus the open list for one search at a time.
#[derive(Debug)]
pub(crate) struct SearchState {
    parent: Vec<u32>,
    cost: Vec<f64>,
    discovered: StampBuffer,
    closed: StampBuffer,
    open: BinaryHeap<OpenNode>,
    seq: u64,
}

impl SearchState {
    pub fn new(cells: usize) -> Self {
        Self {
            parent: vec![NO_PARENT; cells],
            cost: vec![0.0; cells],
            discovered: StampBuffer::new(cells),
            closed: StampBuffer::new(cells),
            open: BinaryHeap::new(),
            seq: 0,
        }
    }

    /// Forgets the previous search.
    pub fn begin(&mut self) {
        self.discovered.advance();
        self.closed.advance();
        self.open.clear();
        self.seq = 0;
    }

    /// Records `index` as reached from `parent` at cost `g`.
    #[inline]
    pub fn discover(&mut self, index: usize, parent: Option<usize>, g: f64) {
        self.discovered.mark(index);
        self.parent[index] = parent.map_or(NO_PARENT, |p| p as u32);
        self.cost[index] = g;
    }

    #[inline]
    pub fn is_discovered(&self, index: usize) -> bool {
        self.discovered.is_marked(index)
    }

    /// Best known cost to `index`. Only meaningful once discovered.
    #[inline]
    pub fn cost(&self, index: usize) -> f64 {
        self.cost[index]
    }

    #[inline]
    pub fn close(&mut self, index: usize) {
        self.closed.mark(index);
    }

    #[inline]
    pub fn is_closed(&self, index: usize) -> bool {
        self.closed.is_marked(index)
    }

    #[inline]
    pub fn push(&mut self, index: usize, f: f64, h: f64) {
        self.open.push(OpenNode {
            f,
            h,
            seq: self.seq,
            index: index as u32,
        });
        self.seq += 1;
    }

    #[inline]
    pub fn pop(&mut self) -> Option<OpenNode> {
        self.open.pop()
    }

    /// Walks parent links from `end` back to `start`.
    ///
    /// Empty if `end` was never discovered.
    pub fn reconstruct(&self, grid: &Grid, start: usize, end: usize) -> Vec<TilePos> {
        if !self.is_discovered(end) {
            return Vec::new();
        }
        let mut path = Vec::new();
        let mut index = end;
        loop {
            path.push(grid.position(index));
            if index == start {
                break;
            }
            let parent = self.parent[index];
            if parent == NO_PARENT || path.len() > grid.len() {
                return Vec::new();
            }
            index = parent as usize;
        }
        path.reverse();
        path
    }
}

/// Everything a query borrows mutably from its path finder.
#[derive(Debug)]
pub(crate) struct Scratch {
    /// Cells blocked by the current query's dynamic obstacles.
    pub overlay: StampBuffer,
    pub search: SearchState,
}

impl Scratch {
    pub fn new(cells: usize) -> Self {
        Self {
            overlay: StampBuffer::new(cells),
            search: SearchState::new(cells),
        }
    }
}

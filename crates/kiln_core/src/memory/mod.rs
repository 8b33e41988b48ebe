//! # Memory Management
//!
//! Scratch storage that is allocated once and reset in O(1) between uses.
//!
//! ## Design Philosophy
//!
//! A search over a 512×512 grid touches a few hundred cells, not 262,144.
//! Clearing per-cell tables before every query would dominate the cost, so
//! tables are tagged with a generation number instead:
//! - Advancing the generation invalidates every entry at once
//! - Entries are only trusted when their stamp matches the current generation

mod stamps;

pub use stamps::StampBuffer;

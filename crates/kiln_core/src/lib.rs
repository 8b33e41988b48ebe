//! # KILN Core
//!
//! Shared primitives for the KILN compute layer:
//! - Stateless 2D geometry tests (rectangles, circles, points)
//! - Generation-stamped scratch buffers that reset in O(1)
//! - TOML configuration loading with validation
//!
//! ## Architecture Rules
//!
//! 1. **Pure functions** - geometry never allocates and never panics
//! 2. **Reusable scratch** - per-query state lives in buffers owned by the caller
//! 3. **Config at startup** - parsed once, validated once
//!
//! ## Example
//!
//! ```rust
//! use kiln_core::geometry::{circle_overlap, point_in_rect};
//!
//! assert!(circle_overlap(0.0, 0.0, 10.0, 15.0, 0.0, 10.0));
//! assert!(point_in_rect(10.0, 10.0, 0.0, 0.0, 10.0, 10.0));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod geometry;
pub mod memory;

pub use config::{load_toml_file, load_toml_str, ConfigError, ConfigResult, Validate};
pub use geometry::{Aabb, Circle};
pub use memory::StampBuffer;

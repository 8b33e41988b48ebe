//! # KILN Spatial
//!
//! Broad-phase proximity index for moving circles.
//!
//! Entities are bucketed by the grid cell containing their centre. Radius
//! and collision queries widen their scan by the largest radius stored, so
//! an overlap that straddles cells is never missed.
//!
//! ## Example
//!
//! ```rust
//! use kiln_spatial::SpatialHash;
//!
//! let mut hash = SpatialHash::new(64.0);
//! hash.upsert(1, 100.0, 100.0, 16.0, 0);
//! hash.upsert(2, 110.0, 100.0, 16.0, 1);
//!
//! assert_eq!(hash.query_radius(100.0, 100.0, 50.0), vec![1, 2]);
//! assert_eq!(hash.detect_all_collisions(), vec![(1, 2)]);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod entity;
pub mod hash;

pub use config::SpatialConfig;
pub use entity::{PositionUpdate, SpatialEntity};
pub use hash::SpatialHash;

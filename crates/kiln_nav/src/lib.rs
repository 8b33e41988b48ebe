//! # KILN Nav
//!
//! Tile grid pathfinding with a closed set of strategies, each trading
//! optimality for latency:
//!
//! | Strategy | Default budget | Guarantee |
//! |---|---|---|
//! | [`PathStrategy::ImmediateStep`] | 10 hops | none, greedy hops toward the goal |
//! | [`PathStrategy::GreedyBestFirst`] | 100 expansions | none |
//! | [`PathStrategy::BoundedAStar`] | 100 expansions | optimal if the budget suffices |
//! | [`PathStrategy::BoundedAStarLarge`] | 500 expansions | optimal if the budget suffices |
//! | [`PathStrategy::DirectLine`] | - | ignores terrain |
//!
//! ## Example
//!
//! ```rust
//! use kiln_nav::{PathFinder, PathStrategy, TilePos};
//!
//! let mut finder = PathFinder::new(100, 100);
//! finder.set_obstacle(5, 5, true, true);
//!
//! let path = finder.find_path(
//!     TilePos::new(0, 0),
//!     TilePos::new(10, 10),
//!     PathStrategy::BoundedAStarLarge,
//!     8,
//! );
//! assert_eq!(path.first(), Some(&TilePos::new(0, 0)));
//! assert_eq!(path.last(), Some(&TilePos::new(10, 10)));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod direction;
pub mod error;
pub mod grid;
pub mod pathfinder;
mod scratch;
mod strategy;
pub mod tile;

pub use config::{NavConfig, StrategyBudgets, TileMetric};
pub use direction::{Direction, DirectionSet};
pub use error::{NavError, NavResult};
pub use grid::Grid;
pub use pathfinder::{PathFinder, PathStrategy};
pub use tile::TilePos;

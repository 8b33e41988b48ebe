//! # KILN
//!
//! Native compute layer for a 2D tile-based RPG runtime.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                            KILN                              │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐  │
//! │  │  kiln_nav    │   │ kiln_spatial │   │   kiln_sprite    │  │
//! │  │              │   │              │   │                  │  │
//! │  │ • Grid       │   │ • Buckets    │   │ • ASF / MPC      │  │
//! │  │ • 5 searches │   │ • Radius     │   │ • MSF zstd / LZ4 │  │
//! │  │ • Budgets    │   │ • Collisions │   │ • Conversion     │  │
//! │  └──────┬───────┘   └──────┬───────┘   └────────┬─────────┘  │
//! │         └──────────────────┼────────────────────┘            │
//! │                     ┌──────┴───────┐                         │
//! │                     │  kiln_core   │                         │
//! │                     │ geometry,    │                         │
//! │                     │ stamps, cfg  │                         │
//! │                     └──────────────┘                         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: one TOML file for every component
//! - `batch`: file and directory conversion behind the `kiln_convert` binary

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod batch;
pub mod config;

// Re-export the components
pub use kiln_core as core;
pub use kiln_nav as nav;
pub use kiln_spatial as spatial;
pub use kiln_sprite as sprite;

pub use batch::{convert_path, verify_msf, BatchError, BatchResult, ConvertReport, MsfSummary};
pub use config::KilnConfig;

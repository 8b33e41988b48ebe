//! # Container Codecs
//!
//! One module per container format. Each exposes `parse` plus the decode
//! entry points for the layouts it supports.

pub mod asf;
pub mod mpc;
pub mod msf;

//! # Nav Error Types

use thiserror::Error;

/// Errors that can occur while configuring a path finder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    /// An obstacle bitmap does not cover the grid exactly.
    #[error("obstacle bitmap size mismatch: expected {expected} bytes, got soft={soft} hard={hard}")]
    BitmapSize {
        /// Cells in the grid.
        expected: usize,
        /// Length of the soft bitmap.
        soft: usize,
        /// Length of the hard bitmap.
        hard: usize,
    },
}

/// Result type for nav operations.
pub type NavResult<T> = Result<T, NavError>;

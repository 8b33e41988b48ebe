//! # Configuration Loading
//!
//! Every KILN component takes a plain `serde` struct. This module turns TOML
//! text or files into those structs and runs their validation once, at startup.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The TOML text is malformed or has the wrong shape.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Range checks run after deserialization.
pub trait Validate {
    /// Returns `ConfigError::Invalid` describing the first bad field.
    ///
    /// # Errors
    ///
    /// Fails when a field is outside its accepted range.
    fn validate(&self) -> ConfigResult<()>;
}

/// Parses and validates a config from TOML text.
///
/// # Errors
///
/// Returns `Parse` for malformed TOML and `Invalid` when validation fails.
pub fn load_toml_str<T>(text: &str) -> ConfigResult<T>
where
    T: DeserializeOwned + Validate,
{
    let config: T = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Reads, parses and validates a config file.
///
/// # Errors
///
/// Returns `Io` if the file cannot be read, otherwise as [`load_toml_str`].
pub fn load_toml_file<T>(path: impl AsRef<Path>) -> ConfigResult<T>
where
    T: DeserializeOwned + Validate,
{
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = load_toml_str(&text)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

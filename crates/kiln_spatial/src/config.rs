//! # Spatial Configuration

use kiln_core::{ConfigError, ConfigResult, Validate};
use serde::{Deserialize, Serialize};

/// Spatial hash configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialConfig {
    /// Edge length of one bucket in world units. Values below 1 are raised to 1.
    pub cell_size: f32,
    /// Entity slots reserved up front.
    pub initial_capacity: usize,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            cell_size: 64.0,
            initial_capacity: 1024,
        }
    }
}

impl Validate for SpatialConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "cell_size must be positive, got {}",
                self.cell_size
            )));
        }
        Ok(())
    }
}

//! # Runtime Configuration
//!
//! Every section is optional; missing sections and fields take their defaults.
//!
//! ```toml
//! [nav.budgets]
//! astar_large = 800
//!
//! [spatial]
//! cell_size = 32.0
//!
//! [sprite]
//! max_frame_dimension = 1024
//! ```

use std::path::Path;

use kiln_core::{load_toml_file, load_toml_str, ConfigResult, Validate};
use kiln_nav::{NavConfig, PathFinder};
use kiln_spatial::{SpatialConfig, SpatialHash};
use kiln_sprite::{DecodeLimits, SpriteDecoder};
use serde::{Deserialize, Serialize};

/// Configuration for all KILN components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KilnConfig {
    /// Path finder budgets and metric.
    pub nav: NavConfig,
    /// Spatial hash cell size and capacity.
    pub spatial: SpatialConfig,
    /// Container decode limits.
    pub sprite: DecodeLimits,
}

impl KilnConfig {
    /// Parses and validates TOML text.
    ///
    /// # Errors
    ///
    /// `Parse` for malformed TOML, `Invalid` when a section fails validation.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        load_toml_str(text)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, otherwise as [`Self::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        load_toml_file(path)
    }

    /// Path finder over a `width` x `height` grid.
    #[must_use]
    pub fn path_finder(&self, width: i32, height: i32) -> PathFinder {
        PathFinder::with_config(width, height, self.nav)
    }

    /// Empty spatial hash.
    #[must_use]
    pub fn spatial_hash(&self) -> SpatialHash {
        SpatialHash::with_config(self.spatial)
    }

    /// Container decoder.
    #[must_use]
    pub const fn sprite_decoder(&self) -> SpriteDecoder {
        SpriteDecoder::new(self.sprite)
    }
}

impl Validate for KilnConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.nav.validate()?;
        self.spatial.validate()?;
        self.sprite.validate()
    }
}

//! # Decode Limits
//!
//! Upper bounds applied while parsing headers. Anything above them is
//! treated as malformed input before a single output byte is sized.

use kiln_core::{ConfigError, ConfigResult, Validate};
use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, DecodeResult};

/// Header sanity limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeLimits {
    /// Largest accepted frame or canvas edge, in pixels.
    pub max_frame_dimension: u32,
    /// Largest accepted frame count.
    pub max_frame_count: u32,
    /// Largest accepted palette.
    pub max_palette_size: u32,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_frame_dimension: 2048,
            max_frame_count: 65_535,
            max_palette_size: 256,
        }
    }
}

impl DecodeLimits {
    /// Returns true if both edges are within `0..=max_frame_dimension`.
    #[inline]
    #[must_use]
    pub fn dimensions_fit(&self, width: i64, height: i64) -> bool {
        let max = i64::from(self.max_frame_dimension);
        (0..=max).contains(&width) && (0..=max).contains(&height)
    }

    pub(crate) fn check_dimensions(&self, width: i64, height: i64) -> DecodeResult<()> {
        if self.dimensions_fit(width, height) {
            Ok(())
        } else {
            Err(DecodeError::FrameTooLarge {
                width,
                height,
                max: self.max_frame_dimension,
            })
        }
    }

    pub(crate) fn check_frame_count(&self, count: i64) -> DecodeResult<()> {
        let max = i64::from(self.max_frame_count);
        if (0..=max).contains(&count) {
            Ok(())
        } else {
            Err(DecodeError::ImpossibleFrameCount { count, max })
        }
    }

    pub(crate) fn check_palette(&self, count: i64) -> DecodeResult<()> {
        if (0..=i64::from(self.max_palette_size)).contains(&count) {
            Ok(())
        } else {
            Err(DecodeError::PaletteTooLarge {
                count,
                max: self.max_palette_size,
            })
        }
    }
}

impl Validate for DecodeLimits {
    fn validate(&self) -> ConfigResult<()> {
        if self.max_frame_dimension == 0 {
            return Err(ConfigError::Invalid("max_frame_dimension must be non-zero".into()));
        }
        if self.max_frame_count == 0 {
            return Err(ConfigError::Invalid("max_frame_count must be non-zero".into()));
        }
        if self.max_palette_size == 0 {
            return Err(ConfigError::Invalid("max_palette_size must be non-zero".into()));
        }
        Ok(())
    }
}

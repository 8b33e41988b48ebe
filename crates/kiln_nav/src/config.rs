//! # Nav Configuration
//!
//! Strategy budgets and the tile cost metric. Loaded once at startup.
//!
//! ```toml
//! [budgets]
//! immediate_step = 10
//! greedy = 100
//! astar = 100
//! astar_large = 500
//!
//! [metric]
//! kind = "isometric"
//! half_width = 32.0
//! half_height = 16.0
//! ```

use kiln_core::{ConfigError, ConfigResult, Validate};
use serde::{Deserialize, Serialize};

use crate::tile::TilePos;

/// Path finder configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Expansion budgets per strategy.
    pub budgets: StrategyBudgets,
    /// Step cost and heuristic.
    pub metric: TileMetric,
}

impl Validate for NavConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.budgets.validate()?;
        self.metric.validate()
    }
}

/// Expansion caps for the bounded strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyBudgets {
    /// Maximum hops for immediate-step.
    pub immediate_step: u32,
    /// Maximum node expansions for greedy best-first.
    pub greedy: u32,
    /// Maximum node expansions for bounded A*.
    pub astar: u32,
    /// Maximum node expansions for bounded A* with the large budget.
    pub astar_large: u32,
}

impl Default for StrategyBudgets {
    fn default() -> Self {
        Self {
            immediate_step: 10,
            greedy: 100,
            astar: 100,
            astar_large: 500,
        }
    }
}

impl Validate for StrategyBudgets {
    fn validate(&self) -> ConfigResult<()> {
        let budgets = [
            ("immediate_step", self.immediate_step),
            ("greedy", self.greedy),
            ("astar", self.astar),
            ("astar_large", self.astar_large),
        ];
        for (name, value) in budgets {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("budgets.{name} must be non-zero")));
            }
        }
        Ok(())
    }
}

/// How tile-to-tile movement is costed.
///
/// The same metric drives step cost and heuristic, which keeps the
/// heuristic consistent and A* optimal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TileMetric {
    /// Euclidean distance between tile centres after isometric projection:
    /// `px = (x - y) * half_width`, `py = (x + y) * half_height`.
    Isometric {
        /// Half of a tile's on-screen width in pixels.
        half_width: f64,
        /// Half of a tile's on-screen height in pixels.
        half_height: f64,
    },
    /// One per orthogonal step, `sqrt(2)` per diagonal step.
    Octile,
}

impl Default for TileMetric {
    fn default() -> Self {
        Self::Isometric {
            half_width: 32.0,
            half_height: 16.0,
        }
    }
}

impl TileMetric {
    /// Cost of travelling from `a` to `b`.
    #[inline]
    #[must_use]
    pub fn distance(self, a: TilePos, b: TilePos) -> f64 {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        match self {
            Self::Isometric {
                half_width,
                half_height,
            } => {
                let px = f64::from(dx - dy) * half_width;
                let py = f64::from(dx + dy) * half_height;
                (px * px + py * py).sqrt()
            }
            Self::Octile => kiln_core::geometry::octile(dx, dy),
        }
    }
}

impl Validate for TileMetric {
    fn validate(&self) -> ConfigResult<()> {
        match *self {
            Self::Isometric {
                half_width,
                half_height,
            } if !(half_width.is_finite()
                && half_height.is_finite()
                && half_width > 0.0
                && half_height > 0.0) =>
            {
                Err(ConfigError::Invalid(
                    "metric half_width and half_height must be positive".into(),
                ))
            }
            _ => Ok(()),
        }
    }
}

//! Simulation tunables.
//!
//! Defaults reproduce the reference economy and combat pacing. A RON file
//! may override any subset of fields:
//!
//! ```ron
//! SimConfig(
//!     initial_gold: 2000,
//!     accrual_period_ms: 1000,
//! )
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Target frame rate for real-time drivers.
pub const TICK_RATE: u32 = 60;

/// Tunable simulation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Gold at start and after reset.
    pub initial_gold: u32,
    /// Elixir at start and after reset.
    pub initial_elixir: u32,
    /// Deployable troops at start and after reset.
    pub initial_troops: u32,
    /// Extra spacing required between structure footprints.
    pub placement_clearance: i32,
    /// Distance past a target's half-size at which units stop and attack.
    pub attack_range_padding: i32,
    /// Ticks a unit waits between attacks.
    pub attack_cooldown_ticks: u32,
    /// Wall-clock length of one accrual period.
    pub accrual_period_ms: u64,
    /// Gold credited per gold producer per period.
    pub gold_per_producer: u32,
    /// Elixir credited per elixir producer per period.
    pub elixir_per_producer: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            initial_gold: 1000,
            initial_elixir: 1000,
            initial_troops: 10,
            placement_clearance: 10,
            attack_range_padding: 20,
            attack_cooldown_ticks: 30,
            accrual_period_ms: 2000,
            gold_per_producer: 5,
            elixir_per_producer: 3,
        }
    }
}

impl SimConfig {
    /// Parse a config from RON text.
    ///
    /// `origin` names the source in error messages.
    pub fn from_ron_str(text: &str, origin: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| GameError::ConfigParseError {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// Load a config from a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| GameError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_ron_str(&text, &path.display().to_string())?;
        tracing::info!(path = %path.display(), "Loaded simulation config");
        Ok(config)
    }

    /// Accrual period as a [`Duration`].
    #[must_use]
    pub const fn accrual_period(&self) -> Duration {
        Duration::from_millis(self.accrual_period_ms)
    }
}

//! Planner configuration
//!
//! Mirrors the settings a player enters next to the attack list: world and
//! unit speed of the game world, the movement boost, how long after an attack
//! an existing support still counts, and the automatic add-ons.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{PlannerError, Result};
use crate::core::types::{TimeWindow, Timestamp};
use crate::matching::{AutoScouts, EngineParams, SpeedUnitToggles};
use crate::units::{boost_from_percent, SpeedParams};

/// Configuration for one planning session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Game speed of the world (from the world's settings page)
    pub world_speed: f64,

    /// Unit speed modifier of the world
    pub unit_speed: f64,

    /// Movement bonus in percent, 0..=100
    ///
    /// Values outside the range are ignored (no boost), matching what the
    /// game itself accepts.
    pub boost_percent: i64,

    /// Seconds after an attack in which an arriving support still covers it
    ///
    /// Negative values are treated as 0.
    pub support_grace_seconds: i64,

    /// Speed units that may be added automatically; missing units are enabled
    pub auto_speed_units: SpeedUnitToggles,

    pub auto_scouts: AutoScouts,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            world_speed: 1.0,
            unit_speed: 1.0,
            boost_percent: 0,
            support_grace_seconds: 0,
            auto_speed_units: SpeedUnitToggles::all_enabled(),
            auto_scouts: AutoScouts::default(),
        }
    }
}

impl PlannerConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PlannerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn speed_params(&self) -> SpeedParams {
        SpeedParams::new(
            self.world_speed,
            self.unit_speed,
            boost_from_percent(self.boost_percent),
        )
    }

    /// Grace period with negative values clamped to 0
    pub fn grace_seconds(&self) -> i64 {
        if self.support_grace_seconds < 0 {
            tracing::warn!(
                "Negative support grace {}s, using 0",
                self.support_grace_seconds
            );
            return 0;
        }
        self.support_grace_seconds
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        self.speed_params().validate()?;

        for unit in self.auto_speed_units.0.keys() {
            if !unit.is_speed_eligible() {
                return Err(PlannerError::InvalidConfig(format!(
                    "{} cannot be added as a speed unit",
                    unit
                )));
            }
        }

        Ok(())
    }

    /// Engine parameters for a run at `now` restricted to `windows`
    pub fn engine_params(
        &self,
        now: Timestamp,
        windows: Vec<TimeWindow>,
    ) -> Result<EngineParams> {
        if !(0..=100).contains(&self.boost_percent) {
            tracing::warn!(
                "Boost percentage {} outside 0..=100, using no boost",
                self.boost_percent
            );
        }
        let params = EngineParams::new(now)
            .with_speed(self.speed_params())
            .with_speed_units(self.auto_speed_units.clone())
            .with_auto_scouts(self.auto_scouts)
            .with_windows(windows);
        params.validate()?;
        Ok(params)
    }
}

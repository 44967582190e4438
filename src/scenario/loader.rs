//! Load planning scenarios from TOML files
//!
//! A scenario bundles everything one planning session needs: config, attacks,
//! supports, own settlements, tab templates and send windows. Timestamps are
//! RFC 3339 strings with an offset, coordinates are `"x|y"` strings.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::config::PlannerConfig;
use crate::core::error::{PlannerError, Result};
use crate::core::types::{Attack, Support, TimeWindow, Timestamp};
use crate::matching::{Settlement, TabTemplate};

/// Raw send window as written in a scenario file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSpec {
    pub from: Timestamp,
    pub to: Timestamp,
}

/// A send window from the scenario that could not be used
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowError {
    /// Position in the scenario's window list
    pub index: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub config: PlannerConfig,
    /// Fixed reference time; callers fall back to the clock when absent
    pub now: Option<Timestamp>,
    pub templates: Vec<TabTemplate>,
    pub attacks: Vec<Attack>,
    pub supports: Vec<Support>,
    pub settlements: Vec<Settlement>,
    pub windows: Vec<WindowSpec>,
}

impl Scenario {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(content)?;
        scenario.config.validate()?;
        Ok(scenario)
    }

    /// Valid send windows plus one error per rejected window
    pub fn time_windows(&self) -> Result<(Vec<TimeWindow>, Vec<WindowError>)> {
        let pairs: Vec<_> = self.windows.iter().map(|w| (w.from, w.to)).collect();
        let (windows, errors) = TimeWindow::collect_valid(&pairs)?;
        let errors = errors
            .into_iter()
            .map(|(index, err)| WindowError {
                index,
                message: err.to_string(),
            })
            .collect();
        Ok((windows, errors))
    }
}

/// Read and parse a scenario file
pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let content = fs::read_to_string(path).map_err(|e| {
        PlannerError::InvalidScenario(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let scenario = Scenario::from_toml_str(&content)?;

    tracing::info!(
        "Loaded scenario {}: {} attacks, {} supports, {} settlements, {} templates",
        path.display(),
        scenario.attacks.len(),
        scenario.supports.len(),
        scenario.settlements.len(),
        scenario.templates.len()
    );

    Ok(scenario)
}

//! Scenario files and the filter + match pipeline run on them

pub mod loader;

pub use loader::{load_scenario, Scenario, WindowError, WindowSpec};

use crate::core::error::Result;
use crate::core::types::{Attack, Timestamp};
use crate::matching::{filter_covered_attacks, MatchReport, TabMatcher};

/// Everything one planning pass produces
#[derive(Debug, Clone)]
pub struct PlanningOutcome {
    /// Attacks dropped because a support already covers them
    pub covered: Vec<Attack>,
    /// Send windows dropped because `to` lies before `from`
    pub window_errors: Vec<WindowError>,
    pub report: MatchReport,
}

/// Filter covered attacks, then match the rest
pub fn plan_scenario(scenario: &Scenario, now: Timestamp) -> Result<PlanningOutcome> {
    let (windows, window_errors) = scenario.time_windows()?;
    let params = scenario.config.engine_params(now, windows)?;
    let matcher = TabMatcher::new(params)?;

    let filtered = filter_covered_attacks(
        &scenario.attacks,
        &scenario.supports,
        scenario.config.grace_seconds(),
    );
    let report = matcher.run(&filtered.kept, &scenario.settlements, &scenario.templates)?;

    Ok(PlanningOutcome {
        covered: filtered.removed,
        window_errors,
        report,
    })
}

//! Travel time model
//!
//! Every unit type walks a fixed number of minutes per field. World speed,
//! unit speed and an optional boost divide that base value. A mixed group
//! moves at the pace of its slowest member.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::unit_type::UnitKind;
use crate::core::error::{PlannerError, Result};

/// Multipliers applied to every base field time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedParams {
    pub world_speed: f64,
    pub unit_speed: f64,
    /// Movement bonus as a multiplier, 1.0 = no bonus
    pub boost: f64,
}

impl Default for SpeedParams {
    fn default() -> Self {
        Self {
            world_speed: 1.0,
            unit_speed: 1.0,
            boost: 1.0,
        }
    }
}

impl SpeedParams {
    pub fn new(world_speed: f64, unit_speed: f64, boost: f64) -> Self {
        Self {
            world_speed,
            unit_speed,
            boost,
        }
    }

    /// Reject values that would turn travel times into NaN, infinity or
    /// negative durations
    pub fn validate(&self) -> Result<()> {
        if !(self.world_speed.is_finite() && self.world_speed > 0.0) {
            return Err(PlannerError::InvalidConfig(format!(
                "world_speed must be a positive number, got {}",
                self.world_speed
            )));
        }
        if !(self.unit_speed.is_finite() && self.unit_speed > 0.0) {
            return Err(PlannerError::InvalidConfig(format!(
                "unit_speed must be a positive number, got {}",
                self.unit_speed
            )));
        }
        if !(self.boost.is_finite() && self.boost >= 1.0) {
            return Err(PlannerError::InvalidConfig(format!(
                "boost multiplier must be >= 1.0, got {}",
                self.boost
            )));
        }
        Ok(())
    }

    fn divisor(&self) -> f64 {
        self.world_speed * self.unit_speed * self.boost
    }
}

/// Convert a boost percentage (0..=100) into a multiplier
///
/// Out-of-range input falls back to no boost.
pub fn boost_from_percent(percent: i64) -> f64 {
    if (0..=100).contains(&percent) {
        1.0 + percent as f64 / 100.0
    } else {
        1.0
    }
}

/// Minutes one field takes for `unit`
pub fn field_time(unit: UnitKind, speed: &SpeedParams) -> f64 {
    unit.base_field_minutes() / speed.divisor()
}

/// Same as [`field_time`], resolving the unit from a name first
pub fn field_time_by_name(name: &str, speed: &SpeedParams) -> Result<f64> {
    Ok(field_time(UnitKind::from_name(name)?, speed))
}

/// Slowest unit of a group, first in iteration order on ties
pub fn slowest_unit<I>(units: I, speed: &SpeedParams) -> Option<UnitKind>
where
    I: IntoIterator<Item = UnitKind>,
{
    let mut slowest: Option<(UnitKind, f64)> = None;
    for unit in units {
        let time = field_time(unit, speed);
        match slowest {
            Some((_, best)) if time <= best => {}
            _ => slowest = Some((unit, time)),
        }
    }
    slowest.map(|(unit, _)| unit)
}

/// Minutes per field of a mixed group, `None` for an empty group
pub fn group_field_time<I>(units: I, speed: &SpeedParams) -> Option<f64>
where
    I: IntoIterator<Item = UnitKind>,
{
    slowest_unit(units, speed).map(|unit| field_time(unit, speed))
}

/// Total transit minutes of a group over `distance` fields
pub fn group_travel_minutes<I>(units: I, distance: f64, speed: &SpeedParams) -> Option<f64>
where
    I: IntoIterator<Item = UnitKind>,
{
    group_field_time(units, speed).map(|per_field| distance * per_field)
}

/// Fractional minutes as a duration, rounded to the microsecond
pub fn minutes_to_duration(minutes: f64) -> Duration {
    Duration::microseconds((minutes * 60_000_000.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_default_field_times() {
        let speed = SpeedParams::default();
        assert_eq!(field_time(UnitKind::Spear, &speed), 18.0);
        assert_eq!(field_time(UnitKind::Scout, &speed), 9.0);
    }

    #[test]
    fn test_world_and_unit_speed() {
        assert_eq!(field_time(UnitKind::Spear, &SpeedParams::new(2.0, 1.0, 1.0)), 9.0);
        assert_eq!(field_time(UnitKind::Spear, &SpeedParams::new(0.5, 1.0, 1.0)), 36.0);
        assert_eq!(
            field_time(UnitKind::HeavyCavalry, &SpeedParams::new(1.0, 2.0, 1.0)),
            5.5
        );
    }

    #[test]
    fn test_combined_modifiers() {
        let speed = SpeedParams::new(2.0, 1.5, 1.2);
        assert!(approx(field_time(UnitKind::Spear, &speed), 5.0));

        let speed = SpeedParams::new(1.3, 1.7, 1.15);
        assert!(approx(
            field_time(UnitKind::Axe, &speed),
            18.0 / (1.3 * 1.7 * 1.15)
        ));
    }

    #[test]
    fn test_field_time_by_name() {
        let speed = SpeedParams::default();
        assert_eq!(field_time_by_name("leichte kavallerie", &speed).unwrap(), 10.0);
        assert!(matches!(
            field_time_by_name("Unbekannte Einheit", &speed),
            Err(PlannerError::UnknownUnit(_))
        ));
    }

    #[test]
    fn test_boost_from_percent() {
        assert_eq!(boost_from_percent(0), 1.0);
        assert!(approx(boost_from_percent(10), 1.1));
        assert_eq!(boost_from_percent(100), 2.0);
        assert_eq!(boost_from_percent(101), 1.0);
        assert_eq!(boost_from_percent(-5), 1.0);
    }

    #[test]
    fn test_slowest_unit_dictates_group() {
        let speed = SpeedParams::default();
        let units = [UnitKind::Spear, UnitKind::HeavyCavalry, UnitKind::Sword];
        assert_eq!(slowest_unit(units, &speed), Some(UnitKind::Sword));
        assert_eq!(group_field_time(units, &speed), Some(22.0));
        assert_eq!(group_travel_minutes(units, 5.0, &speed), Some(110.0));
        assert_eq!(group_field_time(std::iter::empty(), &speed), None);
    }

    #[test]
    fn test_slowest_unit_first_on_tie() {
        let speed = SpeedParams::default();
        assert_eq!(
            slowest_unit([UnitKind::Spear, UnitKind::Axe], &speed),
            Some(UnitKind::Spear)
        );
        assert_eq!(
            slowest_unit([UnitKind::Axe, UnitKind::Spear], &speed),
            Some(UnitKind::Axe)
        );
    }

    #[test]
    fn test_validate_rejects_bad_speeds() {
        assert!(SpeedParams::default().validate().is_ok());
        assert!(SpeedParams::new(0.0, 1.0, 1.0).validate().is_err());
        assert!(SpeedParams::new(1.0, -1.0, 1.0).validate().is_err());
        assert!(SpeedParams::new(1.0, 1.0, 0.9).validate().is_err());
        assert!(SpeedParams::new(f64::NAN, 1.0, 1.0).validate().is_err());
    }

    #[test]
    fn test_minutes_to_duration() {
        assert_eq!(minutes_to_duration(1.5), Duration::seconds(90));
        assert_eq!(minutes_to_duration(0.0), Duration::zero());
    }
}

//! Core type definitions used throughout the codebase

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::core::error::{PlannerError, Result};

/// Time-zone aware timestamp used for arrivals, send times and "now"
pub type Timestamp = DateTime<FixedOffset>;

/// Grid position of a settlement
///
/// Written as `x|y` in game text. Output pads each component to three digits,
/// parsing accepts any run of digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Coordinate {
    pub x: u32,
    pub y: u32,
}

impl Coordinate {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}|{:03}", self.x, self.y)
    }
}

impl FromStr for Coordinate {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || PlannerError::InvalidCoordinate(s.to_string());

        let (x, y) = s.trim().split_once('|').ok_or_else(invalid)?;
        let parse = |part: &str| -> Result<u32> {
            let part = part.trim();
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse().map_err(|_| invalid())
        };

        Ok(Self::new(parse(x)?, parse(y)?))
    }
}

impl TryFrom<String> for Coordinate {
    type Error = PlannerError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Coordinate> for String {
    fn from(value: Coordinate) -> Self {
        value.to_string()
    }
}

/// An incoming enemy command on an allied settlement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attack {
    pub target: Coordinate,
    pub arrival: Timestamp,
    /// Free-text unit hint from the attack report, if any
    #[serde(default)]
    pub unit_hint: Option<String>,
}

impl Attack {
    pub fn new(target: Coordinate, arrival: Timestamp) -> Self {
        Self {
            target,
            arrival,
            unit_hint: None,
        }
    }

    pub fn with_unit_hint(mut self, hint: impl Into<String>) -> Self {
        self.unit_hint = Some(hint.into());
        self
    }

    /// Identity used for filtering and deduplication
    pub fn key(&self) -> AttackKey {
        AttackKey {
            target: self.target,
            arrival: self.arrival,
        }
    }
}

/// (target, arrival) pair identifying an attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttackKey {
    pub target: Coordinate,
    pub arrival: Timestamp,
}

/// A friendly reinforcement already under way
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Support {
    pub target: Coordinate,
    pub arrival: Timestamp,
}

impl Support {
    pub fn new(target: Coordinate, arrival: Timestamp) -> Self {
        Self { target, arrival }
    }
}

/// Inclusive interval in which sending is allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    from: Timestamp,
    to: Timestamp,
}

impl TimeWindow {
    pub fn new(from: Timestamp, to: Timestamp) -> Result<Self> {
        if to < from {
            return Err(PlannerError::InvalidTimeWindow {
                from: from.to_rfc3339(),
                to: to.to_rfc3339(),
            });
        }
        Ok(Self { from, to })
    }

    pub fn contains(&self, ts: Timestamp) -> bool {
        self.from <= ts && ts <= self.to
    }

    /// Build windows from raw pairs, keeping the valid ones
    ///
    /// Invalid pairs are returned alongside with their position in `pairs`.
    /// Fails only when pairs were given and none of them is valid.
    pub fn collect_valid(
        pairs: &[(Timestamp, Timestamp)],
    ) -> Result<(Vec<TimeWindow>, Vec<(usize, PlannerError)>)> {
        let mut windows = Vec::with_capacity(pairs.len());
        let mut errors = Vec::new();

        for (index, &(from, to)) in pairs.iter().enumerate() {
            match TimeWindow::new(from, to) {
                Ok(window) => windows.push(window),
                Err(err) => {
                    tracing::warn!("Skipping time window #{}: {}", index + 1, err);
                    errors.push((index, err));
                }
            }
        }

        if !pairs.is_empty() && windows.is_empty() {
            return Err(PlannerError::NoValidTimeWindows(pairs.len()));
        }

        Ok((windows, errors))
    }
}

/// True if `ts` lies in at least one window, or if there are no windows at all
pub fn in_any_window(ts: Timestamp, windows: &[TimeWindow]) -> bool {
    windows.is_empty() || windows.iter().any(|w| w.contains(ts))
}

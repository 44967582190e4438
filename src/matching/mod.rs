//! Support filtering and tab matching

pub mod candidate;
pub mod engine;
pub mod settlement;
pub mod support_filter;

pub use candidate::{AutoScouts, SpeedUnitToggles, TabTemplate};
pub use engine::{
    unmatched_attacks, EngineParams, MatchReport, TabMatch, TabMatcher, TemplateError,
};
pub use settlement::{Settlement, Troops, WorkingSet, WorkingSettlement};
pub use support_filter::{filter_covered_attacks, FilterOutcome, SupportIndex};

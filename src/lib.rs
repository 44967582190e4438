//! Tab Planner - Reinforcement matching for incoming attacks
//!
//! Drops attacks already covered by supports, then assigns each remaining
//! attack one tab from the own villages so that it lands at the attack's
//! arrival time.

pub mod core;
pub mod export;
pub mod matching;
pub mod scenario;
pub mod spatial;
pub mod units;

//! Tab matching engine
//!
//! Attacks are handled one at a time, in the order given. For each attack the
//! engine enumerates every (settlement, template, variant) candidate, computes
//! when it would have to leave, and keeps the candidate that can leave
//! earliest. The winner's units are deducted before the next attack is looked
//! at, so later attacks see what earlier ones left behind.

use ahash::AHashSet;
use ordered_float::OrderedFloat;
use serde::Serialize;

use super::candidate::{
    candidate_compositions, committed_composition, AutoScouts, SpeedUnitToggles, TabTemplate,
};
use super::settlement::{Settlement, Troops, WorkingSet, WorkingSettlement};
use crate::core::error::{PlannerError, Result};
use crate::core::types::{in_any_window, Attack, AttackKey, Coordinate, TimeWindow, Timestamp};
use crate::spatial::distance;
use crate::units::{field_time, minutes_to_duration, slowest_unit, SpeedParams, UnitKind};

/// Everything a run needs besides the attacks, settlements and templates
#[derive(Debug, Clone)]
pub struct EngineParams {
    pub speed: SpeedParams,
    pub speed_units: SpeedUnitToggles,
    pub auto_scouts: AutoScouts,
    /// Allowed send windows, empty = no restriction
    pub windows: Vec<TimeWindow>,
    /// Reference time; nothing is scheduled at or before it
    pub now: Timestamp,
}

impl EngineParams {
    pub fn new(now: Timestamp) -> Self {
        Self {
            speed: SpeedParams::default(),
            speed_units: SpeedUnitToggles::all_enabled(),
            auto_scouts: AutoScouts::default(),
            windows: Vec::new(),
            now,
        }
    }

    pub fn with_speed(mut self, speed: SpeedParams) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_speed_units(mut self, toggles: SpeedUnitToggles) -> Self {
        self.speed_units = toggles;
        self
    }

    pub fn with_auto_scouts(mut self, auto_scouts: AutoScouts) -> Self {
        self.auto_scouts = auto_scouts;
        self
    }

    pub fn with_windows(mut self, windows: Vec<TimeWindow>) -> Self {
        self.windows = windows;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.speed.validate()
    }
}

/// One planned reinforcement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabMatch {
    /// Position of the source in the caller's settlement list
    pub source_index: usize,
    pub source_name: String,
    pub source: Coordinate,
    pub target: Coordinate,
    pub send_time: Timestamp,
    pub arrival: Timestamp,
    /// Units sent, scout add-on included
    pub units: Troops,
    /// Slowest unit of the required composition
    pub slowest_unit: UnitKind,
}

impl TabMatch {
    pub fn attack_key(&self) -> AttackKey {
        AttackKey {
            target: self.target,
            arrival: self.arrival,
        }
    }
}

/// A template that could not be used in a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateError {
    pub index: usize,
    pub message: String,
}

/// Result of one matching run
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    /// One entry per matched attack, in attack order
    pub matches: Vec<TabMatch>,
    /// Attacks for which no candidate survived, in attack order
    pub unmatched: Vec<Attack>,
    pub template_errors: Vec<TemplateError>,
    /// Settlement inventories after all deductions
    pub settlements: Vec<WorkingSettlement>,
}

#[derive(Debug, Clone)]
struct Candidate {
    settlement: usize,
    send_time: Timestamp,
    distance: f64,
    required: Troops,
    scouts: u32,
    slowest: UnitKind,
}

impl Candidate {
    fn rank(&self) -> (Timestamp, OrderedFloat<f64>) {
        (self.send_time, OrderedFloat(self.distance))
    }
}

/// Greedy per-attack matcher
///
/// Holds only parameters; each call to [`TabMatcher::run`] works on its own
/// copy of the settlements, so repeated runs with the same inputs agree.
#[derive(Debug, Clone)]
pub struct TabMatcher {
    params: EngineParams,
}

impl TabMatcher {
    pub fn new(params: EngineParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn run(
        &self,
        attacks: &[Attack],
        settlements: &[Settlement],
        templates: &[TabTemplate],
    ) -> Result<MatchReport> {
        tracing::info!(
            "Matching {} attacks against {} settlements with {} templates",
            attacks.len(),
            settlements.len(),
            templates.len()
        );

        let (cores, template_errors) = resolve_templates(templates)?;
        let mut working = WorkingSet::new(settlements);
        let mut matches = Vec::new();
        let mut unmatched = Vec::new();

        for attack in attacks {
            let tab = self
                .best_candidate(attack, &working, &cores)
                .and_then(|candidate| commit(attack, candidate, &mut working));

            match tab {
                Some(tab) => {
                    tracing::debug!(
                        "Attack on {} at {}: send from {} at {}",
                        attack.target,
                        attack.arrival,
                        tab.source,
                        tab.send_time
                    );
                    matches.push(tab);
                }
                None => {
                    tracing::debug!(
                        "Attack on {} at {}: no feasible tab",
                        attack.target,
                        attack.arrival
                    );
                    unmatched.push(attack.clone());
                }
            }
        }

        tracing::info!(
            "Found {} tabs, {} attacks unmatched",
            matches.len(),
            unmatched.len()
        );

        Ok(MatchReport {
            matches,
            unmatched,
            template_errors,
            settlements: working.into_settlements(),
        })
    }

    fn best_candidate(
        &self,
        attack: &Attack,
        working: &WorkingSet,
        cores: &[Troops],
    ) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;

        for settlement in working.iter() {
            if settlement.coord == attack.target {
                continue;
            }
            let dist = distance(settlement.coord, attack.target);

            for core in cores {
                for required in
                    candidate_compositions(core, settlement, &self.params.speed_units)
                {
                    let Some(candidate) = self.evaluate(attack, settlement, dist, required)
                    else {
                        continue;
                    };
                    // Strict comparison keeps the first enumerated candidate on ties
                    if best
                        .as_ref()
                        .map_or(true, |current| candidate.rank() < current.rank())
                    {
                        best = Some(candidate);
                    }
                }
            }
        }

        best
    }

    fn evaluate(
        &self,
        attack: &Attack,
        settlement: &WorkingSettlement,
        dist: f64,
        required: Troops,
    ) -> Option<Candidate> {
        if required.is_empty() || !settlement.can_supply(&required) {
            return None;
        }

        let slowest = slowest_unit(required.keys().copied(), &self.params.speed)?;
        let minutes = dist * field_time(slowest, &self.params.speed);
        let send_time = attack
            .arrival
            .checked_sub_signed(minutes_to_duration(minutes))?;

        if send_time <= self.params.now || send_time >= attack.arrival {
            return None;
        }
        if !in_any_window(send_time, &self.params.windows) {
            return None;
        }

        let scouts = self
            .params
            .auto_scouts
            .add_on(settlement.available(UnitKind::Scout));

        Some(Candidate {
            settlement: settlement.index,
            send_time,
            distance: dist,
            required,
            scouts,
            slowest,
        })
    }
}

/// Deduct the winner's units and turn it into a match
fn commit(attack: &Attack, candidate: Candidate, working: &mut WorkingSet) -> Option<TabMatch> {
    let settlement = working.get_mut(candidate.settlement)?;
    let units = committed_composition(&candidate.required, candidate.scouts);
    settlement.deduct(&units);

    Some(TabMatch {
        source_index: settlement.index,
        source_name: settlement.name.clone(),
        source: settlement.coord,
        target: attack.target,
        send_time: candidate.send_time,
        arrival: attack.arrival,
        units,
        slowest_unit: candidate.slowest,
    })
}

/// Resolve every template's core composition
///
/// Bad templates are reported and skipped. Fails only when templates were
/// supplied and none of them is usable.
fn resolve_templates(templates: &[TabTemplate]) -> Result<(Vec<Troops>, Vec<TemplateError>)> {
    let mut cores = Vec::with_capacity(templates.len());
    let mut errors = Vec::new();

    for (index, template) in templates.iter().enumerate() {
        match template.core_composition() {
            Ok(core) => cores.push(core),
            Err(err) => {
                tracing::warn!("Skipping tab template #{}: {}", index + 1, err);
                errors.push(TemplateError {
                    index,
                    message: err.to_string(),
                });
            }
        }
    }

    if !templates.is_empty() && cores.is_empty() {
        return Err(PlannerError::NoValidTemplates(templates.len()));
    }

    Ok((cores, errors))
}

/// Attacks with no match sharing their (target, arrival) identity
pub fn unmatched_attacks(attacks: &[Attack], matches: &[TabMatch]) -> Vec<Attack> {
    let matched: AHashSet<AttackKey> = matches.iter().map(TabMatch::attack_key).collect();
    attacks
        .iter()
        .filter(|attack| !matched.contains(&attack.key()))
        .cloned()
        .collect()
}

//! Tab templates and the small candidate set derived from them
//!
//! For every (settlement, template) pair the engine looks at the template's
//! core composition plus at most one variant per speed-eligible unit. The set
//! is enumerated explicitly; there is no search.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::settlement::{Troops, WorkingSettlement};
use crate::core::error::{PlannerError, Result};
use crate::units::UnitKind;

/// Reinforcement composition as entered by the player
///
/// Unit names stay unresolved until a run starts so that a bad name only
/// disables its own template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabTemplate {
    pub units: BTreeMap<String, u32>,
}

impl TabTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, unit: impl Into<String>, count: u32) -> Self {
        self.units.insert(unit.into(), count);
        self
    }

    /// Resolve names and keep only tab-relevant units with a positive count
    ///
    /// Two spellings of the same unit make the template ambiguous and are
    /// rejected.
    pub fn core_composition(&self) -> Result<Troops> {
        let mut seen: BTreeMap<UnitKind, &str> = BTreeMap::new();
        let mut core = Troops::new();
        for (name, &count) in &self.units {
            let unit = UnitKind::from_name(name)?;
            if let Some(first) = seen.insert(unit, name) {
                return Err(PlannerError::DuplicateUnit {
                    unit: unit.to_string(),
                    first: first.to_string(),
                    second: name.clone(),
                });
            }
            if unit.is_tab_relevant() && count > 0 {
                core.insert(unit, count);
            }
        }
        Ok(core)
    }
}

/// Which speed-eligible units may be added automatically
///
/// Units without an entry are enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeedUnitToggles(pub BTreeMap<UnitKind, bool>);

impl SpeedUnitToggles {
    pub fn all_enabled() -> Self {
        Self::default()
    }

    pub fn all_disabled() -> Self {
        Self(
            UnitKind::SPEED_ELIGIBLE
                .iter()
                .map(|&unit| (unit, false))
                .collect(),
        )
    }

    pub fn set(mut self, unit: UnitKind, enabled: bool) -> Self {
        self.0.insert(unit, enabled);
        self
    }

    pub fn is_enabled(&self, unit: UnitKind) -> bool {
        self.0.get(&unit).copied().unwrap_or(true)
    }
}

/// Scouts sent along with every tab when available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoScouts {
    pub enabled: bool,
    pub count: u32,
}

impl Default for AutoScouts {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 5,
        }
    }
}

impl AutoScouts {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Number of scouts to add given what the settlement has left
    pub fn add_on(&self, available: u32) -> u32 {
        if !self.enabled {
            return 0;
        }
        available.min(self.count)
    }
}

/// Core composition plus one single-unit variant per eligible speed unit
pub fn candidate_compositions(
    core: &Troops,
    settlement: &WorkingSettlement,
    toggles: &SpeedUnitToggles,
) -> Vec<Troops> {
    let mut candidates = Vec::with_capacity(1 + UnitKind::SPEED_ELIGIBLE.len());
    candidates.push(core.clone());

    for unit in UnitKind::SPEED_ELIGIBLE {
        if core.contains_key(&unit) || !toggles.is_enabled(unit) {
            continue;
        }
        if settlement.available(unit) == 0 {
            continue;
        }
        let mut variant = core.clone();
        variant.insert(unit, 1);
        candidates.push(variant);
    }

    candidates
}

/// Units actually leaving the settlement if `required` wins
///
/// The scout add-on replaces any scout count already in `required`.
pub fn committed_composition(required: &Troops, scouts: u32) -> Troops {
    let mut committed = required.clone();
    if scouts > 0 {
        committed.insert(UnitKind::Scout, scouts);
    }
    committed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Coordinate;
    use crate::matching::settlement::{Settlement, WorkingSet};

    fn working(settlement: Settlement) -> WorkingSettlement {
        WorkingSet::new(&[settlement]).into_settlements().remove(0)
    }

    fn full_village() -> Settlement {
        Settlement::new("Dorf 1", Coordinate::new(500, 500))
            .with_troops(UnitKind::Spear, 1000)
            .with_troops(UnitKind::Sword, 1000)
            .with_troops(UnitKind::Axe, 500)
            .with_troops(UnitKind::Scout, 100)
            .with_troops(UnitKind::LightCavalry, 200)
            .with_troops(UnitKind::HeavyCavalry, 500)
            .with_troops(UnitKind::Ram, 50)
            .with_troops(UnitKind::Catapult, 100)
    }

    #[test]
    fn test_core_keeps_only_tab_relevant_units() {
        let template = TabTemplate::new()
            .with("Speerträger", 100)
            .with("Axtkämpfer", 50)
            .with("Späher", 10)
            .with("schwere kavallerie", 100);

        let core = template.core_composition().unwrap();
        assert_eq!(core.len(), 2);
        assert_eq!(core[&UnitKind::Spear], 100);
        assert_eq!(core[&UnitKind::HeavyCavalry], 100);
    }

    #[test]
    fn test_core_drops_zero_counts() {
        let core = TabTemplate::new()
            .with("spear", 0)
            .with("sword", 5)
            .core_composition()
            .unwrap();
        assert_eq!(core.len(), 1);
    }

    #[test]
    fn test_unknown_unit_invalidates_template() {
        let template = TabTemplate::new().with("spear", 10).with("Drache", 1);
        assert!(matches!(
            template.core_composition(),
            Err(PlannerError::UnknownUnit(_))
        ));
    }

    #[test]
    fn test_two_spellings_of_one_unit_rejected() {
        let template = TabTemplate::new()
            .with("spear", 100)
            .with("Speerträger", 10_000);
        assert!(matches!(
            template.core_composition(),
            Err(PlannerError::DuplicateUnit { .. })
        ));

        let template = TabTemplate::new().with("Axtkämpfer", 5).with("axe", 0);
        assert!(template.core_composition().is_err());
    }

    #[test]
    fn test_variants_for_each_available_speed_unit() {
        let settlement = working(full_village());
        let mut core = Troops::new();
        core.insert(UnitKind::Spear, 100);
        core.insert(UnitKind::HeavyCavalry, 100);

        let toggles = SpeedUnitToggles::all_enabled();
        let candidates = candidate_compositions(&core, &settlement, &toggles);

        // core + axe, scout, light, catapult, sword
        assert_eq!(candidates.len(), 6);
        assert_eq!(candidates[0], core);
        for variant in &candidates[1..] {
            assert_eq!(variant.len(), 3);
            let extra: Vec<_> = variant
                .iter()
                .filter(|(unit, _)| !core.contains_key(unit))
                .collect();
            assert_eq!(extra.len(), 1);
            assert_eq!(*extra[0].1, 1);
        }
    }

    #[test]
    fn test_no_variant_for_unit_already_in_core() {
        let settlement = working(full_village());
        let mut core = Troops::new();
        core.insert(UnitKind::Sword, 100);

        let toggles = SpeedUnitToggles::all_enabled();
        let candidates = candidate_compositions(&core, &settlement, &toggles);
        assert_eq!(candidates.len(), 5);
        assert!(candidates.iter().all(|c| c[&UnitKind::Sword] == 100));
    }

    #[test]
    fn test_disabled_and_missing_speed_units() {
        let settlement = working(
            Settlement::new("Dorf", Coordinate::new(1, 1))
                .with_troops(UnitKind::Spear, 100)
                .with_troops(UnitKind::Axe, 10)
                .with_troops(UnitKind::Catapult, 5),
        );
        let mut core = Troops::new();
        core.insert(UnitKind::Spear, 100);

        let toggles = SpeedUnitToggles::all_enabled().set(UnitKind::Catapult, false);
        let candidates = candidate_compositions(&core, &settlement, &toggles);

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1].get(&UnitKind::Axe), Some(&1));

        let toggles = SpeedUnitToggles::all_disabled();
        let candidates = candidate_compositions(&core, &settlement, &toggles);
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn test_scout_add_on() {
        let scouts = AutoScouts::default();
        assert_eq!(scouts.add_on(100), 5);
        assert_eq!(scouts.add_on(5), 5);
        assert_eq!(scouts.add_on(3), 3);
        assert_eq!(scouts.add_on(0), 0);
        assert_eq!(AutoScouts::disabled().add_on(100), 0);
        assert_eq!(AutoScouts { enabled: true, count: 0 }.add_on(100), 0);
    }

    #[test]
    fn test_committed_overrides_scout_variant() {
        let mut required = Troops::new();
        required.insert(UnitKind::Spear, 10);
        required.insert(UnitKind::Scout, 1);

        let committed = committed_composition(&required, 5);
        assert_eq!(committed[&UnitKind::Scout], 5);
        assert_eq!(committed[&UnitKind::Spear], 10);

        let committed = committed_composition(&required, 0);
        assert_eq!(committed, required);
    }
}

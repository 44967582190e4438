//! Own settlements and their troop inventories
//!
//! A matching run never touches the caller's [`Settlement`] records. It builds
//! a [`WorkingSet`] holding one [`WorkingSettlement`] per input, each with the
//! original counts and a `remaining` map that successful matches draw down.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::Coordinate;
use crate::units::UnitKind;

/// Unit counts keyed in canonical unit order
pub type Troops = BTreeMap<UnitKind, u32>;

/// A player-owned settlement as supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    #[serde(default)]
    pub name: String,
    pub coord: Coordinate,
    #[serde(default)]
    pub troops: Troops,
}

impl Settlement {
    pub fn new(name: impl Into<String>, coord: Coordinate) -> Self {
        Self {
            name: name.into(),
            coord,
            troops: Troops::new(),
        }
    }

    pub fn with_troops(mut self, unit: UnitKind, count: u32) -> Self {
        self.troops.insert(unit, count);
        self
    }
}

/// Per-run copy of a settlement that tracks depletion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkingSettlement {
    /// Position in the caller's settlement list
    pub index: usize,
    pub name: String,
    pub coord: Coordinate,
    pub original: Troops,
    pub remaining: Troops,
}

impl WorkingSettlement {
    fn from_settlement(index: usize, settlement: &Settlement) -> Self {
        Self {
            index,
            name: settlement.name.clone(),
            coord: settlement.coord,
            original: settlement.troops.clone(),
            remaining: settlement.troops.clone(),
        }
    }

    pub fn available(&self, unit: UnitKind) -> u32 {
        self.remaining.get(&unit).copied().unwrap_or(0)
    }

    /// True if every count of `units` is covered by the remaining troops
    pub fn can_supply(&self, units: &Troops) -> bool {
        units
            .iter()
            .all(|(unit, &count)| self.available(*unit) >= count)
    }

    /// Remove committed units from the remaining inventory
    pub fn deduct(&mut self, units: &Troops) {
        for (unit, &count) in units {
            if let Some(left) = self.remaining.get_mut(unit) {
                *left = left.saturating_sub(count);
            }
        }
    }
}

/// Index-addressed arena of working settlements for one run
#[derive(Debug, Clone, Default)]
pub struct WorkingSet {
    settlements: Vec<WorkingSettlement>,
}

impl WorkingSet {
    /// Deep-copy the caller's settlements
    pub fn new(settlements: &[Settlement]) -> Self {
        let settlements = settlements
            .iter()
            .enumerate()
            .map(|(index, settlement)| WorkingSettlement::from_settlement(index, settlement))
            .collect();

        Self { settlements }
    }

    pub fn len(&self) -> usize {
        self.settlements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settlements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorkingSettlement> {
        self.settlements.iter()
    }

    pub fn get(&self, index: usize) -> Option<&WorkingSettlement> {
        self.settlements.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut WorkingSettlement> {
        self.settlements.get_mut(index)
    }

    pub fn into_settlements(self) -> Vec<WorkingSettlement> {
        self.settlements
    }
}

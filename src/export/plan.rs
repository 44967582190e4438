//! Planner items handed to external attack planners
//!
//! Planning tools address villages by numeric id and units by key. This module
//! turns [`TabMatch`] records into items with exactly that shape; sending or
//! formatting them is left to the caller.

use std::collections::BTreeMap;

use ahash::AHashMap;
use serde::Serialize;

use crate::core::types::Coordinate;
use crate::matching::TabMatch;
use crate::units::UnitKind;

/// Unit keys always present in a planner item
pub const ITEM_UNIT_KEYS: [&str; 10] = [
    "spear", "sword", "axe", "spy", "light", "heavy", "ram", "catapult", "knight", "snob",
];

/// Numeric unit id used by planners for the slowest unit
pub fn planner_unit_id(key: &str) -> Option<u8> {
    let id = match key {
        "spear" => 0,
        "sword" => 1,
        "axe" => 2,
        "archer" => 3,
        "spy" => 4,
        "light" => 5,
        "marcher" => 6,
        "heavy" => 7,
        "ram" => 8,
        "catapult" => 9,
        "knight" => 10,
        "snob" => 11,
        _ => return None,
    };
    Some(id)
}

/// Coordinate to village id lookup, built from the world's `village.txt`
#[derive(Debug, Clone, Default)]
pub struct VillageIndex {
    ids: AHashMap<Coordinate, u64>,
}

impl VillageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, coord: Coordinate, id: u64) {
        self.ids.insert(coord, id);
    }

    pub fn get(&self, coord: Coordinate) -> Option<u64> {
        self.ids.get(&coord).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Parse `id,name,x,y,...` lines; malformed lines are skipped
    pub fn parse_village_txt(content: &str) -> Self {
        let mut index = Self::new();
        let mut skipped = 0usize;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split(',').collect();
            if parts.len() < 4 {
                skipped += 1;
                continue;
            }
            let (Ok(id), Ok(x), Ok(y)) = (
                parts[0].trim().parse::<u64>(),
                parts[2].trim().parse::<u32>(),
                parts[3].trim().parse::<u32>(),
            ) else {
                skipped += 1;
                continue;
            };
            index.insert(Coordinate::new(x, y), id);
        }

        if skipped > 0 {
            tracing::warn!("Skipped {} malformed village lines", skipped);
        }
        tracing::debug!("Loaded {} villages", index.len());
        index
    }
}

/// One reinforcement in planner form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanItem {
    pub source: u64,
    pub destination: u64,
    pub slowest_unit: u8,
    /// Arrival as Unix seconds
    pub arrival_time: i64,
    /// Count for every key in [`ITEM_UNIT_KEYS`], 0 when not sent
    pub units: BTreeMap<&'static str, u32>,
}

impl PlanItem {
    /// `None` when either village is missing from the index
    pub fn from_match(tab: &TabMatch, index: &VillageIndex) -> Option<Self> {
        let source = index.get(tab.source)?;
        let destination = index.get(tab.target)?;

        let mut units: BTreeMap<&'static str, u32> =
            ITEM_UNIT_KEYS.iter().map(|&key| (key, 0)).collect();
        for (unit, &count) in &tab.units {
            units.insert(unit.key(), count);
        }

        Some(Self {
            source,
            destination,
            slowest_unit: slowest_unit_id(tab.slowest_unit),
            arrival_time: tab.arrival.timestamp(),
            units,
        })
    }
}

fn slowest_unit_id(unit: UnitKind) -> u8 {
    planner_unit_id(unit.key()).unwrap_or(0)
}

/// Items in match order plus the number of matches without known villages
#[derive(Debug, Clone, Default, Serialize)]
pub struct Plan {
    pub items: Vec<PlanItem>,
    pub skipped: usize,
}

pub fn build_plan(matches: &[TabMatch], index: &VillageIndex) -> Plan {
    let mut plan = Plan::default();
    for tab in matches {
        match PlanItem::from_match(tab, index) {
            Some(item) => plan.items.push(item),
            None => {
                tracing::warn!(
                    "No village id for {} -> {}, skipping",
                    tab.source,
                    tab.target
                );
                plan.skipped += 1;
            }
        }
    }
    plan
}

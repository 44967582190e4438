//! Unit types and their base travel times
//!
//! Unit names arrive from pasted game text and config files in several
//! spellings (German display names with or without umlauts, planner keys).
//! All of them resolve through one alias table built on first use.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::PlannerError;

/// Troop type that can be sent as reinforcement
///
/// Declaration order is the canonical unit order used for deterministic
/// iteration and tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum UnitKind {
    Spear,
    Sword,
    Axe,
    Scout,
    LightCavalry,
    HeavyCavalry,
    Ram,
    Catapult,
}

impl UnitKind {
    pub const ALL: [UnitKind; 8] = [
        UnitKind::Spear,
        UnitKind::Sword,
        UnitKind::Axe,
        UnitKind::Scout,
        UnitKind::LightCavalry,
        UnitKind::HeavyCavalry,
        UnitKind::Ram,
        UnitKind::Catapult,
    ];

    /// Units that make up the body of a defensive tab
    pub const TAB_RELEVANT: [UnitKind; 3] =
        [UnitKind::Spear, UnitKind::Sword, UnitKind::HeavyCavalry];

    /// Units that may be added once to a tab to change its travel time
    pub const SPEED_ELIGIBLE: [UnitKind; 5] = [
        UnitKind::Axe,
        UnitKind::Scout,
        UnitKind::LightCavalry,
        UnitKind::Catapult,
        UnitKind::Sword,
    ];

    /// Minutes per field at world speed 1, unit speed 1, no boost
    pub fn base_field_minutes(self) -> f64 {
        match self {
            UnitKind::Spear => 18.0,
            UnitKind::Sword => 22.0,
            UnitKind::Axe => 18.0,
            UnitKind::Scout => 9.0,
            UnitKind::LightCavalry => 10.0,
            UnitKind::HeavyCavalry => 11.0,
            UnitKind::Ram => 30.0,
            UnitKind::Catapult => 30.0,
        }
    }

    /// German in-game display name
    pub fn display_name(self) -> &'static str {
        match self {
            UnitKind::Spear => "Speerträger",
            UnitKind::Sword => "Schwertkämpfer",
            UnitKind::Axe => "Axtkämpfer",
            UnitKind::Scout => "Späher",
            UnitKind::LightCavalry => "Leichte Kavallerie",
            UnitKind::HeavyCavalry => "Schwere Kavallerie",
            UnitKind::Ram => "Rammböcke",
            UnitKind::Catapult => "Katapulte",
        }
    }

    /// Key used by planning tools and the game's own data files
    pub fn key(self) -> &'static str {
        match self {
            UnitKind::Spear => "spear",
            UnitKind::Sword => "sword",
            UnitKind::Axe => "axe",
            UnitKind::Scout => "spy",
            UnitKind::LightCavalry => "light",
            UnitKind::HeavyCavalry => "heavy",
            UnitKind::Ram => "ram",
            UnitKind::Catapult => "catapult",
        }
    }

    pub fn is_tab_relevant(self) -> bool {
        Self::TAB_RELEVANT.contains(&self)
    }

    pub fn is_speed_eligible(self) -> bool {
        Self::SPEED_ELIGIBLE.contains(&self)
    }

    /// Resolve a unit name in any known spelling
    pub fn from_name(name: &str) -> Result<Self, PlannerError> {
        let normalized = normalize_name(name);
        alias_table()
            .get(normalized.as_str())
            .copied()
            .ok_or_else(|| PlannerError::UnknownUnit(name.trim().to_string()))
    }

    fn extra_aliases(self) -> &'static [&'static str] {
        match self {
            UnitKind::Spear => &["spearman", "speer"],
            UnitKind::Sword => &["swordsman", "schwert"],
            UnitKind::Axe => &["axeman", "axt"],
            UnitKind::Scout => &["scout"],
            UnitKind::LightCavalry => &["light cavalry", "lk"],
            UnitKind::HeavyCavalry => &["heavy cavalry", "sk"],
            UnitKind::Ram => &["rammbock"],
            UnitKind::Catapult => &["katapult"],
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for UnitKind {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl TryFrom<String> for UnitKind {
    type Error = PlannerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_name(&value)
    }
}

impl From<UnitKind> for String {
    fn from(value: UnitKind) -> Self {
        value.key().to_string()
    }
}

/// Trim and lower-case a unit name
fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// `ä -> ae`, `ö -> oe`, `ü -> ue`, `ß -> ss`
fn transliterate_umlauts(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        match ch {
            'ä' => out.push_str("ae"),
            'ö' => out.push_str("oe"),
            'ü' => out.push_str("ue"),
            'ß' => out.push_str("ss"),
            other => out.push(other),
        }
    }
    out
}

/// `ä -> a`, `ö -> o`, `ü -> u`
fn strip_umlauts(name: &str) -> String {
    name.chars()
        .map(|ch| match ch {
            'ä' => 'a',
            'ö' => 'o',
            'ü' => 'u',
            other => other,
        })
        .collect()
}

fn alias_table() -> &'static AHashMap<String, UnitKind> {
    static ALIASES: OnceLock<AHashMap<String, UnitKind>> = OnceLock::new();
    ALIASES.get_or_init(|| {
        let mut table = AHashMap::new();
        for unit in UnitKind::ALL {
            let display = normalize_name(unit.display_name());
            table.insert(transliterate_umlauts(&display), unit);
            table.insert(strip_umlauts(&display), unit);
            table.insert(display, unit);
            table.insert(unit.key().to_string(), unit);
            for alias in unit.extra_aliases() {
                table.insert((*alias).to_string(), unit);
            }
        }
        table
    })
}

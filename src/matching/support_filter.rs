//! Drop attacks that an existing support already covers
//!
//! An attack counts as covered when a friendly support lands on the same
//! target at the attack's arrival or up to `grace` seconds after it.

use ahash::AHashMap;
use chrono::Duration;

use crate::core::types::{Attack, Coordinate, Support, Timestamp};

/// Partition of the input attacks, both halves in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    pub kept: Vec<Attack>,
    pub removed: Vec<Attack>,
}

/// Sorted support arrivals per target
#[derive(Debug, Clone, Default)]
pub struct SupportIndex {
    arrivals: AHashMap<Coordinate, Vec<Timestamp>>,
}

impl SupportIndex {
    pub fn new(supports: &[Support]) -> Self {
        let mut arrivals: AHashMap<Coordinate, Vec<Timestamp>> = AHashMap::new();
        for support in supports {
            arrivals
                .entry(support.target)
                .or_default()
                .push(support.arrival);
        }
        for list in arrivals.values_mut() {
            list.sort_unstable();
        }
        Self { arrivals }
    }

    /// True if a support reaches `attack.target` within `[arrival, arrival + grace]`
    pub fn covers(&self, attack: &Attack, grace: Duration) -> bool {
        let Some(list) = self.arrivals.get(&attack.target) else {
            return false;
        };
        let first = list.partition_point(|&s| s < attack.arrival);
        let Some(&next) = list.get(first) else {
            return false;
        };
        match attack.arrival.checked_add_signed(grace) {
            Some(end) => next <= end,
            None => true,
        }
    }
}

/// Split attacks into uncovered (kept) and covered (removed)
///
/// Negative grace is treated as zero.
pub fn filter_covered_attacks(
    attacks: &[Attack],
    supports: &[Support],
    grace_seconds: i64,
) -> FilterOutcome {
    let grace_seconds = if grace_seconds < 0 {
        tracing::warn!("Negative support grace {}s, using 0", grace_seconds);
        0
    } else {
        grace_seconds
    };

    if supports.is_empty() {
        return FilterOutcome {
            kept: attacks.to_vec(),
            removed: Vec::new(),
        };
    }

    let index = SupportIndex::new(supports);
    let grace = Duration::try_seconds(grace_seconds).unwrap_or(Duration::MAX);
    let (removed, kept): (Vec<Attack>, Vec<Attack>) = attacks
        .iter()
        .cloned()
        .partition(|attack| index.covers(attack, grace));

    tracing::info!(
        "Support filter removed {} of {} attacks (grace {}s)",
        removed.len(),
        attacks.len(),
        grace_seconds
    );

    FilterOutcome { kept, removed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn ts(s: &str) -> Timestamp {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn attack(coord: &str, at: &str) -> Attack {
        Attack::new(coord.parse().unwrap(), ts(at))
    }

    fn support(coord: &str, at: &str) -> Support {
        Support::new(coord.parse().unwrap(), ts(at))
    }

    #[test]
    fn test_support_at_arrival_covers() {
        let attacks = [attack("500|500", "2026-01-25T12:00:00+01:00")];
        let supports = [support("500|500", "2026-01-25T12:00:00+01:00")];

        let outcome = filter_covered_attacks(&attacks, &supports, 0);
        assert!(outcome.kept.is_empty());
        assert_eq!(outcome.removed.len(), 1);
    }

    #[test]
    fn test_support_within_grace_covers() {
        let attacks = [attack("500|500", "2026-01-25T12:00:00+01:00")];
        let supports = [support("500|500", "2026-01-25T12:00:30+01:00")];

        assert_eq!(filter_covered_attacks(&attacks, &supports, 30).removed.len(), 1);
        assert_eq!(filter_covered_attacks(&attacks, &supports, 29).kept.len(), 1);
    }

    #[test]
    fn test_support_before_attack_does_not_cover() {
        let attacks = [attack("500|500", "2026-01-25T12:00:00+01:00")];
        let supports = [support("500|500", "2026-01-25T11:59:59+01:00")];

        let outcome = filter_covered_attacks(&attacks, &supports, 3600);
        assert_eq!(outcome.kept.len(), 1);
    }

    #[test]
    fn test_other_target_does_not_cover() {
        let attacks = [attack("500|500", "2026-01-25T12:00:00+01:00")];
        let supports = [support("501|500", "2026-01-25T12:00:00+01:00")];

        assert_eq!(filter_covered_attacks(&attacks, &supports, 10).kept.len(), 1);
    }

    #[test]
    fn test_negative_grace_clamped() {
        let attacks = [attack("500|500", "2026-01-25T12:00:00+01:00")];
        let supports = [support("500|500", "2026-01-25T12:00:00+01:00")];

        assert_eq!(filter_covered_attacks(&attacks, &supports, -60).removed.len(), 1);
    }

    #[test]
    fn test_unsorted_supports_and_order_preserved() {
        let attacks = [
            attack("500|500", "2026-01-25T14:00:00+01:00"),
            attack("500|500", "2026-01-25T12:00:00+01:00"),
            attack("500|500", "2026-01-25T13:00:00+01:00"),
            attack("500|500", "2026-01-25T11:00:00+01:00"),
        ];
        let supports = [
            support("500|500", "2026-01-25T14:00:05+01:00"),
            support("500|500", "2026-01-25T12:00:05+01:00"),
        ];

        let outcome = filter_covered_attacks(&attacks, &supports, 10);
        assert_eq!(outcome.removed, vec![attacks[0].clone(), attacks[1].clone()]);
        assert_eq!(outcome.kept, vec![attacks[2].clone(), attacks[3].clone()]);
    }

    #[test]
    fn test_mixed_offsets_compare_by_instant() {
        let attacks = [attack("500|500", "2026-01-25T12:00:00+01:00")];
        let supports = [support("500|500", "2026-01-25T11:00:10+00:00")];

        assert_eq!(filter_covered_attacks(&attacks, &supports, 10).removed.len(), 1);
    }

    #[test]
    fn test_no_supports_keeps_everything() {
        let attacks = [attack("500|500", "2026-01-25T12:00:00+01:00")];
        let outcome = filter_covered_attacks(&attacks, &[], 100);
        assert_eq!(outcome.kept, attacks.to_vec());
        assert!(outcome.removed.is_empty());
    }
}

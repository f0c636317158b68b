//! Conservation law verification over resource totals.
//!
//! Resources enter the game only through prospecting and move from a
//! region's deposit into character inventories (mining) and from there
//! onto the ground (drop) and back (pickup). None of these flows create or
//! destroy units, so for each resource R at every block height:
//!
//! ```text
//! carried(R) + ground_loot(R) == prospected(R) - remaining(R)
//! ```
//!
//! A violation produces a [`ConservationAnomaly`]. With clamped extraction
//! and checked arithmetic this holds by construction; the audit catches
//! state corruption.

use std::collections::{BTreeMap, BTreeSet};

use lode_types::Resource;

/// Per-resource sums of every place a resource unit can be.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceTotals {
    /// Units ever assigned to regions by prospecting.
    pub prospected: BTreeMap<Resource, u64>,
    /// Units still in region deposits.
    pub remaining: BTreeMap<Resource, u64>,
    /// Units carried by characters.
    pub carried: BTreeMap<Resource, u64>,
    /// Units lying on the ground.
    pub loot: BTreeMap<Resource, u64>,
}

impl ResourceTotals {
    /// Create empty totals.
    pub const fn new() -> Self {
        Self {
            prospected: BTreeMap::new(),
            remaining: BTreeMap::new(),
            carried: BTreeMap::new(),
            loot: BTreeMap::new(),
        }
    }

    /// Add `amount` to one bucket, returning `None` on overflow.
    pub fn add(bucket: &mut BTreeMap<Resource, u64>, resource: Resource, amount: u64) -> Option<()> {
        let entry = bucket.entry(resource).or_insert(0);
        *entry = entry.checked_add(amount)?;
        Some(())
    }
}

/// A conservation law violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConservationAnomaly {
    /// The block height at which the audit ran.
    pub height: u64,
    /// Per-resource imbalance: (`mined_out`, `held`) where `mined_out` is
    /// prospected minus remaining and `held` is carried plus ground loot.
    pub imbalances: BTreeMap<Resource, (u64, u64)>,
    /// Human-readable description.
    pub message: String,
}

impl core::fmt::Display for ConservationAnomaly {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// The result of a conservation audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConservationResult {
    /// Every resource balances.
    Balanced,
    /// One or more resources do not balance.
    Anomaly(ConservationAnomaly),
}

/// Verify the conservation law for the given totals.
pub fn verify_conservation(height: u64, totals: &ResourceTotals) -> ConservationResult {
    let all_resources: BTreeSet<Resource> = totals
        .prospected
        .keys()
        .chain(totals.remaining.keys())
        .chain(totals.carried.keys())
        .chain(totals.loot.keys())
        .copied()
        .collect();

    let mut imbalances: BTreeMap<Resource, (u64, u64)> = BTreeMap::new();

    for resource in all_resources {
        let get = |m: &BTreeMap<Resource, u64>| m.get(&resource).copied().unwrap_or(0);

        let prospected = get(&totals.prospected);
        let remaining = get(&totals.remaining);
        let Some(mined_out) = prospected.checked_sub(remaining) else {
            // More left in the ground than was ever found.
            imbalances.insert(resource, (0, remaining));
            continue;
        };
        let Some(held) = get(&totals.carried).checked_add(get(&totals.loot)) else {
            imbalances.insert(resource, (mined_out, u64::MAX));
            continue;
        };

        if mined_out != held {
            imbalances.insert(resource, (mined_out, held));
        }
    }

    if imbalances.is_empty() {
        ConservationResult::Balanced
    } else {
        let count = imbalances.len();
        ConservationResult::Anomaly(ConservationAnomaly {
            height,
            imbalances,
            message: format!(
                "CONSERVATION_ANOMALY at height {height}: {count} resource(s) do not balance",
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(prospected: u64, remaining: u64, carried: u64, loot: u64) -> ResourceTotals {
        let mut t = ResourceTotals::new();
        t.prospected.insert(Resource::RawA, prospected);
        t.remaining.insert(Resource::RawA, remaining);
        t.carried.insert(Resource::RawA, carried);
        t.loot.insert(Resource::RawA, loot);
        t
    }

    #[test]
    fn empty_totals_are_balanced() {
        assert_eq!(
            verify_conservation(0, &ResourceTotals::new()),
            ConservationResult::Balanced
        );
    }

    #[test]
    fn mined_units_split_between_inventory_and_loot() {
        assert_eq!(
            verify_conservation(7, &totals(100, 40, 25, 35)),
            ConservationResult::Balanced
        );
    }

    #[test]
    fn missing_units_are_an_anomaly() {
        let result = verify_conservation(7, &totals(100, 40, 25, 30));
        match result {
            ConservationResult::Anomaly(anomaly) => {
                assert_eq!(anomaly.height, 7);
                assert_eq!(anomaly.imbalances.get(&Resource::RawA), Some(&(60, 55)));
            }
            other => panic!("Expected Anomaly, got {other:?}"),
        }
    }

    #[test]
    fn remaining_above_prospected_is_an_anomaly() {
        let result = verify_conservation(1, &totals(10, 20, 0, 0));
        assert!(matches!(result, ConservationResult::Anomaly(_)));
    }

    #[test]
    fn add_reports_overflow() {
        let mut bucket = BTreeMap::new();
        assert_eq!(ResourceTotals::add(&mut bucket, Resource::RawC, u64::MAX), Some(()));
        assert_eq!(ResourceTotals::add(&mut bucket, Resource::RawC, 1), None);
    }
}

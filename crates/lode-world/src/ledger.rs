//! The region resource ledger.
//!
//! [`RegionLedger`] exclusively owns every region's deposit. Prospecting
//! assigns a deposit once per deposit lifecycle; mining extracts from it
//! until it is used up. Characters never hold copies of these quantities.
//!
//! Every mutation pushes an [`UndoDelta`] onto the block's [`BlockUndo`]
//! before returning, and the matching `restore_*` method reverses it.

use std::collections::BTreeMap;

use lode_journal::{BlockUndo, ResourceTotals, UndoDelta};
use lode_types::{Prospection, RegionId, RegionRecord, Resource};
use tracing::debug;

use crate::error::WorldError;

/// Deposits of all prospected regions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionLedger {
    /// Region records, by id. Regions never prospected have no entry.
    regions: BTreeMap<RegionId, RegionRecord>,
    /// Units ever assigned by prospecting, per resource.
    prospected: BTreeMap<Resource, u64>,
}

impl RegionLedger {
    /// Create an empty ledger.
    pub const fn new() -> Self {
        Self {
            regions: BTreeMap::new(),
            prospected: BTreeMap::new(),
        }
    }

    /// The full record of a region, if it has been prospected.
    pub fn record(&self, region: RegionId) -> Option<&RegionRecord> {
        self.regions.get(&region)
    }

    /// The deposit type and units left in a region.
    ///
    /// Returns `None` for regions without a mineable deposit.
    pub fn get_resource(&self, region: RegionId) -> Option<(Resource, u64)> {
        let record = self.regions.get(&region)?;
        let resource = record.resource?;
        Some((resource, record.remaining))
    }

    /// Units left in a region (zero if none).
    pub fn remaining(&self, region: RegionId) -> u64 {
        self.get_resource(region).map_or(0, |(_, remaining)| remaining)
    }

    /// All region records, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = (&RegionId, &RegionRecord)> {
        self.regions.iter()
    }

    /// Assign a freshly prospected deposit to a region.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::AlreadyAssigned`] if the region still has a
    /// deposit, [`WorldError::EmptyDeposit`] for a zero amount, or
    /// [`WorldError::ArithmeticOverflow`].
    pub fn assign_resource(
        &mut self,
        region: RegionId,
        resource: Resource,
        amount: u64,
        prospection: Prospection,
        undo: &mut BlockUndo,
    ) -> Result<(), WorldError> {
        if let Some((present, remaining)) = self.get_resource(region) {
            return Err(WorldError::AlreadyAssigned {
                region,
                resource: present,
                remaining,
            });
        }
        if amount == 0 {
            return Err(WorldError::EmptyDeposit(region));
        }

        let total = self.prospected.get(&resource).copied().unwrap_or(0);
        let total = total
            .checked_add(amount)
            .ok_or(WorldError::ArithmeticOverflow)?;

        undo.push(UndoDelta::RegionProspected {
            region,
            previous: self.regions.get(&region).copied(),
            resource,
            amount,
        });
        self.prospected.insert(resource, total);
        self.regions.insert(
            region,
            RegionRecord {
                resource: Some(resource),
                remaining: amount,
                prospection,
            },
        );

        debug!(%region, %resource, amount, "Deposit assigned");
        Ok(())
    }

    /// Extract up to `amount` units from a region.
    ///
    /// Takes `min(amount, remaining)` and returns the units actually taken
    /// together with their type. When the deposit reaches zero its type is
    /// cleared. Regions without a deposit yield `None`.
    pub fn extract(
        &mut self,
        region: RegionId,
        amount: u64,
        undo: &mut BlockUndo,
    ) -> Option<(Resource, u64)> {
        let record = self.regions.get_mut(&region)?;
        let resource = record.resource?;

        let taken = amount.min(record.remaining);
        if taken == 0 {
            return Some((resource, 0));
        }

        undo.push(UndoDelta::RegionExtracted {
            region,
            resource,
            amount: taken,
        });
        // taken <= remaining, so this cannot underflow.
        record.remaining = record.remaining.saturating_sub(taken);
        if record.remaining == 0 {
            record.resource = None;
            debug!(%region, %resource, "Deposit depleted");
        }

        Some((resource, taken))
    }

    /// Reverse a [`UndoDelta::RegionProspected`].
    ///
    /// # Errors
    ///
    /// Returns [`WorldError`] if the region's record does not match.
    pub fn restore_prospected(
        &mut self,
        region: RegionId,
        previous: Option<RegionRecord>,
        resource: Resource,
        amount: u64,
    ) -> Result<(), WorldError> {
        let Some(current) = self.regions.get(&region) else {
            return Err(WorldError::RegionNotFound(region));
        };
        if current.resource != Some(resource) || current.remaining != amount {
            return Err(WorldError::RegionMismatch {
                region,
                reason: "deposit changed after prospecting",
            });
        }

        let total = self.prospected.get(&resource).copied().unwrap_or(0);
        let total = total
            .checked_sub(amount)
            .ok_or(WorldError::ArithmeticOverflow)?;
        if total == 0 {
            self.prospected.remove(&resource);
        } else {
            self.prospected.insert(resource, total);
        }

        match previous {
            Some(record) => self.regions.insert(region, record),
            None => self.regions.remove(&region),
        };
        Ok(())
    }

    /// Reverse a [`UndoDelta::RegionExtracted`].
    ///
    /// # Errors
    ///
    /// Returns [`WorldError`] if the region's record does not match.
    pub fn restore_extracted(
        &mut self,
        region: RegionId,
        resource: Resource,
        amount: u64,
    ) -> Result<(), WorldError> {
        let Some(record) = self.regions.get_mut(&region) else {
            return Err(WorldError::RegionNotFound(region));
        };
        if record.resource.is_some_and(|r| r != resource) {
            return Err(WorldError::RegionMismatch {
                region,
                reason: "deposit type differs from extracted type",
            });
        }

        record.remaining = record
            .remaining
            .checked_add(amount)
            .ok_or(WorldError::ArithmeticOverflow)?;
        record.resource = Some(resource);
        Ok(())
    }

    /// Add prospected and remaining totals to a conservation audit.
    ///
    /// Returns `None` on overflow.
    pub fn add_totals(&self, totals: &mut ResourceTotals) -> Option<()> {
        for (resource, amount) in &self.prospected {
            ResourceTotals::add(&mut totals.prospected, *resource, *amount)?;
        }
        for record in self.regions.values() {
            if let Some(resource) = record.resource {
                ResourceTotals::add(&mut totals.remaining, resource, record.remaining)?;
            }
        }
        Some(())
    }
}

#[cfg(test)]
mod tests {
    use lode_types::CharacterId;

    use super::*;

    const REGION: RegionId = RegionId(11);

    fn prospection() -> Prospection {
        Prospection {
            character: CharacterId(1),
            height: 3,
        }
    }

    fn ledger_with(amount: u64) -> (RegionLedger, BlockUndo) {
        let mut ledger = RegionLedger::new();
        let mut undo = BlockUndo::new(3);
        let assigned =
            ledger.assign_resource(REGION, Resource::RawA, amount, prospection(), &mut undo);
        assert!(assigned.is_ok());
        (ledger, undo)
    }

    #[test]
    fn assign_then_query() {
        let (ledger, undo) = ledger_with(50);
        assert_eq!(ledger.get_resource(REGION), Some((Resource::RawA, 50)));
        assert_eq!(ledger.remaining(REGION), 50);
        assert_eq!(undo.len(), 1);
    }

    #[test]
    fn assign_twice_is_already_assigned() {
        let (mut ledger, mut undo) = ledger_with(50);
        let again = ledger.assign_resource(REGION, Resource::RawB, 5, prospection(), &mut undo);
        assert!(matches!(
            again,
            Err(WorldError::AlreadyAssigned {
                resource: Resource::RawA,
                remaining: 50,
                ..
            })
        ));
        assert_eq!(undo.len(), 1);
    }

    #[test]
    fn extract_full_amount() {
        let (mut ledger, mut undo) = ledger_with(50);
        assert_eq!(
            ledger.extract(REGION, 10, &mut undo),
            Some((Resource::RawA, 10))
        );
        assert_eq!(ledger.remaining(REGION), 40);
    }

    #[test]
    fn extract_clamps_and_clears_type() {
        let (mut ledger, mut undo) = ledger_with(3);
        assert_eq!(
            ledger.extract(REGION, 10, &mut undo),
            Some((Resource::RawA, 3))
        );
        assert_eq!(ledger.get_resource(REGION), None);
        assert_eq!(ledger.record(REGION).map(|r| r.remaining), Some(0));
        assert_eq!(ledger.extract(REGION, 10, &mut undo), None);
    }

    #[test]
    fn extract_from_unknown_region() {
        let mut ledger = RegionLedger::new();
        let mut undo = BlockUndo::new(1);
        assert_eq!(ledger.extract(REGION, 10, &mut undo), None);
        assert!(undo.is_empty());
    }

    #[test]
    fn depleted_region_can_be_prospected_again() {
        let (mut ledger, mut undo) = ledger_with(3);
        ledger.extract(REGION, 3, &mut undo);
        let again = ledger.assign_resource(REGION, Resource::RawC, 8, prospection(), &mut undo);
        assert!(again.is_ok());
        assert_eq!(ledger.get_resource(REGION), Some((Resource::RawC, 8)));
    }

    #[test]
    fn restore_reverses_extract_and_prospect() {
        let original = RegionLedger::new();
        let (mut ledger, mut undo) = ledger_with(3);
        let after_prospect = ledger.clone();
        ledger.extract(REGION, 10, &mut undo);

        assert!(ledger.restore_extracted(REGION, Resource::RawA, 3).is_ok());
        assert_eq!(ledger, after_prospect);

        assert!(
            ledger
                .restore_prospected(REGION, None, Resource::RawA, 3)
                .is_ok()
        );
        assert_eq!(ledger, original);
    }

    #[test]
    fn totals_cover_prospected_and_remaining() {
        let (mut ledger, mut undo) = ledger_with(30);
        ledger.extract(REGION, 12, &mut undo);
        let mut totals = ResourceTotals::new();
        assert_eq!(ledger.add_totals(&mut totals), Some(()));
        assert_eq!(totals.prospected.get(&Resource::RawA), Some(&30));
        assert_eq!(totals.remaining.get(&Resource::RawA), Some(&18));
    }
}

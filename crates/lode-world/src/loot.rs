//! Ground loot: resources lying on the map, aggregated by position.
//!
//! Dropped resources stay where they were dropped until some character
//! picks them up. Positions holding nothing are removed so that the table
//! (and its query snapshot) never contains empty piles.

use std::collections::BTreeMap;

use lode_journal::{BlockUndo, ResourceTotals, UndoDelta};
use lode_types::{Coord, FungibleMap, Resource};

use crate::error::WorldError;

/// All ground loot, keyed by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroundLoot {
    piles: BTreeMap<Coord, FungibleMap>,
}

impl GroundLoot {
    /// Create an empty loot table.
    pub const fn new() -> Self {
        Self {
            piles: BTreeMap::new(),
        }
    }

    /// Units of `resource` at `position`.
    pub fn amount_at(&self, position: Coord, resource: Resource) -> u64 {
        self.piles
            .get(&position)
            .and_then(|pile| pile.get(&resource))
            .copied()
            .unwrap_or(0)
    }

    /// All non-empty piles, ordered by position.
    pub fn iter(&self) -> impl Iterator<Item = (&Coord, &FungibleMap)> {
        self.piles.iter()
    }

    /// Drop `amount` units at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ArithmeticOverflow`] if the pile would overflow.
    pub fn drop_at(
        &mut self,
        position: Coord,
        resource: Resource,
        amount: u64,
        undo: &mut BlockUndo,
    ) -> Result<(), WorldError> {
        if amount == 0 {
            return Ok(());
        }
        self.add(position, resource, amount)?;
        undo.push(UndoDelta::LootDropped {
            position,
            resource,
            amount,
        });
        Ok(())
    }

    /// Pick up to `requested` units at `position`, returning the units taken.
    pub fn pick_up(
        &mut self,
        position: Coord,
        resource: Resource,
        requested: u64,
        undo: &mut BlockUndo,
    ) -> u64 {
        let taken = requested.min(self.amount_at(position, resource));
        if taken == 0 {
            return 0;
        }
        if self.remove(position, resource, taken).is_err() {
            return 0;
        }
        undo.push(UndoDelta::LootPickedUp {
            position,
            resource,
            amount: taken,
        });
        taken
    }

    /// Reverse a [`UndoDelta::LootDropped`].
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InsufficientLoot`] if the units are not there.
    pub fn restore_dropped(
        &mut self,
        position: Coord,
        resource: Resource,
        amount: u64,
    ) -> Result<(), WorldError> {
        self.remove(position, resource, amount)
    }

    /// Reverse a [`UndoDelta::LootPickedUp`].
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ArithmeticOverflow`] on overflow.
    pub fn restore_picked_up(
        &mut self,
        position: Coord,
        resource: Resource,
        amount: u64,
    ) -> Result<(), WorldError> {
        self.add(position, resource, amount)
    }

    /// Add ground loot totals to a conservation audit.
    ///
    /// Returns `None` on overflow.
    pub fn add_totals(&self, totals: &mut ResourceTotals) -> Option<()> {
        for pile in self.piles.values() {
            for (resource, amount) in pile {
                ResourceTotals::add(&mut totals.loot, *resource, *amount)?;
            }
        }
        Some(())
    }

    fn add(&mut self, position: Coord, resource: Resource, amount: u64) -> Result<(), WorldError> {
        let pile = self.piles.entry(position).or_default();
        let entry = pile.entry(resource).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or(WorldError::ArithmeticOverflow)?;
        Ok(())
    }

    fn remove(
        &mut self,
        position: Coord,
        resource: Resource,
        amount: u64,
    ) -> Result<(), WorldError> {
        let available = self.amount_at(position, resource);
        let left = available
            .checked_sub(amount)
            .ok_or(WorldError::InsufficientLoot {
                position,
                resource,
                requested: amount,
                available,
            })?;

        if let Some(pile) = self.piles.get_mut(&position) {
            if left == 0 {
                pile.remove(&resource);
            } else {
                pile.insert(resource, left);
            }
            if pile.is_empty() {
                self.piles.remove(&position);
            }
        }
        Ok(())
    }
}

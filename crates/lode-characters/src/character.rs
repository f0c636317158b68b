//! Character records and the table that owns them.
//!
//! [`CharacterTable`] is the single owner of character state. Every
//! mutating method takes the block's [`BlockUndo`] and records a delta for
//! each change it makes; the `restore_*` methods reverse those deltas when
//! a block is rolled back.

use std::collections::BTreeMap;

use lode_journal::{BlockUndo, ResourceTotals, UndoDelta};
use lode_types::{CharacterId, Coord, FungibleMap, MiningStatus, RegionId, Resource};
use tracing::debug;

use crate::error::CharacterError;
use crate::inventory;

/// A single character on the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    /// Stable identifier.
    pub id: CharacterId,
    /// Owning account.
    pub owner: String,
    /// Display name, unique per owner.
    pub name: String,
    /// Current position.
    pub position: Coord,
    /// Pending waypoints. A non-empty list means the character is moving.
    pub waypoints: Vec<Coord>,
    /// Mining state.
    pub mining: MiningStatus,
    /// Carried resources.
    pub inventory: FungibleMap,
}

impl Character {
    /// Whether the character has waypoints left to walk.
    pub fn is_moving(&self) -> bool {
        !self.waypoints.is_empty()
    }
}

/// All characters, keyed by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterTable {
    characters: BTreeMap<CharacterId, Character>,
    next_id: CharacterId,
}

impl Default for CharacterTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterTable {
    /// Create an empty table.
    pub const fn new() -> Self {
        Self {
            characters: BTreeMap::new(),
            next_id: CharacterId::FIRST,
        }
    }

    /// Look up a character.
    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(&id)
    }

    /// All characters in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.characters.values()
    }

    /// All character ids in ascending order.
    pub fn ids(&self) -> Vec<CharacterId> {
        self.characters.keys().copied().collect()
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// Whether no character exists.
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Ids of characters currently mining `region`, ascending.
    pub fn miners_of(&self, region: RegionId) -> Vec<CharacterId> {
        self.characters
            .values()
            .filter(|c| c.mining == MiningStatus::Mining(region))
            .map(|c| c.id)
            .collect()
    }

    /// Ids of all active miners with their region, ascending by id.
    pub fn active_miners(&self) -> Vec<(CharacterId, RegionId)> {
        self.characters
            .values()
            .filter_map(|c| c.mining.region().map(|region| (c.id, region)))
            .collect()
    }

    /// Create a character at `position` with an empty inventory.
    ///
    /// # Errors
    ///
    /// Returns [`CharacterError::DuplicateName`] if the owner already has a
    /// character with this name, or [`CharacterError::IdsExhausted`].
    pub fn create(
        &mut self,
        owner: &str,
        name: &str,
        position: Coord,
        undo: &mut BlockUndo,
    ) -> Result<CharacterId, CharacterError> {
        if self
            .characters
            .values()
            .any(|c| c.owner == owner && c.name == name)
        {
            return Err(CharacterError::DuplicateName {
                owner: owner.to_owned(),
                name: name.to_owned(),
            });
        }

        let id = self.next_id;
        let next = id.next().ok_or(CharacterError::IdsExhausted)?;

        undo.push(UndoDelta::CharacterCreated { character: id });
        self.characters.insert(
            id,
            Character {
                id,
                owner: owner.to_owned(),
                name: name.to_owned(),
                position,
                waypoints: Vec::new(),
                mining: MiningStatus::Idle,
                inventory: FungibleMap::new(),
            },
        );
        self.next_id = next;

        debug!(character = %id, owner, name, %position, "Character created");
        Ok(id)
    }

    /// Replace a character's mining status, recording the previous one.
    ///
    /// Records nothing when the status is unchanged. Transition rules live
    /// in [`crate::mining`]; this is the raw setter they build on.
    pub(crate) fn set_mining(
        &mut self,
        id: CharacterId,
        status: MiningStatus,
        undo: &mut BlockUndo,
    ) -> Result<(), CharacterError> {
        let character = self.get_mut(id)?;
        if character.mining == status {
            return Ok(());
        }
        undo.push(UndoDelta::MiningStatus {
            character: id,
            previous: character.mining,
        });
        character.mining = status;
        Ok(())
    }

    /// Replace a character's waypoint list.
    ///
    /// # Errors
    ///
    /// Returns [`CharacterError::CharacterNotFound`].
    pub fn set_waypoints(
        &mut self,
        id: CharacterId,
        waypoints: Vec<Coord>,
        undo: &mut BlockUndo,
    ) -> Result<(), CharacterError> {
        let character = self.get_mut(id)?;
        if character.waypoints == waypoints {
            return Ok(());
        }
        let previous = std::mem::replace(&mut character.waypoints, waypoints);
        undo.push(UndoDelta::Waypoints {
            character: id,
            previous,
        });
        Ok(())
    }

    /// Move a character to `position`.
    ///
    /// # Errors
    ///
    /// Returns [`CharacterError::CharacterNotFound`].
    pub fn set_position(
        &mut self,
        id: CharacterId,
        position: Coord,
        undo: &mut BlockUndo,
    ) -> Result<(), CharacterError> {
        let character = self.get_mut(id)?;
        if character.position == position {
            return Ok(());
        }
        undo.push(UndoDelta::Position {
            character: id,
            previous: character.position,
        });
        character.position = position;
        Ok(())
    }

    /// Add resources to a character's inventory.
    ///
    /// # Errors
    ///
    /// Returns [`CharacterError::CharacterNotFound`] or an overflow error.
    pub fn credit(
        &mut self,
        id: CharacterId,
        resource: Resource,
        amount: u64,
        undo: &mut BlockUndo,
    ) -> Result<(), CharacterError> {
        if amount == 0 {
            return Ok(());
        }
        let character = self.get_mut(id)?;
        inventory::add_resource(&mut character.inventory, resource, amount)?;
        undo.push(UndoDelta::InventoryCredited {
            character: id,
            resource,
            amount,
        });
        Ok(())
    }

    /// Remove resources from a character's inventory.
    ///
    /// # Errors
    ///
    /// Returns [`CharacterError::CharacterNotFound`] or
    /// [`CharacterError::InsufficientResource`].
    pub fn debit(
        &mut self,
        id: CharacterId,
        resource: Resource,
        amount: u64,
        undo: &mut BlockUndo,
    ) -> Result<(), CharacterError> {
        if amount == 0 {
            return Ok(());
        }
        let character = self.get_mut(id)?;
        inventory::remove_resource(&mut character.inventory, resource, amount)?;
        undo.push(UndoDelta::InventoryDebited {
            character: id,
            resource,
            amount,
        });
        Ok(())
    }

    /// Reverse a [`UndoDelta::CharacterCreated`].
    ///
    /// # Errors
    ///
    /// Returns [`CharacterError::StateMismatch`] unless `id` is the most
    /// recently created character.
    pub fn restore_created(&mut self, id: CharacterId) -> Result<(), CharacterError> {
        if id.next() != Some(self.next_id) {
            return Err(CharacterError::StateMismatch {
                character: id,
                reason: "not the most recently created character",
            });
        }
        self.characters
            .remove(&id)
            .ok_or(CharacterError::CharacterNotFound(id))?;
        self.next_id = id;
        Ok(())
    }

    /// Reverse a [`UndoDelta::MiningStatus`].
    ///
    /// # Errors
    ///
    /// Returns [`CharacterError::CharacterNotFound`].
    pub fn restore_mining(
        &mut self,
        id: CharacterId,
        previous: MiningStatus,
    ) -> Result<(), CharacterError> {
        self.get_mut(id)?.mining = previous;
        Ok(())
    }

    /// Reverse a [`UndoDelta::Waypoints`].
    ///
    /// # Errors
    ///
    /// Returns [`CharacterError::CharacterNotFound`].
    pub fn restore_waypoints(
        &mut self,
        id: CharacterId,
        previous: Vec<Coord>,
    ) -> Result<(), CharacterError> {
        self.get_mut(id)?.waypoints = previous;
        Ok(())
    }

    /// Reverse a [`UndoDelta::Position`].
    ///
    /// # Errors
    ///
    /// Returns [`CharacterError::CharacterNotFound`].
    pub fn restore_position(
        &mut self,
        id: CharacterId,
        previous: Coord,
    ) -> Result<(), CharacterError> {
        self.get_mut(id)?.position = previous;
        Ok(())
    }

    /// Reverse a [`UndoDelta::InventoryCredited`].
    ///
    /// # Errors
    ///
    /// Returns [`CharacterError`] if the units are no longer carried.
    pub fn restore_credited(
        &mut self,
        id: CharacterId,
        resource: Resource,
        amount: u64,
    ) -> Result<(), CharacterError> {
        inventory::remove_resource(&mut self.get_mut(id)?.inventory, resource, amount)
    }

    /// Reverse a [`UndoDelta::InventoryDebited`].
    ///
    /// # Errors
    ///
    /// Returns [`CharacterError`] on overflow or unknown character.
    pub fn restore_debited(
        &mut self,
        id: CharacterId,
        resource: Resource,
        amount: u64,
    ) -> Result<(), CharacterError> {
        inventory::add_resource(&mut self.get_mut(id)?.inventory, resource, amount)
    }

    /// Add carried totals to a conservation audit.
    ///
    /// Returns `None` on overflow.
    pub fn add_totals(&self, totals: &mut ResourceTotals) -> Option<()> {
        for character in self.characters.values() {
            for (resource, amount) in &character.inventory {
                ResourceTotals::add(&mut totals.carried, *resource, *amount)?;
            }
        }
        Some(())
    }

    fn get_mut(&mut self, id: CharacterId) -> Result<&mut Character, CharacterError> {
        self.characters
            .get_mut(&id)
            .ok_or(CharacterError::CharacterNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_one() -> (CharacterTable, CharacterId, BlockUndo) {
        let mut table = CharacterTable::new();
        let mut undo = BlockUndo::new(1);
        let id = table.create("domob", "miner", Coord::new(0, 0), &mut undo);
        assert!(id.is_ok());
        (table, id.unwrap_or(CharacterId::FIRST), undo)
    }

    #[test]
    fn ids_are_sequential() {
        let (mut table, first, mut undo) = table_with_one();
        let second = table.create("domob", "hauler", Coord::new(1, 1), &mut undo);
        assert_eq!(first, CharacterId(1));
        assert_eq!(second.ok(), Some(CharacterId(2)));
        assert_eq!(table.ids(), vec![CharacterId(1), CharacterId(2)]);
    }

    #[test]
    fn duplicate_name_for_same_owner_rejected() {
        let (mut table, _, mut undo) = table_with_one();
        let again = table.create("domob", "miner", Coord::new(5, 5), &mut undo);
        assert!(matches!(again, Err(CharacterError::DuplicateName { .. })));
        let other_owner = table.create("andy", "miner", Coord::new(5, 5), &mut undo);
        assert!(other_owner.is_ok());
    }

    #[test]
    fn new_character_is_idle_and_empty() {
        let (table, id, _) = table_with_one();
        let c = table.get(id);
        assert_eq!(c.map(|c| c.mining), Some(MiningStatus::Idle));
        assert_eq!(c.map(|c| c.inventory.is_empty()), Some(true));
        assert_eq!(c.map(Character::is_moving), Some(false));
    }

    #[test]
    fn unchanged_setters_record_nothing() {
        let (mut table, id, _) = table_with_one();
        let mut undo = BlockUndo::new(2);
        assert!(table.set_position(id, Coord::new(0, 0), &mut undo).is_ok());
        assert!(table.set_waypoints(id, Vec::new(), &mut undo).is_ok());
        assert!(table.set_mining(id, MiningStatus::Idle, &mut undo).is_ok());
        assert!(table.credit(id, Resource::RawA, 0, &mut undo).is_ok());
        assert!(undo.is_empty());
    }

    #[test]
    fn debit_more_than_carried_fails_without_delta() {
        let (mut table, id, _) = table_with_one();
        let mut undo = BlockUndo::new(2);
        assert!(table.credit(id, Resource::RawB, 4, &mut undo).is_ok());
        let result = table.debit(id, Resource::RawB, 5, &mut undo);
        assert!(matches!(
            result,
            Err(CharacterError::InsufficientResource { .. })
        ));
        assert_eq!(undo.len(), 1);
    }

    #[test]
    fn unknown_character() {
        let mut table = CharacterTable::new();
        let mut undo = BlockUndo::new(1);
        let result = table.set_position(CharacterId(9), Coord::new(1, 1), &mut undo);
        assert!(matches!(
            result,
            Err(CharacterError::CharacterNotFound(CharacterId(9)))
        ));
    }

    #[test]
    fn restore_created_only_for_newest() {
        let (mut table, first, mut undo) = table_with_one();
        let second = table.create("domob", "hauler", Coord::new(1, 1), &mut undo);
        assert!(second.is_ok());
        assert!(matches!(
            table.restore_created(first),
            Err(CharacterError::StateMismatch { .. })
        ));
        assert!(table.restore_created(CharacterId(2)).is_ok());
        assert_eq!(table.next_id, CharacterId(2));
        assert!(table.restore_created(first).is_ok());
        assert_eq!(table, CharacterTable::new());
    }

    #[test]
    fn restores_reverse_setters() {
        let (mut table, id, _) = table_with_one();
        let before = table.clone();
        let mut undo = BlockUndo::new(2);
        assert!(table.set_waypoints(id, vec![Coord::new(3, 0)], &mut undo).is_ok());
        assert!(table.set_position(id, Coord::new(1, 0), &mut undo).is_ok());
        assert!(table.credit(id, Resource::RawC, 10, &mut undo).is_ok());
        assert!(table.debit(id, Resource::RawC, 4, &mut undo).is_ok());

        assert!(table.restore_debited(id, Resource::RawC, 4).is_ok());
        assert!(table.restore_credited(id, Resource::RawC, 10).is_ok());
        assert!(table.restore_position(id, Coord::new(0, 0)).is_ok());
        assert!(table.restore_waypoints(id, Vec::new()).is_ok());
        assert_eq!(table, before);
    }

    #[test]
    fn carried_totals() {
        let (mut table, id, mut undo) = table_with_one();
        assert!(table.credit(id, Resource::RawA, 6, &mut undo).is_ok());
        let mut totals = ResourceTotals::new();
        assert_eq!(table.add_totals(&mut totals), Some(()));
        assert_eq!(totals.carried.get(&Resource::RawA), Some(&6));
    }
}

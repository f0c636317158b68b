//! The confirmed game state and its query snapshot.
//!
//! [`GameState`] bundles everything a block can touch. It implements
//! [`UndoTarget`] so the journal can rewind it delta by delta, and
//! [`GameState::snapshot`] renders the read-only view external consumers
//! query between blocks.

use lode_characters::{CharacterError, CharacterTable};
use lode_journal::{JournalError, ResourceTotals, UndoDelta, UndoTarget};
use lode_types::{
    BlockHash, CharacterView, GameStateSnapshot, GroundLootView, MiningView, RegionView,
    ResourceView,
};
use lode_world::{GroundLoot, RegionLedger, RegionMap, WorldError};

/// All mutable mining state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Coordinate to region resolution (fixed by configuration).
    pub map: RegionMap,
    /// Region deposits.
    pub regions: RegionLedger,
    /// Characters.
    pub characters: CharacterTable,
    /// Ground loot.
    pub loot: GroundLoot,
}

impl GameState {
    /// Empty state on the given region partition.
    pub const fn new(map: RegionMap) -> Self {
        Self {
            map,
            regions: RegionLedger::new(),
            characters: CharacterTable::new(),
            loot: GroundLoot::new(),
        }
    }

    /// Per-resource totals for the conservation audit.
    ///
    /// Returns `None` if a total overflows `u64`.
    pub fn totals(&self) -> Option<ResourceTotals> {
        let mut totals = ResourceTotals::new();
        self.regions.add_totals(&mut totals)?;
        self.characters.add_totals(&mut totals)?;
        self.loot.add_totals(&mut totals)?;
        Some(totals)
    }

    /// Render the query snapshot as of block `height` / `best_hash`.
    pub fn snapshot(&self, height: u64, best_hash: &BlockHash, rate: u64) -> GameStateSnapshot {
        let characters = self
            .characters
            .iter()
            .map(|c| CharacterView {
                id: c.id,
                owner: c.owner.clone(),
                name: c.name.clone(),
                position: c.position,
                waypoints: c.waypoints.clone(),
                mining: MiningView {
                    rate,
                    active: c.mining.is_active(),
                    region: c.mining.region(),
                },
                inventory: c.inventory.clone(),
            })
            .collect();

        let regions = self
            .regions
            .iter()
            .map(|(id, record)| RegionView {
                id: *id,
                prospection: record.prospection,
                resource: record.resource.map(|resource| ResourceView {
                    resource,
                    amount: record.remaining,
                }),
            })
            .collect();

        let ground_loot = self
            .loot
            .iter()
            .map(|(position, inventory)| GroundLootView {
                position: *position,
                inventory: inventory.clone(),
            })
            .collect();

        GameStateSnapshot {
            height,
            best_hash: best_hash.clone(),
            characters,
            regions,
            ground_loot,
        }
    }
}

fn world_mismatch(height: u64, err: &WorldError) -> JournalError {
    JournalError::inconsistency(height, err.to_string())
}

fn character_mismatch(height: u64, err: &CharacterError) -> JournalError {
    JournalError::inconsistency(height, err.to_string())
}

impl UndoTarget for GameState {
    fn revert(&mut self, height: u64, delta: &UndoDelta) -> Result<(), JournalError> {
        match delta {
            UndoDelta::CharacterCreated { character } => self
                .characters
                .restore_created(*character)
                .map_err(|e| character_mismatch(height, &e)),
            UndoDelta::MiningStatus {
                character,
                previous,
            } => self
                .characters
                .restore_mining(*character, *previous)
                .map_err(|e| character_mismatch(height, &e)),
            UndoDelta::Waypoints {
                character,
                previous,
            } => self
                .characters
                .restore_waypoints(*character, previous.clone())
                .map_err(|e| character_mismatch(height, &e)),
            UndoDelta::Position {
                character,
                previous,
            } => self
                .characters
                .restore_position(*character, *previous)
                .map_err(|e| character_mismatch(height, &e)),
            UndoDelta::InventoryCredited {
                character,
                resource,
                amount,
            } => self
                .characters
                .restore_credited(*character, *resource, *amount)
                .map_err(|e| character_mismatch(height, &e)),
            UndoDelta::InventoryDebited {
                character,
                resource,
                amount,
            } => self
                .characters
                .restore_debited(*character, *resource, *amount)
                .map_err(|e| character_mismatch(height, &e)),
            UndoDelta::RegionProspected {
                region,
                previous,
                resource,
                amount,
            } => self
                .regions
                .restore_prospected(*region, *previous, *resource, *amount)
                .map_err(|e| world_mismatch(height, &e)),
            UndoDelta::RegionExtracted {
                region,
                resource,
                amount,
            } => self
                .regions
                .restore_extracted(*region, *resource, *amount)
                .map_err(|e| world_mismatch(height, &e)),
            UndoDelta::LootDropped {
                position,
                resource,
                amount,
            } => self
                .loot
                .restore_dropped(*position, *resource, *amount)
                .map_err(|e| world_mismatch(height, &e)),
            UndoDelta::LootPickedUp {
                position,
                resource,
                amount,
            } => self
                .loot
                .restore_picked_up(*position, *resource, *amount)
                .map_err(|e| world_mismatch(height, &e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use lode_journal::BlockUndo;
    use lode_types::{CharacterId, Coord, Prospection, Resource};

    use super::*;

    fn state() -> GameState {
        let Ok(map) = RegionMap::new(10) else {
            panic!("region size 10 is valid");
        };
        GameState::new(map)
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut s = state();
        let mut undo = BlockUndo::new(1);
        let created = s.characters.create("domob", "a", Coord::new(1, 1), &mut undo);
        assert!(created.is_ok());
        let id = created.unwrap_or(CharacterId::FIRST);
        let region = s.map.region_id_for(Coord::new(1, 1));
        let prospection = Prospection {
            character: id,
            height: 1,
        };
        assert!(
            s.regions
                .assign_resource(region, Resource::RawB, 40, prospection, &mut undo)
                .is_ok()
        );
        assert!(
            s.loot
                .drop_at(Coord::new(2, 2), Resource::RawB, 0, &mut undo)
                .is_ok()
        );

        let snap = s.snapshot(1, &BlockHash::new("h1"), 10);
        assert_eq!(snap.height, 1);
        assert_eq!(snap.characters.len(), 1);
        assert_eq!(snap.character(id).map(|c| c.mining.active), Some(false));
        assert_eq!(
            snap.region(region).and_then(|r| r.resource.clone()),
            Some(ResourceView {
                resource: Resource::RawB,
                amount: 40
            })
        );
        assert!(snap.ground_loot.is_empty());
    }

    #[test]
    fn revert_block_restores_exact_state() {
        let mut s = state();
        let mut setup = BlockUndo::new(1);
        assert!(
            s.characters
                .create("domob", "a", Coord::new(1, 1), &mut setup)
                .is_ok()
        );
        let before = s.clone();

        let mut undo = BlockUndo::new(2);
        let id = CharacterId(1);
        assert!(s.characters.credit(id, Resource::RawA, 9, &mut undo).is_ok());
        assert!(s.characters.debit(id, Resource::RawA, 4, &mut undo).is_ok());
        assert!(
            s.loot
                .drop_at(Coord::new(1, 1), Resource::RawA, 4, &mut undo)
                .is_ok()
        );
        assert!(
            s.characters
                .set_position(id, Coord::new(2, 1), &mut undo)
                .is_ok()
        );
        assert!(
            s.characters
                .create("domob", "b", Coord::new(3, 3), &mut undo)
                .is_ok()
        );
        assert_ne!(s, before);

        assert!(undo.revert_on(&mut s).is_ok());
        assert_eq!(s, before);
    }

    #[test]
    fn mismatched_delta_is_inconsistency() {
        let mut s = state();
        let delta = UndoDelta::LootDropped {
            position: Coord::new(0, 0),
            resource: Resource::RawA,
            amount: 1,
        };
        assert!(matches!(
            s.revert(7, &delta),
            Err(JournalError::UndoInconsistency { height: 7, .. })
        ));
    }

    #[test]
    fn totals_sum_all_buckets() {
        let mut s = state();
        let mut undo = BlockUndo::new(1);
        assert!(
            s.characters
                .create("domob", "a", Coord::new(1, 1), &mut undo)
                .is_ok()
        );
        assert!(
            s.characters
                .credit(CharacterId(1), Resource::RawC, 3, &mut undo)
                .is_ok()
        );
        let totals = s.totals().unwrap_or_default();
        assert_eq!(totals.carried.get(&Resource::RawC), Some(&3));
    }
}

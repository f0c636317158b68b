//! Undo deltas and the per-block recorder.
//!
//! Each [`UndoDelta`] captures just enough of the pre-mutation state to
//! reverse one mutation exactly. Deltas refer to characters, regions and
//! ground loot by id or position only; they never hold live state.

use serde::{Deserialize, Serialize};

use lode_types::{CharacterId, Coord, MiningStatus, RegionId, RegionRecord, Resource};

use crate::JournalError;
use crate::journal::UndoTarget;

/// One reversible state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UndoDelta {
    /// A character was created. Reverting removes it and hands its id
    /// back to the id counter.
    CharacterCreated {
        /// The new character.
        character: CharacterId,
    },
    /// A character's mining status changed.
    MiningStatus {
        /// The character.
        character: CharacterId,
        /// Status before the change.
        previous: MiningStatus,
    },
    /// A character's waypoint list was replaced or advanced.
    Waypoints {
        /// The character.
        character: CharacterId,
        /// Waypoints before the change.
        previous: Vec<Coord>,
    },
    /// A character changed position.
    Position {
        /// The character.
        character: CharacterId,
        /// Position before the move.
        previous: Coord,
    },
    /// Resources were added to a character's inventory.
    InventoryCredited {
        /// The character.
        character: CharacterId,
        /// Resource type.
        resource: Resource,
        /// Units added.
        amount: u64,
    },
    /// Resources were removed from a character's inventory.
    InventoryDebited {
        /// The character.
        character: CharacterId,
        /// Resource type.
        resource: Resource,
        /// Units removed.
        amount: u64,
    },
    /// A region received a new deposit through prospecting.
    RegionProspected {
        /// The region.
        region: RegionId,
        /// The record before prospecting (`None` if never prospected).
        previous: Option<RegionRecord>,
        /// Deposit type assigned.
        resource: Resource,
        /// Deposit size assigned.
        amount: u64,
    },
    /// Units were extracted from a region's deposit.
    RegionExtracted {
        /// The region.
        region: RegionId,
        /// Deposit type at the time of extraction.
        resource: Resource,
        /// Units extracted.
        amount: u64,
    },
    /// Resources were dropped onto the ground.
    LootDropped {
        /// Where the loot was dropped.
        position: Coord,
        /// Resource type.
        resource: Resource,
        /// Units dropped.
        amount: u64,
    },
    /// Resources were picked up from the ground.
    LootPickedUp {
        /// Where the loot was picked up.
        position: Coord,
        /// Resource type.
        resource: Resource,
        /// Units picked up.
        amount: u64,
    },
}

/// Ordered list of deltas recorded while processing one block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockUndo {
    height: u64,
    deltas: Vec<UndoDelta>,
}

impl BlockUndo {
    /// Start recording deltas for the block at `height`.
    pub const fn new(height: u64) -> Self {
        Self {
            height,
            deltas: Vec::new(),
        }
    }

    /// The block height these deltas belong to.
    pub const fn height(&self) -> u64 {
        self.height
    }

    /// Append a delta. Must be called before (or atomically with) the
    /// mutation it describes.
    pub fn push(&mut self, delta: UndoDelta) {
        self.deltas.push(delta);
    }

    /// Number of recorded deltas.
    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Revert every recorded delta on `target`, newest first.
    ///
    /// Used both by the journal during reorgs and by the block processor to
    /// discard a block that failed half-way.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::UndoInconsistency`] if any delta cannot be
    /// reverted.
    pub fn revert_on<T: UndoTarget + ?Sized>(&self, target: &mut T) -> Result<(), JournalError> {
        for delta in self.deltas.iter().rev() {
            target.revert(self.height, delta)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records the order in which deltas are reverted.
    #[derive(Default)]
    struct Recorder(Vec<UndoDelta>);

    impl UndoTarget for Recorder {
        fn revert(&mut self, _height: u64, delta: &UndoDelta) -> Result<(), JournalError> {
            self.0.push(delta.clone());
            Ok(())
        }
    }

    #[test]
    fn revert_runs_newest_first() {
        let mut undo = BlockUndo::new(4);
        let first = UndoDelta::CharacterCreated {
            character: CharacterId(1),
        };
        let second = UndoDelta::Position {
            character: CharacterId(1),
            previous: Coord::new(0, 0),
        };
        undo.push(first.clone());
        undo.push(second.clone());

        let mut recorder = Recorder::default();
        assert!(undo.revert_on(&mut recorder).is_ok());
        assert_eq!(recorder.0, vec![second, first]);
        assert_eq!(undo.height(), 4);
        assert_eq!(undo.len(), 2);
    }

    #[test]
    fn empty_block_reverts_nothing() {
        let undo = BlockUndo::new(1);
        let mut recorder = Recorder::default();
        assert!(undo.is_empty());
        assert!(undo.revert_on(&mut recorder).is_ok());
        assert!(recorder.0.is_empty());
    }
}

//! Read-only query snapshot of the confirmed game state.
//!
//! A [`GameStateSnapshot`] is built between blocks and never reflects a
//! partially processed block. All collections are sorted by id (or by
//! position for ground loot) so that two nodes with the same state produce
//! byte-identical JSON.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::Resource;
use crate::ids::{BlockHash, CharacterId, RegionId};
use crate::structs::{Coord, FungibleMap, Prospection};

/// The mining part of a character view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MiningView {
    /// Per-block extraction rate applied while mining.
    pub rate: u64,
    /// Whether the character is mining.
    pub active: bool,
    /// The region being mined, present only while active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<RegionId>,
}

/// One character as seen by external consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CharacterView {
    /// Character id.
    pub id: CharacterId,
    /// Owning account.
    pub owner: String,
    /// Character name.
    pub name: String,
    /// Current position.
    pub position: Coord,
    /// Remaining waypoints, empty when stationary.
    pub waypoints: Vec<Coord>,
    /// Mining status.
    pub mining: MiningView,
    /// Carried resources.
    pub inventory: FungibleMap,
}

/// The deposit part of a region view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResourceView {
    /// Deposit type.
    #[serde(rename = "type")]
    pub resource: Resource,
    /// Units left.
    pub amount: u64,
}

/// One prospected region as seen by external consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RegionView {
    /// Region id.
    pub id: RegionId,
    /// Latest prospection.
    pub prospection: Prospection,
    /// Current deposit, absent once depleted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<ResourceView>,
}

/// Resources lying on the ground at one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GroundLootView {
    /// Where the loot lies.
    pub position: Coord,
    /// What lies there.
    pub inventory: FungibleMap,
}

/// Full confirmed state as of the last processed block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameStateSnapshot {
    /// Height of the last processed block.
    pub height: u64,
    /// Hash of the last processed block.
    pub best_hash: BlockHash,
    /// All characters, by id.
    pub characters: Vec<CharacterView>,
    /// All prospected regions, by id.
    pub regions: Vec<RegionView>,
    /// All non-empty ground loot, by position.
    pub ground_loot: Vec<GroundLootView>,
}

impl GameStateSnapshot {
    /// Find a character view by id.
    pub fn character(&self, id: CharacterId) -> Option<&CharacterView> {
        self.characters.iter().find(|c| c.id == id)
    }

    /// Find a region view by id.
    pub fn region(&self, id: RegionId) -> Option<&RegionView> {
        self.regions.iter().find(|r| r.id == id)
    }

    /// Total amount of `resource` lying on the ground anywhere.
    pub fn ground_loot_total(&self, resource: Resource) -> u64 {
        self.ground_loot
            .iter()
            .filter_map(|l| l.inventory.get(&resource))
            .fold(0_u64, |acc, qty| acc.saturating_add(*qty))
    }
}

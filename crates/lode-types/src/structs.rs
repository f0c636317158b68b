//! Core state records shared across the workspace.
//!
//! These are the plain-data building blocks of the confirmed game state:
//! map coordinates, a character's mining status, and the resource record
//! of a region. Undo deltas capture previous values of exactly these types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::Resource;
use crate::ids::{CharacterId, RegionId};

/// A fungible amount per resource type (inventory, ground loot, drop list).
///
/// Entries with a zero quantity are never stored.
pub type FungibleMap = BTreeMap<Resource, u64>;

// ---------------------------------------------------------------------------
// Coordinates
// ---------------------------------------------------------------------------

/// A position on the world map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Coord {
    /// Horizontal map coordinate.
    pub x: i32,
    /// Vertical map coordinate.
    pub y: i32,
}

impl Coord {
    /// Construct a coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl core::fmt::Display for Coord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Mining status
// ---------------------------------------------------------------------------

/// Per-character mining state machine.
///
/// A character is either idle or mining exactly one region. There is no
/// direct transition between two different regions: the character must go
/// back to [`MiningStatus::Idle`] first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MiningStatus {
    /// Not extracting anything.
    #[default]
    Idle,
    /// Extracting from the given region every block.
    Mining(RegionId),
}

impl MiningStatus {
    /// Whether the character is currently mining.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Mining(_))
    }

    /// The region being mined, if any.
    pub const fn region(self) -> Option<RegionId> {
        match self {
            Self::Idle => None,
            Self::Mining(region) => Some(region),
        }
    }
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

/// Who prospected a region and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Prospection {
    /// The character that prospected the region.
    pub character: CharacterId,
    /// Block height at which the prospection was confirmed.
    pub height: u64,
}

/// The resource deposit record of one region.
///
/// A record only exists once a region has been prospected. While
/// `remaining > 0`, `resource` names the deposit type; once the deposit is
/// used up, `resource` is cleared and the region can be prospected again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionRecord {
    /// The deposit type, `None` once depleted.
    pub resource: Option<Resource>,
    /// Units left to mine.
    pub remaining: u64,
    /// The most recent prospection of this region.
    pub prospection: Prospection,
}

impl RegionRecord {
    /// Whether the region still holds a mineable deposit.
    pub const fn is_mineable(&self) -> bool {
        self.resource.is_some() && self.remaining > 0
    }
}

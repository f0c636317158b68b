//! Closed move types and block inputs.
//!
//! Player moves arrive as untyped JSON documents. They are parsed once at
//! the boundary into a [`CharacterMove`]; the state machine itself only
//! ever sees these typed values.

use serde::{Deserialize, Serialize};

use crate::ids::{BlockHash, CharacterId};
use crate::structs::{Coord, FungibleMap};

// ---------------------------------------------------------------------------
// Character moves
// ---------------------------------------------------------------------------

/// One mining-relevant command inside a character's move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Directive {
    /// Replace the character's waypoints (possibly with an empty list).
    Waypoints(Vec<Coord>),
    /// Start (or keep) mining the region the character stands in.
    Mine,
    /// Pick up ground loot at the current position.
    Pickup(FungibleMap),
    /// Drop carried resources onto the ground at the current position.
    Drop(FungibleMap),
    /// Prospect the region the character stands in.
    Prospect,
}

impl Directive {
    /// Position of this directive in the canonical processing order.
    const fn rank(&self) -> u8 {
        match self {
            Self::Waypoints(_) => 0,
            Self::Mine => 1,
            Self::Pickup(_) => 2,
            Self::Drop(_) => 3,
            Self::Prospect => 4,
        }
    }
}

/// All directives a character issued in one block.
///
/// Holds at most one directive of each kind, kept in canonical order:
/// waypoints, mine, pickup, drop, prospect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterMove {
    directives: Vec<Directive>,
}

impl CharacterMove {
    /// An empty move.
    pub const fn new() -> Self {
        Self {
            directives: Vec::new(),
        }
    }

    /// Add a directive, replacing any earlier one of the same kind.
    #[must_use]
    pub fn with(mut self, directive: Directive) -> Self {
        self.push(directive);
        self
    }

    /// Add a directive in place, replacing any earlier one of the same kind.
    pub fn push(&mut self, directive: Directive) {
        let rank = directive.rank();
        self.directives.retain(|d| d.rank() != rank);
        let at = self
            .directives
            .iter()
            .position(|d| d.rank() > rank)
            .unwrap_or(self.directives.len());
        self.directives.insert(at, directive);
    }

    /// Remove the directive of the same kind as `kind`, if present.
    pub fn remove_kind(&mut self, kind: &Directive) {
        let rank = kind.rank();
        self.directives.retain(|d| d.rank() != rank);
    }

    /// The directives in canonical order.
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Whether no directive is present.
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// The new waypoint list, if the move sets one.
    pub fn waypoints(&self) -> Option<&[Coord]> {
        self.directives.iter().find_map(|d| match d {
            Directive::Waypoints(wp) => Some(wp.as_slice()),
            _ => None,
        })
    }

    /// Whether the move asks to mine.
    pub fn mines(&self) -> bool {
        self.directives.iter().any(|d| matches!(d, Directive::Mine))
    }

    /// Whether the move asks to prospect.
    pub fn prospects(&self) -> bool {
        self.directives
            .iter()
            .any(|d| matches!(d, Directive::Prospect))
    }

    /// Resources to drop, if any.
    pub fn drop_list(&self) -> Option<&FungibleMap> {
        self.directives.iter().find_map(|d| match d {
            Directive::Drop(items) => Some(items),
            _ => None,
        })
    }

    /// Resources to pick up, if any.
    pub fn pickup_list(&self) -> Option<&FungibleMap> {
        self.directives.iter().find_map(|d| match d {
            Directive::Pickup(items) => Some(items),
            _ => None,
        })
    }
}

// ---------------------------------------------------------------------------
// Block inputs
// ---------------------------------------------------------------------------

/// A request to create a new character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCharacter {
    /// Owning account name.
    pub owner: String,
    /// Character name, unique per owner.
    pub name: String,
    /// Spawn position.
    pub position: Coord,
}

/// Everything the processor consumes for one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInput {
    /// Height of this block.
    pub height: u64,
    /// Hash of this block.
    pub hash: BlockHash,
    /// Hash of the parent block.
    pub parent: BlockHash,
    /// Characters created in this block, in transaction order.
    #[serde(default)]
    pub creates: Vec<CreateCharacter>,
    /// Per-character moves, in transaction order.
    #[serde(default)]
    pub moves: Vec<(CharacterId, CharacterMove)>,
}

/// The chain-follow signal delivered by the blockchain collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainUpdate {
    /// The best block hash after this update.
    pub best_hash: BlockHash,
    /// `false` if `blocks` continue the current tip, `true` if they
    /// replace part of the followed chain.
    pub reorg: bool,
    /// Blocks to apply, oldest first.
    pub blocks: Vec<BlockInput>,
}

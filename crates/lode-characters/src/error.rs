//! Error types for the lode-characters crate.
//!
//! All operations that can fail return typed errors rather than panicking.
//! Mining rejections are recoverable: the caller ignores the move and
//! carries on with the block.

use lode_types::{CharacterId, RegionId, Resource};

/// Why a character cannot start mining.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiningRejection {
    /// The character does not stand in the requested region.
    NotInRegion,
    /// The region has no mineable deposit.
    NoDeposit,
    /// The character has waypoints and is not stationary.
    Moving,
    /// The character is already mining a different region.
    MiningElsewhere(RegionId),
}

impl core::fmt::Display for MiningRejection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotInRegion => f.write_str("not standing in the region"),
            Self::NoDeposit => f.write_str("region has no deposit"),
            Self::Moving => f.write_str("character is moving"),
            Self::MiningElsewhere(region) => write!(f, "already mining region {region}"),
        }
    }
}

/// Errors that can occur during character state operations.
#[derive(Debug, thiserror::Error)]
pub enum CharacterError {
    /// Character with the given ID was not found.
    #[error("character not found: {0}")]
    CharacterNotFound(CharacterId),

    /// The owner already has a character with this name.
    #[error("duplicate character name {name:?} for owner {owner:?}")]
    DuplicateName {
        /// Owning account.
        owner: String,
        /// Requested name.
        name: String,
    },

    /// The mining request cannot be honoured.
    #[error("invalid mining target {region} for character {character}: {reason}")]
    InvalidMiningTarget {
        /// The character.
        character: CharacterId,
        /// The requested region.
        region: RegionId,
        /// Why the request was rejected.
        reason: MiningRejection,
    },

    /// Attempted to remove more of a resource than the character holds.
    #[error("insufficient resource: wanted {requested} of {resource} but only have {available}")]
    InsufficientResource {
        /// The resource type being removed.
        resource: Resource,
        /// The quantity the caller attempted to remove.
        requested: u64,
        /// The quantity the character actually holds.
        available: u64,
    },

    /// Undo data does not match the character's current state.
    #[error("character {character} does not match undo data: {reason}")]
    StateMismatch {
        /// The character.
        character: CharacterId,
        /// What did not match.
        reason: &'static str,
    },

    /// No further character ids are available.
    #[error("character id space exhausted")]
    IdsExhausted,

    /// An arithmetic overflow occurred.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },
}

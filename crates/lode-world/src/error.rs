//! Error types for the `lode-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type.

use lode_types::{Coord, RegionId, Resource};

/// Errors that can occur during region, loot, and prospecting operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The region has never been prospected.
    #[error("region not found: {0}")]
    RegionNotFound(RegionId),

    /// The region still holds a deposit and cannot be prospected again.
    #[error("region {region} already holds {remaining} of {resource}")]
    AlreadyAssigned {
        /// The region.
        region: RegionId,
        /// The deposit type present.
        resource: Resource,
        /// Units left in the deposit.
        remaining: u64,
    },

    /// A deposit must have a non-zero size.
    #[error("cannot assign an empty deposit to region {0}")]
    EmptyDeposit(RegionId),

    /// Not enough ground loot to restore a reverted pickup or drop.
    #[error("ground loot at {position} holds {available} of {resource}, need {requested}")]
    InsufficientLoot {
        /// Where the loot lies.
        position: Coord,
        /// Resource type.
        resource: Resource,
        /// Units needed.
        requested: u64,
        /// Units present.
        available: u64,
    },

    /// A reverted delta does not match the region's current record.
    #[error("region {region} does not match undo data: {reason}")]
    RegionMismatch {
        /// The region.
        region: RegionId,
        /// What did not match.
        reason: &'static str,
    },

    /// The region size must be at least one.
    #[error("region size must be at least 1")]
    InvalidRegionSize,

    /// Arithmetic overflow during a checked operation.
    #[error("arithmetic overflow in world calculation")]
    ArithmeticOverflow,
}

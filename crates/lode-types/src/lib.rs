//! Shared type definitions for the Lode mining game-state processor.
//!
//! This crate is the single source of truth for all types used across the
//! Lode workspace. Query snapshot types flow downstream to `TypeScript`
//! via `ts-rs` for front-end consumers.
//!
//! # Modules
//!
//! - [`ids`] -- Integer identifier wrappers and block hashes
//! - [`enums`] -- Resource types
//! - [`structs`] -- Coordinates, mining status, region records
//! - [`moves`] -- Closed move types, block inputs, chain-follow signals
//! - [`snapshot`] -- Read-only query snapshot of the confirmed state

pub mod enums;
pub mod ids;
pub mod moves;
pub mod snapshot;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::Resource;
pub use ids::{BlockHash, CharacterId, RegionId};
pub use moves::{BlockInput, ChainUpdate, CharacterMove, CreateCharacter, Directive};
pub use snapshot::{
    CharacterView, GameStateSnapshot, GroundLootView, MiningView, RegionView, ResourceView,
};
pub use structs::{Coord, FungibleMap, MiningStatus, Prospection, RegionRecord};

//! Regions, resource deposits, ground loot, and prospecting.
//!
//! This crate models the parts of the world that mining touches: the
//! partition of the map into regions, the deposit each region holds, the
//! resources lying on the ground, and what prospecting finds.
//!
//! # Modules
//!
//! - [`error`] -- Error types for world operations.
//! - [`ledger`] -- [`RegionLedger`], the sole owner of deposit quantities.
//! - [`loot`] -- [`GroundLoot`], dropped resources aggregated by position.
//! - [`prospect`] -- The [`Prospector`] seam and the deterministic
//!   [`SeededProspector`].
//! - [`region_map`] -- [`RegionMap`], coordinate to region id resolution.
//!
//! [`Prospector`]: prospect::Prospector
//! [`SeededProspector`]: prospect::SeededProspector

pub mod error;
pub mod ledger;
pub mod loot;
pub mod prospect;
pub mod region_map;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use ledger::RegionLedger;
pub use loot::GroundLoot;
pub use prospect::{Deposit, Prospector, SeededProspector};
pub use region_map::RegionMap;

//! Mapping from map coordinates to region ids.
//!
//! The world is partitioned into square cells of `size x size` tiles. Each
//! cell is one region; every coordinate inside it resolves to the same
//! [`RegionId`]. Ids pack the cell's column and row into one `u64`, so they
//! are stable across nodes and never need to be stored.

use lode_types::{Coord, RegionId};

use crate::error::WorldError;

/// Partition of the map into square regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionMap {
    size: i32,
}

impl RegionMap {
    /// Create a region map with cells of edge length `size`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidRegionSize`] if `size` is zero or does
    /// not fit a map coordinate.
    pub fn new(size: u32) -> Result<Self, WorldError> {
        let size = i32::try_from(size).map_err(|_e| WorldError::InvalidRegionSize)?;
        if size < 1 {
            return Err(WorldError::InvalidRegionSize);
        }
        Ok(Self { size })
    }

    /// The region containing `coord`.
    pub fn region_id_for(&self, coord: Coord) -> RegionId {
        let column = coord.x.div_euclid(self.size);
        let row = coord.y.div_euclid(self.size);
        let column = u64::from(u32::from_ne_bytes(column.to_ne_bytes()));
        let row = u64::from(u32::from_ne_bytes(row.to_ne_bytes()));
        RegionId((column << 32) | row)
    }
}

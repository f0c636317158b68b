//! Inventory operations for characters.
//!
//! Each character carries fungible resources that it mined or picked up.
//! This module provides methods for adding, removing, and querying
//! resources with full checked arithmetic: no silent overflows, no panics.
//! Zero-quantity entries are never stored.

use lode_types::{FungibleMap, Resource};

use crate::error::CharacterError;

/// Units of `resource` carried.
pub fn amount_of(inventory: &FungibleMap, resource: Resource) -> u64 {
    inventory.get(&resource).copied().unwrap_or(0)
}

/// Add `amount` units of `resource` to the inventory.
///
/// # Errors
///
/// Returns [`CharacterError::ArithmeticOverflow`] on `u64` overflow.
pub fn add_resource(
    inventory: &mut FungibleMap,
    resource: Resource,
    amount: u64,
) -> Result<(), CharacterError> {
    if amount == 0 {
        return Ok(());
    }
    let entry = inventory.entry(resource).or_insert(0);
    *entry = entry
        .checked_add(amount)
        .ok_or_else(|| CharacterError::ArithmeticOverflow {
            context: format!("inventory quantity of {resource} overflow"),
        })?;
    Ok(())
}

/// Remove `amount` units of `resource` from the inventory.
///
/// Removes the key entirely if the quantity reaches zero.
///
/// # Errors
///
/// Returns [`CharacterError::InsufficientResource`] if the character does
/// not hold enough.
pub fn remove_resource(
    inventory: &mut FungibleMap,
    resource: Resource,
    amount: u64,
) -> Result<(), CharacterError> {
    let current = amount_of(inventory, resource);
    let remaining = current
        .checked_sub(amount)
        .ok_or(CharacterError::InsufficientResource {
            resource,
            requested: amount,
            available: current,
        })?;

    if remaining == 0 {
        inventory.remove(&resource);
    } else {
        inventory.insert(resource, remaining);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_remove_everything_leaves_no_key() {
        let mut inv = FungibleMap::new();
        assert!(add_resource(&mut inv, Resource::RawC, 7).is_ok());
        assert_eq!(amount_of(&inv, Resource::RawC), 7);
        assert!(remove_resource(&mut inv, Resource::RawC, 7).is_ok());
        assert!(inv.is_empty());
    }

    #[test]
    fn add_zero_stores_nothing() {
        let mut inv = FungibleMap::new();
        assert!(add_resource(&mut inv, Resource::RawC, 0).is_ok());
        assert!(inv.is_empty());
    }

    #[test]
    fn remove_more_than_held_fails() {
        let mut inv = FungibleMap::new();
        inv.insert(Resource::RawD, 3);
        let result = remove_resource(&mut inv, Resource::RawD, 5);
        assert!(matches!(
            result,
            Err(CharacterError::InsufficientResource {
                requested: 5,
                available: 3,
                ..
            })
        ));
        assert_eq!(amount_of(&inv, Resource::RawD), 3);
    }

    #[test]
    fn add_overflow_fails() {
        let mut inv = FungibleMap::new();
        inv.insert(Resource::RawE, u64::MAX);
        assert!(add_resource(&mut inv, Resource::RawE, 1).is_err());
    }
}

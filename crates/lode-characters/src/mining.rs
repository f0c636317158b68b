//! The per-character mining state machine.
//!
//! Two states, [`MiningStatus::Idle`] and [`MiningStatus::Mining`]:
//!
//! - `Idle -> Mining(r)` via [`set_active`], only while standing still in
//!   region `r` and `r` has units left.
//! - `Mining(r) -> Mining(r)` re-issuing `mine` on the same region is a
//!   no-op.
//! - `Mining(r) -> Idle` via [`clear`] (movement, reorg) or
//!   [`clear_region`] (depletion, all miners at once).
//!
//! There is no direct `Mining(r) -> Mining(r')`; a character must stop
//! first.

use lode_journal::BlockUndo;
use lode_types::{CharacterId, MiningStatus, RegionId, RegionRecord};
use lode_world::{RegionLedger, RegionMap};
use tracing::debug;

use crate::character::CharacterTable;
use crate::error::{CharacterError, MiningRejection};

/// Start mining `region`.
///
/// # Errors
///
/// Returns [`CharacterError::InvalidMiningTarget`] if the character does not
/// stand in `region`, the region has nothing left, the character is
/// moving, or it is already mining a different region. Callers treat this
/// as "move not honoured". Returns [`CharacterError::CharacterNotFound`]
/// for an unknown id.
pub fn set_active(
    characters: &mut CharacterTable,
    id: CharacterId,
    region: RegionId,
    map: &RegionMap,
    ledger: &RegionLedger,
    undo: &mut BlockUndo,
) -> Result<(), CharacterError> {
    let character = characters
        .get(id)
        .ok_or(CharacterError::CharacterNotFound(id))?;

    let reject = |reason| CharacterError::InvalidMiningTarget {
        character: id,
        region,
        reason,
    };

    if map.region_id_for(character.position) != region {
        return Err(reject(MiningRejection::NotInRegion));
    }
    if !ledger.record(region).is_some_and(RegionRecord::is_mineable) {
        return Err(reject(MiningRejection::NoDeposit));
    }
    if character.is_moving() {
        return Err(reject(MiningRejection::Moving));
    }
    match character.mining {
        MiningStatus::Mining(current) if current == region => return Ok(()),
        MiningStatus::Mining(current) => {
            return Err(reject(MiningRejection::MiningElsewhere(current)));
        }
        MiningStatus::Idle => {}
    }

    characters.set_mining(id, MiningStatus::Mining(region), undo)?;
    debug!(character = %id, %region, "Mining started");
    Ok(())
}

/// Stop mining. Idempotent: an idle character records no delta.
///
/// # Errors
///
/// Returns [`CharacterError::CharacterNotFound`] for an unknown id.
pub fn clear(
    characters: &mut CharacterTable,
    id: CharacterId,
    undo: &mut BlockUndo,
) -> Result<(), CharacterError> {
    let was = characters
        .get(id)
        .ok_or(CharacterError::CharacterNotFound(id))?
        .mining;
    characters.set_mining(id, MiningStatus::Idle, undo)?;
    if let Some(region) = was.region() {
        debug!(character = %id, %region, "Mining stopped");
    }
    Ok(())
}

/// Stop every character mining `region`, returning who was stopped.
///
/// # Errors
///
/// Propagates [`CharacterError`] from [`clear`].
pub fn clear_region(
    characters: &mut CharacterTable,
    region: RegionId,
    undo: &mut BlockUndo,
) -> Result<Vec<CharacterId>, CharacterError> {
    let miners = characters.miners_of(region);
    for id in &miners {
        clear(characters, *id, undo)?;
    }
    Ok(miners)
}

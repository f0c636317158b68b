//! The move interpreter.
//!
//! Applies each character's move for the block, characters in ascending id
//! order. Within one move the directives run in a fixed order:
//!
//! 1. `wp` -- replace the waypoint list and stop mining;
//! 2. `mine` -- start mining the region the character stands in, unless
//!    the same move sets waypoints;
//! 3. `pu` -- pick up ground loot (clamped);
//! 4. `drop` -- move carried resources onto the ground (clamped);
//! 5. `prospect` -- only when the move has neither `wp` nor `mine` and the
//!    character is stationary.
//!
//! At most one status-changing directive is honoured per move: waypoints
//! win over `mine`. A directive that cannot be honoured is skipped; it never
//! aborts the block for other characters.

use std::collections::BTreeMap;

use lode_characters::{CharacterError, inventory, mining};
use lode_journal::BlockUndo;
use lode_types::{CharacterId, CharacterMove, Directive, Prospection};
use lode_world::{Prospector, WorldError};
use tracing::{debug, warn};

use crate::block::BlockError;
use crate::state::GameState;

/// Merge moves by character. When a character sends several moves in one
/// block, later directives replace earlier ones of the same kind.
pub fn merge_moves(moves: &[(CharacterId, CharacterMove)]) -> BTreeMap<CharacterId, CharacterMove> {
    let mut merged: BTreeMap<CharacterId, CharacterMove> = BTreeMap::new();
    for (id, mv) in moves {
        let entry = merged.entry(*id).or_default();
        for directive in mv.directives() {
            entry.push(directive.clone());
        }
    }
    merged
}

/// Apply all moves of the block.
///
/// # Errors
///
/// Returns [`BlockError`] only for failures that make the block invalid
/// as a whole (overflow, inconsistent tables). Rejected directives are
/// logged and skipped.
pub fn phase_moves(
    state: &mut GameState,
    moves: &[(CharacterId, CharacterMove)],
    prospector: &dyn Prospector,
    undo: &mut BlockUndo,
) -> Result<(), BlockError> {
    for (id, mut mv) in merge_moves(moves) {
        if state.characters.get(id).is_none() {
            warn!(character = %id, height = undo.height(), "Move for unknown character ignored");
            continue;
        }
        resolve_conflicts(id, &mut mv);
        apply_move(state, id, &mv, prospector, undo)?;
    }
    Ok(())
}

/// Keep at most one status-changing directive: waypoints cancel `mine`,
/// and either of them cancels `prospect`.
fn resolve_conflicts(id: CharacterId, mv: &mut CharacterMove) {
    if mv.waypoints().is_some() && mv.mines() {
        debug!(character = %id, "Mine combined with waypoints, skipped");
        mv.remove_kind(&Directive::Mine);
    }
    if mv.prospects() && (mv.waypoints().is_some() || mv.mines()) {
        debug!(character = %id, "Prospect combined with movement or mining, skipped");
        mv.remove_kind(&Directive::Prospect);
    }
}

fn apply_move(
    state: &mut GameState,
    id: CharacterId,
    mv: &CharacterMove,
    prospector: &dyn Prospector,
    undo: &mut BlockUndo,
) -> Result<(), BlockError> {
    if let Some(waypoints) = mv.waypoints() {
        state.characters.set_waypoints(id, waypoints.to_vec(), undo)?;
        mining::clear(&mut state.characters, id, undo)?;
    }

    if mv.mines() {
        start_mining(state, id, undo)?;
    }

    if let Some(items) = mv.pickup_list() {
        for (resource, requested) in items {
            let Some(position) = state.characters.get(id).map(|c| c.position) else {
                return Err(CharacterError::CharacterNotFound(id).into());
            };
            let amount = state.loot.pick_up(position, *resource, *requested, undo);
            if amount == 0 {
                continue;
            }
            state.characters.credit(id, *resource, amount, undo)?;
            debug!(character = %id, %resource, amount, %position, "Picked up");
        }
    }

    if let Some(items) = mv.drop_list() {
        for (resource, requested) in items {
            let Some(character) = state.characters.get(id) else {
                return Err(CharacterError::CharacterNotFound(id).into());
            };
            let position = character.position;
            let amount = (*requested).min(inventory::amount_of(&character.inventory, *resource));
            if amount == 0 {
                continue;
            }
            state.characters.debit(id, *resource, amount, undo)?;
            state.loot.drop_at(position, *resource, amount, undo)?;
            debug!(character = %id, %resource, amount, %position, "Dropped");
        }
    }

    if mv.prospects() {
        prospect(state, id, prospector, undo)?;
    }

    Ok(())
}

fn start_mining(state: &mut GameState, id: CharacterId, undo: &mut BlockUndo) -> Result<(), BlockError> {
    let Some(position) = state.characters.get(id).map(|c| c.position) else {
        return Err(CharacterError::CharacterNotFound(id).into());
    };
    let region = state.map.region_id_for(position);
    match mining::set_active(
        &mut state.characters,
        id,
        region,
        &state.map,
        &state.regions,
        undo,
    ) {
        Ok(()) => Ok(()),
        Err(CharacterError::InvalidMiningTarget { reason, .. }) => {
            debug!(character = %id, %region, %reason, "Mine request not honoured");
            Ok(())
        }
        Err(other) => Err(other.into()),
    }
}

fn prospect(
    state: &mut GameState,
    id: CharacterId,
    prospector: &dyn Prospector,
    undo: &mut BlockUndo,
) -> Result<(), BlockError> {
    let Some(character) = state.characters.get(id) else {
        return Err(CharacterError::CharacterNotFound(id).into());
    };
    if character.is_moving() {
        debug!(character = %id, "Cannot prospect while moving");
        return Ok(());
    }
    let height = undo.height();
    let region = state.map.region_id_for(character.position);
    if let Some((resource, remaining)) = state.regions.get_resource(region) {
        debug!(character = %id, %region, %resource, remaining, "Region already has a deposit");
        return Ok(());
    }
    let Some(deposit) = prospector.prospect(region, height) else {
        debug!(character = %id, %region, "Nothing found");
        return Ok(());
    };

    let prospection = Prospection {
        character: id,
        height,
    };
    match state.regions.assign_resource(
        region,
        deposit.resource,
        deposit.amount,
        prospection,
        undo,
    ) {
        Ok(()) => {
            debug!(character = %id, %region, resource = %deposit.resource, amount = deposit.amount, "Region prospected");
            Ok(())
        }
        Err(WorldError::AlreadyAssigned { .. } | WorldError::EmptyDeposit(_)) => Ok(()),
        Err(other) => Err(other.into()),
    }
}

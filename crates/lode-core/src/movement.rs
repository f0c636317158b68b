//! Movement along waypoints.
//!
//! Path finding and speed are not modelled. A [`Movement`] decides where a
//! moving character ends up after one block; [`phase_movement`] applies the
//! result and enforces the rule that a change of position stops mining.

use lode_characters::{Character, mining};
use lode_journal::BlockUndo;
use lode_types::Coord;
use tracing::debug;

use crate::block::BlockError;
use crate::state::GameState;

/// A character's position and remaining waypoints after one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// New position.
    pub position: Coord,
    /// Waypoints still to walk.
    pub waypoints: Vec<Coord>,
}

/// Decides how a moving character advances each block.
pub trait Movement {
    /// The step taken by `character` this block, or `None` if it stays.
    fn step(&self, character: &Character) -> Option<Step>;
}

/// Moves onto the next waypoint each block.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepMovement;

impl Movement for StepMovement {
    fn step(&self, character: &Character) -> Option<Step> {
        let (next, rest) = character.waypoints.split_first()?;
        Some(Step {
            position: *next,
            waypoints: rest.to_vec(),
        })
    }
}

/// Advance every moving character by one step, in id order.
///
/// # Errors
///
/// Returns [`BlockError::Character`] if the character table rejects an
/// update.
pub fn phase_movement(
    state: &mut GameState,
    movement: &dyn Movement,
    undo: &mut BlockUndo,
) -> Result<(), BlockError> {
    for id in state.characters.ids() {
        let Some(step) = state.characters.get(id).and_then(|c| movement.step(c)) else {
            continue;
        };
        let position = step.position;
        state.characters.set_waypoints(id, step.waypoints, undo)?;
        let moved = state
            .characters
            .get(id)
            .is_some_and(|c| c.position != position);
        if moved {
            mining::clear(&mut state.characters, id, undo)?;
            state.characters.set_position(id, position, undo)?;
            debug!(character = %id, %position, height = undo.height(), "Character moved");
        }
    }
    Ok(())
}

//! Block processing: the per-block state transition.
//!
//! Each block runs through these phases, in order:
//!
//! 1. **Creation** -- create the characters the block asks for.
//! 2. **Moves** -- interpret each character's move ([`phase_moves`]).
//! 3. **Movement** -- advance moving characters ([`phase_movement`]).
//! 4. **Extraction** -- active miners extract from their region
//!    ([`phase_extraction`]).
//! 5. **Audit** -- verify the conservation law.
//!
//! Every mutation is recorded in the block's [`BlockUndo`]. If any phase
//! fails, the partial record is reverted before the error is returned, so
//! a failed block leaves no trace.
//!
//! [`phase_moves`]: crate::interpreter::phase_moves
//! [`phase_movement`]: crate::movement::phase_movement
//! [`phase_extraction`]: crate::extraction::phase_extraction

use lode_characters::CharacterError;
use lode_journal::{
    BlockUndo, ConservationAnomaly, ConservationResult, JournalError, verify_conservation,
};
use lode_types::BlockInput;
use lode_world::{Prospector, WorldError};
use tracing::{debug, error, info, warn};

use crate::extraction::phase_extraction;
use crate::interpreter::phase_moves;
use crate::movement::{Movement, phase_movement};
use crate::state::GameState;

/// Errors that make a block invalid as a whole.
#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    /// A character operation failed.
    #[error("character error: {source}")]
    Character {
        /// The underlying character error.
        #[from]
        source: CharacterError,
    },

    /// A world operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// Resource totals do not balance after the block.
    #[error("conservation violated at height {}: {}", .0.height, .0.message)]
    Conservation(ConservationAnomaly),

    /// Resource totals could not be summed.
    #[error("resource totals overflow at height {0}")]
    TotalsOverflow(u64),

    /// Reverting the partial block failed; the state can no longer be
    /// trusted.
    #[error("rollback of failed block failed: {source}")]
    Rollback {
        /// The underlying journal error.
        #[from]
        source: JournalError,
    },
}

/// Rules shared by every block.
#[derive(Clone, Copy)]
pub struct BlockRules<'a> {
    /// Units each active miner extracts per block.
    pub rate: u64,
    /// Decides prospecting outcomes.
    pub prospector: &'a dyn Prospector,
    /// Decides movement along waypoints.
    pub movement: &'a dyn Movement,
}

impl core::fmt::Debug for BlockRules<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BlockRules")
            .field("rate", &self.rate)
            .finish_non_exhaustive()
    }
}

/// Apply one block to `state`, returning its undo record.
///
/// # Errors
///
/// Returns [`BlockError`] if the block cannot be applied. The state is then
/// unchanged, unless reverting the partial block also failed
/// ([`BlockError::Rollback`]).
pub fn process_block(
    state: &mut GameState,
    block: &BlockInput,
    rules: &BlockRules<'_>,
) -> Result<BlockUndo, BlockError> {
    let mut undo = BlockUndo::new(block.height);

    match run_phases(state, block, rules, &mut undo) {
        Ok(()) => {
            info!(
                height = block.height,
                hash = %block.hash,
                moves = block.moves.len(),
                deltas = undo.len(),
                "Block processed"
            );
            Ok(undo)
        }
        Err(err) => {
            warn!(height = block.height, error = %err, "Block failed, reverting partial changes");
            if let Err(rollback) = undo.revert_on(state) {
                error!(height = block.height, error = %rollback, "Partial block could not be reverted");
                return Err(rollback.into());
            }
            Err(err)
        }
    }
}

fn run_phases(
    state: &mut GameState,
    block: &BlockInput,
    rules: &BlockRules<'_>,
    undo: &mut BlockUndo,
) -> Result<(), BlockError> {
    let height = block.height;

    // --- Phase 1: Creation ---
    for create in &block.creates {
        match state
            .characters
            .create(&create.owner, &create.name, create.position, undo)
        {
            Ok(_) => {}
            Err(CharacterError::DuplicateName { owner, name }) => {
                warn!(height, owner = %owner, name = %name, "Duplicate character name, creation skipped");
            }
            Err(other) => return Err(other.into()),
        }
    }

    // --- Phase 2: Moves ---
    phase_moves(state, &block.moves, rules.prospector, undo)?;

    // --- Phase 3: Movement ---
    phase_movement(state, rules.movement, undo)?;

    // --- Phase 4: Extraction ---
    let credited = phase_extraction(state, rules.rate, undo)?;
    debug!(height, miners = credited.len(), "Extraction finished");

    // --- Phase 5: Audit ---
    let totals = state.totals().ok_or(BlockError::TotalsOverflow(height))?;
    match verify_conservation(height, &totals) {
        ConservationResult::Balanced => Ok(()),
        ConservationResult::Anomaly(anomaly) => Err(BlockError::Conservation(anomaly)),
    }
}

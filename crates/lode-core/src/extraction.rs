//! The extraction scheduler.
//!
//! Runs once per block after every status transition of the block is
//! final. Active miners extract in ascending id order, so when several
//! characters share a region that holds less than they request, every node
//! splits it the same way. When a deposit runs out, all of its miners stop
//! in the same block.

use std::collections::BTreeMap;

use lode_characters::mining;
use lode_journal::BlockUndo;
use lode_types::{CharacterId, MiningStatus};
use tracing::{debug, info};

use crate::block::BlockError;
use crate::state::GameState;

/// Extract `rate` units for every active miner.
///
/// Returns the units credited to each miner that took part (zero for
/// miners whose region ran dry before their turn).
///
/// # Errors
///
/// Returns [`BlockError::Character`] if crediting a miner fails.
pub fn phase_extraction(
    state: &mut GameState,
    rate: u64,
    undo: &mut BlockUndo,
) -> Result<BTreeMap<CharacterId, u64>, BlockError> {
    let mut credited = BTreeMap::new();

    for (id, region) in state.characters.active_miners() {
        // A depletion earlier in this pass may have stopped this miner.
        let still_mining = state
            .characters
            .get(id)
            .is_some_and(|c| c.mining == MiningStatus::Mining(region));
        if !still_mining {
            credited.insert(id, 0);
            continue;
        }

        let Some((resource, actual)) = state.regions.extract(region, rate, undo) else {
            debug!(character = %id, %region, "Miner on region without deposit stopped");
            mining::clear(&mut state.characters, id, undo)?;
            credited.insert(id, 0);
            continue;
        };
        state.characters.credit(id, resource, actual, undo)?;
        credited.insert(id, actual);
        debug!(character = %id, %region, %resource, amount = actual, "Extracted");

        if state.regions.remaining(region) == 0 {
            let stopped = mining::clear_region(&mut state.characters, region, undo)?;
            info!(%region, %resource, miners = stopped.len(), height = undo.height(), "Region depleted");
        }
    }

    Ok(credited)
}

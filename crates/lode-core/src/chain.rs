//! Chain following and reorg handling.
//!
//! [`ChainContext`] is the explicit replacement for a process-wide "current
//! chain" singleton. It knows the tip the state corresponds to, the hashes
//! of recent blocks, and the [`UndoJournal`] needed to walk back.
//!
//! Undo data is kept for the newest `undo_depth` blocks only. A reorg whose
//! common ancestor lies below that horizon cannot be followed and is
//! reported as [`JournalError::UndoInconsistency`].

use std::collections::BTreeMap;

use lode_journal::{JournalError, UndoJournal};
use lode_types::{BlockHash, BlockInput, ChainUpdate};
use tracing::{debug, info, warn};

use crate::block::{BlockError, BlockRules, process_block};
use crate::config::ChainConfig;
use crate::state::GameState;

/// Errors raised while following the chain.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// The block does not extend the current tip.
    #[error("block {height} ({hash}) does not attach to tip {tip_height} ({tip_hash})")]
    Detached {
        /// Height of the offending block.
        height: u64,
        /// Hash of the offending block.
        hash: BlockHash,
        /// Current tip height.
        tip_height: u64,
        /// Current tip hash.
        tip_hash: BlockHash,
    },

    /// A block could not be applied.
    #[error("block {height} failed: {source}")]
    Block {
        /// Height of the failed block.
        height: u64,
        /// The underlying block error.
        source: BlockError,
    },

    /// Undo data is missing or inconsistent.
    #[error("journal error: {source}")]
    Journal {
        /// The underlying journal error.
        #[from]
        source: JournalError,
    },
}

/// The block the state currently corresponds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainTip {
    /// Block height.
    pub height: u64,
    /// Block hash.
    pub hash: BlockHash,
}

/// Chain-follow context threaded through block processing.
#[derive(Debug, Clone)]
pub struct ChainContext {
    tip: ChainTip,
    /// Hashes of the tip and of every block that can still be rolled back
    /// to, by height.
    hashes: BTreeMap<u64, BlockHash>,
    journal: UndoJournal,
    undo_depth: u64,
}

impl ChainContext {
    /// Start following the chain from `genesis`.
    pub fn new(genesis_height: u64, genesis_hash: BlockHash, undo_depth: u64) -> Self {
        let mut hashes = BTreeMap::new();
        hashes.insert(genesis_height, genesis_hash.clone());
        Self {
            tip: ChainTip {
                height: genesis_height,
                hash: genesis_hash,
            },
            hashes,
            journal: UndoJournal::new(),
            undo_depth,
        }
    }

    /// Build a context from the `chain` configuration section.
    pub fn from_config(config: &ChainConfig) -> Self {
        Self::new(
            config.genesis_height,
            BlockHash::new(config.genesis_hash.clone()),
            config.undo_depth,
        )
    }

    /// The current tip.
    pub const fn tip(&self) -> &ChainTip {
        &self.tip
    }

    /// The undo journal.
    pub const fn journal(&self) -> &UndoJournal {
        &self.journal
    }

    /// Lowest height the state can be rolled back to.
    pub fn horizon(&self) -> u64 {
        self.hashes
            .keys()
            .next()
            .copied()
            .unwrap_or(self.tip.height)
    }

    /// Apply a block whose parent is the current tip.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Detached`] if the block does not extend the
    /// tip, or [`ChainError::Block`] if it cannot be applied (the state is
    /// then unchanged).
    pub fn attach(
        &mut self,
        state: &mut GameState,
        block: &BlockInput,
        rules: &BlockRules<'_>,
    ) -> Result<(), ChainError> {
        let expected = self.tip.height.checked_add(1);
        if expected != Some(block.height) || block.parent != self.tip.hash {
            return Err(ChainError::Detached {
                height: block.height,
                hash: block.hash.clone(),
                tip_height: self.tip.height,
                tip_hash: self.tip.hash.clone(),
            });
        }

        let undo = process_block(state, block, rules).map_err(|source| ChainError::Block {
            height: block.height,
            source,
        })?;
        self.journal.record(undo)?;
        self.hashes.insert(block.height, block.hash.clone());
        self.tip = ChainTip {
            height: block.height,
            hash: block.hash.clone(),
        };
        self.prune();
        Ok(())
    }

    /// Undo blocks until the tip is at `height`.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::UndoInconsistency`] if `height` is above the
    /// tip, below the undo horizon, or the journal cannot restore a block.
    pub fn rollback_to(&mut self, state: &mut GameState, height: u64) -> Result<(), ChainError> {
        if height > self.tip.height {
            return Err(JournalError::inconsistency(
                height,
                format!("cannot roll back forward from tip {}", self.tip.height),
            )
            .into());
        }
        if height < self.horizon() {
            return Err(JournalError::inconsistency(
                height,
                format!("below undo horizon {}", self.horizon()),
            )
            .into());
        }

        while self.tip.height > height {
            let current = self.tip.height;
            self.journal.undo(current, state)?;
            self.hashes.remove(&current);

            let Some(parent) = current.checked_sub(1) else {
                return Err(JournalError::inconsistency(current, "no parent height").into());
            };
            let Some(hash) = self.hashes.get(&parent).cloned() else {
                return Err(JournalError::inconsistency(parent, "parent hash not retained").into());
            };
            debug!(height = current, "Block rolled back");
            self.tip = ChainTip {
                height: parent,
                hash,
            };
        }

        info!(height, hash = %self.tip.hash, "Rolled back");
        Ok(())
    }

    /// React to a chain-follow signal.
    ///
    /// For a continuation, the blocks are attached in order. For a reorg,
    /// the state is first rolled back to the common ancestor: the parent of
    /// the first new block, or `best_hash` itself when no blocks come with
    /// the signal.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError`] if the ancestor is unknown or below the undo
    /// horizon, or if a block fails to attach.
    pub fn apply_update(
        &mut self,
        state: &mut GameState,
        update: &ChainUpdate,
        rules: &BlockRules<'_>,
    ) -> Result<(), ChainError> {
        if update.reorg {
            let ancestor = update
                .blocks
                .first()
                .map_or(&update.best_hash, |b| &b.parent);
            let Some(height) = self.height_of(ancestor) else {
                return Err(JournalError::inconsistency(
                    self.tip.height,
                    format!("reorg ancestor {ancestor} is unknown or below the undo horizon"),
                )
                .into());
            };
            info!(
                from = self.tip.height,
                to = height,
                %ancestor,
                new_blocks = update.blocks.len(),
                "Reorg"
            );
            self.rollback_to(state, height)?;
        }

        for block in &update.blocks {
            self.attach(state, block, rules)?;
        }

        if self.tip.hash != update.best_hash {
            warn!(tip = %self.tip.hash, best = %update.best_hash, "Tip differs from announced best block");
        }
        Ok(())
    }

    fn height_of(&self, hash: &BlockHash) -> Option<u64> {
        self.hashes
            .iter()
            .rev()
            .find(|(_, h)| *h == hash)
            .map(|(height, _)| *height)
    }

    fn prune(&mut self) {
        let Some(horizon) = self.tip.height.checked_sub(self.undo_depth) else {
            return;
        };
        // Undo data is kept for heights above the horizon, hashes from the
        // horizon up so the oldest undoable block still has its parent.
        self.journal.prune(horizon.saturating_add(1));
        self.hashes = self.hashes.split_off(&horizon);
    }
}

//! The undo journal: per-height undo records for reorg rollback.
//!
//! The [`UndoJournal`] keeps the [`BlockUndo`] of every recent block. On a
//! reorg the chain context undoes blocks one by one, newest first, until
//! it reaches the common ancestor. Once a height is deep enough to be
//! final, its undo data is dropped with [`UndoJournal::prune`].
//!
//! # Design
//!
//! - **Strictly ordered**: records are appended in increasing height and
//!   only the newest height can be undone.
//! - **Id references only**: deltas name characters and regions by id;
//!   the live state is reached through the [`UndoTarget`] seam.
//! - **Fatal on mismatch**: a missing record is
//!   [`JournalError::UndoInconsistency`].

use std::collections::BTreeMap;

use tracing::debug;

use crate::JournalError;
use crate::delta::{BlockUndo, UndoDelta};

/// State that undo deltas can be reverted on.
pub trait UndoTarget {
    /// Apply the inverse of `delta`, recorded at block `height`.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::UndoInconsistency`] if the state does not
    /// match what the delta expects (missing entity, underflow).
    fn revert(&mut self, height: u64, delta: &UndoDelta) -> Result<(), JournalError>;
}

/// Undo records of recent blocks, keyed by height.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoJournal {
    blocks: BTreeMap<u64, BlockUndo>,
}

impl UndoJournal {
    /// Create an empty journal.
    pub const fn new() -> Self {
        Self {
            blocks: BTreeMap::new(),
        }
    }

    /// Number of heights with undo data.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the journal holds no undo data.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The newest journaled height.
    pub fn latest_height(&self) -> Option<u64> {
        self.blocks.keys().next_back().copied()
    }

    /// Store the undo data of a fully processed block.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::DuplicateHeight`] if the height is already
    /// recorded, or [`JournalError::OutOfOrder`] if it is below the newest
    /// recorded height.
    pub fn record(&mut self, undo: BlockUndo) -> Result<(), JournalError> {
        let height = undo.height();
        if self.blocks.contains_key(&height) {
            return Err(JournalError::DuplicateHeight(height));
        }
        if let Some(latest) = self.latest_height()
            && height < latest
        {
            return Err(JournalError::OutOfOrder { height, latest });
        }

        debug!(height, deltas = undo.len(), "Undo data recorded");
        self.blocks.insert(height, undo);
        Ok(())
    }

    /// Revert the block at `height` on `target` and forget its undo data.
    ///
    /// Only the newest journaled height may be undone; deltas are applied
    /// in strict reverse order.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::UndoInconsistency`] if there is no undo data
    /// for `height`, if `height` is not the newest journaled height, or if
    /// the target rejects a delta.
    pub fn undo<T: UndoTarget + ?Sized>(
        &mut self,
        height: u64,
        target: &mut T,
    ) -> Result<(), JournalError> {
        match self.latest_height() {
            None => {
                return Err(JournalError::inconsistency(height, "journal is empty"));
            }
            Some(latest) if latest != height => {
                return Err(JournalError::inconsistency(
                    height,
                    format!("newest journaled height is {latest}"),
                ));
            }
            Some(_) => {}
        }

        let Some(undo) = self.blocks.remove(&height) else {
            return Err(JournalError::inconsistency(height, "no undo data"));
        };

        undo.revert_on(target)?;
        debug!(height, deltas = undo.len(), "Block undone");
        Ok(())
    }

    /// Drop undo data for every height below `below_height`.
    ///
    /// Returns the number of heights pruned.
    pub fn prune(&mut self, below_height: u64) -> usize {
        let kept = self.blocks.split_off(&below_height);
        let pruned = self.blocks.len();
        self.blocks = kept;
        if pruned > 0 {
            debug!(below_height, pruned, "Undo data pruned");
        }
        pruned
    }
}

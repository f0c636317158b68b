//! Undo journal and conservation audit for the Lode game-state processor.
//!
//! Every state mutation made while processing a block is recorded as an
//! [`UndoDelta`] in that block's [`BlockUndo`]. When the followed chain
//! reorganizes, the [`UndoJournal`] replays the inverse of those deltas in
//! strict reverse order, restoring the state to exactly what it was before
//! the block was applied.
//!
//! # Architecture
//!
//! The journal crate provides three modules:
//!
//! - [`delta`] -- [`UndoDelta`] and the per-block [`BlockUndo`] recorder.
//! - [`journal`] -- The [`UndoJournal`] (`record` / `undo` / `prune`) and the
//!   [`UndoTarget`] seam through which deltas are reverted.
//! - [`conservation`] -- Conservation law verification over resource totals.
//!
//! # Conservation Law
//!
//! For every block height and every resource R:
//!
//! ```text
//! carried(R) + ground_loot(R) == prospected(R) - remaining(R)
//! ```
//!
//! A violation produces a [`ConservationAnomaly`]. Journal inconsistencies
//! and anomalies are fatal: consensus cannot be guaranteed past them.
//!
//! # Usage
//!
//! ```
//! use lode_journal::{BlockUndo, UndoDelta, UndoJournal, UndoTarget, JournalError};
//! use lode_types::{CharacterId, MiningStatus, RegionId};
//!
//! #[derive(Default)]
//! struct Status(MiningStatus);
//!
//! impl UndoTarget for Status {
//!     fn revert(&mut self, _height: u64, delta: &UndoDelta) -> Result<(), JournalError> {
//!         if let UndoDelta::MiningStatus { previous, .. } = delta {
//!             self.0 = *previous;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let mut status = Status::default();
//! let mut undo = BlockUndo::new(1);
//! undo.push(UndoDelta::MiningStatus { character: CharacterId(1), previous: status.0 });
//! status.0 = MiningStatus::Mining(RegionId(9));
//!
//! let mut journal = UndoJournal::new();
//! journal.record(undo).ok();
//! journal.undo(1, &mut status).ok();
//! assert_eq!(status.0, MiningStatus::Idle);
//! ```

pub mod conservation;
pub mod delta;
pub mod journal;

// Re-export primary types at crate root.
pub use conservation::{
    ConservationAnomaly, ConservationResult, ResourceTotals, verify_conservation,
};
pub use delta::{BlockUndo, UndoDelta};
pub use journal::{UndoJournal, UndoTarget};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when recording or replaying undo data.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// Undo data is missing or does not reconstruct the prior state.
    ///
    /// This is fatal: the processor must halt rather than continue with a
    /// state that may differ from other nodes.
    #[error("undo inconsistency at height {height}: {reason}")]
    UndoInconsistency {
        /// The block height being undone.
        height: u64,
        /// What went wrong.
        reason: String,
    },

    /// Undo data for this height has already been recorded.
    #[error("undo data for height {0} already recorded")]
    DuplicateHeight(u64),

    /// A block was recorded below the most recent journaled height.
    #[error("undo data for height {height} recorded after height {latest}")]
    OutOfOrder {
        /// The height being recorded.
        height: u64,
        /// The most recent journaled height.
        latest: u64,
    },
}

impl JournalError {
    /// Build an [`JournalError::UndoInconsistency`] for the given height.
    pub fn inconsistency(height: u64, reason: impl Into<String>) -> Self {
        Self::UndoInconsistency {
            height,
            reason: reason.into(),
        }
    }
}

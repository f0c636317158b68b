//! Characters and their mining state.
//!
//! This crate owns every character record: position, pending waypoints,
//! carried inventory and the mining status. The mining state machine in
//! [`mining`] is the only way a character starts or stops mining.
//!
//! # Modules
//!
//! - [`character`] -- [`Character`] and the journaled [`CharacterTable`].
//! - [`error`] -- Error types for character operations.
//! - [`inventory`] -- Checked inventory arithmetic.
//! - [`mining`] -- `set_active` / `clear` transitions.

pub mod character;
pub mod error;
pub mod inventory;
pub mod mining;

// Re-export primary types at crate root.
pub use character::{Character, CharacterTable};
pub use error::{CharacterError, MiningRejection};

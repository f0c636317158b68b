//! Block processing and chain following for the Lode game-state processor.
//!
//! This crate turns a sequence of blocks into confirmed mining state. Each
//! block passes through creation, move interpretation, movement,
//! extraction and a conservation audit; every change is journaled so that
//! a chain reorganisation can rewind the state exactly.
//!
//! # Modules
//!
//! - [`block`] -- The per-block phase pipeline ([`process_block`]).
//! - [`chain`] -- [`ChainContext`]: tip tracking, rollback and reorgs.
//! - [`config`] -- Configuration loading from `lode-config.yaml`.
//! - [`extraction`] -- The extraction scheduler.
//! - [`interpreter`] -- The move interpreter.
//! - [`movement`] -- [`Movement`] trait and [`StepMovement`].
//! - [`parse`] -- JSON move documents to typed moves.
//! - [`state`] -- [`GameState`] and its query snapshot.
//!
//! [`process_block`]: block::process_block
//! [`ChainContext`]: chain::ChainContext
//! [`Movement`]: movement::Movement
//! [`StepMovement`]: movement::StepMovement
//! [`GameState`]: state::GameState

pub mod block;
pub mod chain;
pub mod config;
pub mod extraction;
pub mod interpreter;
pub mod movement;
pub mod parse;
pub mod state;

pub use block::{BlockError, BlockRules, process_block};
pub use chain::{ChainContext, ChainError, ChainTip};
pub use config::{ConfigError, GspConfig};
pub use movement::{Movement, StepMovement};
pub use parse::{WireUpdate, parse_move};
pub use state::GameState;

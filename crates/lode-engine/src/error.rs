//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and chain replay.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: lode_core::ConfigError,
    },

    /// Following the chain failed. The state can no longer be trusted.
    #[error("chain error: {source}")]
    Chain {
        /// The underlying chain error.
        #[from]
        source: lode_core::ChainError,
    },

    /// Reading the updates file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file being read.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The updates file or the snapshot could not be (de)serialized.
    #[error("JSON error: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The command line is missing the updates file.
    #[error("usage: lode-engine <updates.json> [config.yaml]")]
    Usage,
}

//! Configuration loading and typed config structures for the game-state
//! processor.
//!
//! The canonical configuration lives in `lode-config.yaml` at the project
//! root. Every section is optional; missing keys fall back to the defaults
//! documented on each field.

use std::path::Path;

use lode_types::Resource;
use lode_world::{RegionMap, SeededProspector, WorldError};
use serde::Deserialize;

/// Environment variable that overrides `logging.level`.
pub const LOG_LEVEL_ENV: &str = "LODE_LOG";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configured region size is unusable.
    #[error("invalid world.region_size: {source}")]
    RegionSize {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level processor configuration.
///
/// Mirrors the structure of `lode-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GspConfig {
    /// Chain-follow settings.
    #[serde(default)]
    pub chain: ChainConfig,

    /// World geometry and seed.
    #[serde(default)]
    pub world: WorldConfig,

    /// Mining parameters.
    #[serde(default)]
    pub mining: MiningConfig,

    /// Prospecting outcomes.
    #[serde(default)]
    pub prospecting: ProspectingConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GspConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `LODE_LOG` overrides `logging.level` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.logging.apply_env_overrides();
        Ok(config)
    }

    /// The region partition described by `world.region_size`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RegionSize`] for a zero or oversized cell.
    pub fn region_map(&self) -> Result<RegionMap, ConfigError> {
        Ok(RegionMap::new(self.world.region_size)?)
    }

    /// The deterministic prospector described by `world.seed` and the
    /// `prospecting` section.
    pub fn prospector(&self) -> SeededProspector {
        SeededProspector::new(
            self.world.seed,
            self.prospecting.resources.clone(),
            self.prospecting.min_amount,
            self.prospecting.max_amount,
        )
    }
}

/// Chain-follow configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChainConfig {
    /// Hash of the block the processor starts from.
    #[serde(default = "default_genesis_hash")]
    pub genesis_hash: String,

    /// Height of that block.
    #[serde(default)]
    pub genesis_height: u64,

    /// How many recent blocks keep undo data. Reorgs deeper than this
    /// cannot be followed.
    #[serde(default = "default_undo_depth")]
    pub undo_depth: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            genesis_hash: default_genesis_hash(),
            genesis_height: 0,
            undo_depth: default_undo_depth(),
        }
    }
}

/// World configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Seed for prospecting outcomes.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Edge length of the square cells that form regions.
    #[serde(default = "default_region_size")]
    pub region_size: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            region_size: default_region_size(),
        }
    }
}

/// Mining configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MiningConfig {
    /// Units each active miner extracts per block.
    #[serde(default = "default_mining_rate")]
    pub rate: u64,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            rate: default_mining_rate(),
        }
    }
}

/// Prospecting configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProspectingConfig {
    /// Resource types a deposit may contain.
    #[serde(default = "default_prospect_resources")]
    pub resources: Vec<Resource>,

    /// Smallest deposit, inclusive.
    #[serde(default = "default_min_amount")]
    pub min_amount: u64,

    /// Largest deposit, inclusive.
    #[serde(default = "default_max_amount")]
    pub max_amount: u64,
}

impl Default for ProspectingConfig {
    fn default() -> Self {
        Self {
            resources: default_prospect_resources(),
            min_amount: default_min_amount(),
            max_amount: default_max_amount(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl LoggingConfig {
    /// Override the level with `LODE_LOG` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(LOG_LEVEL_ENV) {
            self.level = val;
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_genesis_hash() -> String {
    "genesis".to_owned()
}

const fn default_undo_depth() -> u64 {
    100
}

const fn default_seed() -> u64 {
    42
}

const fn default_region_size() -> u32 {
    10
}

const fn default_mining_rate() -> u64 {
    10
}

fn default_prospect_resources() -> Vec<Resource> {
    Resource::ALL.to_vec()
}

const fn default_min_amount() -> u64 {
    100
}

const fn default_max_amount() -> u64 {
    1_000
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GspConfig::default();
        assert_eq!(config.mining.rate, 10);
        assert_eq!(config.world.region_size, 10);
        assert_eq!(config.chain.undo_depth, 100);
        assert_eq!(config.prospecting.resources.len(), 9);
        assert!(config.region_map().is_ok());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
chain:
  genesis_hash: "abc"
  genesis_height: 5
  undo_depth: 12

world:
  seed: 7
  region_size: 25

mining:
  rate: 3

prospecting:
  resources:
    - "raw a"
    - "raw c"
  min_amount: 10
  max_amount: 20

logging:
  level: "debug"
"#;

        let config = GspConfig::parse(yaml);
        assert!(config.is_ok(), "{config:?}");
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.chain.genesis_hash, "abc");
        assert_eq!(config.chain.genesis_height, 5);
        assert_eq!(config.chain.undo_depth, 12);
        assert_eq!(config.world.seed, 7);
        assert_eq!(config.world.region_size, 25);
        assert_eq!(config.mining.rate, 3);
        assert_eq!(
            config.prospecting.resources,
            vec![Resource::RawA, Resource::RawC]
        );
        assert_eq!(config.prospecting.max_amount, 20);
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "mining:\n  rate: 4\n";
        let config = GspConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        // Rate is overridden
        assert_eq!(config.mining.rate, 4);
        // Everything else uses defaults
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.chain.genesis_hash, "genesis");
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(GspConfig::parse("").is_ok());
    }

    #[test]
    fn zero_region_size_is_rejected() {
        let config = GspConfig::parse("world:\n  region_size: 0\n");
        let config = config.ok().unwrap_or_default();
        assert!(matches!(
            config.region_map(),
            Err(ConfigError::RegionSize { .. })
        ));
    }

    #[test]
    fn unknown_resource_is_a_yaml_error() {
        let config = GspConfig::parse("prospecting:\n  resources: [\"gold\"]\n");
        assert!(matches!(config, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("lode-config.yaml");
        if path.exists() {
            let config = GspConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}

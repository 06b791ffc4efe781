//! Configuration management for lineage queries.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `lineage.toml` file
//! 3. User config `~/.config/lineage/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::ancestors::AncestorMode;
use crate::uri::Platform;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog location and identity defaults.
    pub catalog: CatalogConfig,

    /// Dependency tree expansion limits.
    pub traversal: TraversalConfig,

    /// Common-ancestor query behaviour.
    pub ancestors: AncestorConfig,

    /// Log filtering.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./lineage.toml` (project local)
    /// 2. `~/.config/lineage/config.toml` (user config)
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::from_file(DEFAULT_CONFIG_FILE);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(DEFAULT_CONFIG_DIR).join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// A set variable that does not parse is an error rather than being
    /// skipped.
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(cluster) = std::env::var("LINEAGE_DEFAULT_CLUSTER") {
            self.catalog.default_cluster = cluster;
        }
        if let Ok(path) = std::env::var("LINEAGE_CATALOG_PATH") {
            self.catalog.snapshot_path = Some(PathBuf::from(path));
        }

        if let Some(depth) = env_override("LINEAGE_MAX_DEPTH")? {
            self.traversal.max_depth = depth;
        }
        if let Some(nodes) = env_override("LINEAGE_MAX_NODES")? {
            self.traversal.max_nodes = nodes;
        }
        if let Some(mode) = env_override("LINEAGE_ANCESTOR_MODE")? {
            self.ancestors.mode = mode;
        }

        if let Ok(filter) = std::env::var("LINEAGE_LOG") {
            self.logging.filter = filter;
        }
        Ok(())
    }

    /// Check values that serde cannot validate on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.default_cluster.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "catalog.default_cluster must not be blank".to_string(),
            ));
        }
        self.catalog.recognized_platforms()?;
        if self.traversal.max_depth == 0 {
            return Err(ConfigError::Invalid(
                "traversal.max_depth must be at least 1".to_string(),
            ));
        }
        if self.traversal.max_nodes == 0 {
            return Err(ConfigError::Invalid(
                "traversal.max_nodes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Parses an environment variable when it is set.
fn env_override<T: FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("{name} has an invalid value: {value:?}"))),
        Err(_) => Ok(None),
    }
}

/// Catalog configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Cluster used when a URI does not carry one.
    pub default_cluster: String,

    /// Platform schemes recognized in URIs ("hive", "dalids").
    pub platforms: Vec<String>,

    /// Snapshot file (JSON or YAML) backing the file catalog.
    pub snapshot_path: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_cluster: DEFAULT_CLUSTER.to_string(),
            platforms: DEFAULT_PLATFORMS.iter().map(|s| s.to_string()).collect(),
            snapshot_path: None,
        }
    }
}

impl CatalogConfig {
    /// Parse the configured platform names.
    pub fn recognized_platforms(&self) -> Result<Vec<Platform>, ConfigError> {
        self.platforms
            .iter()
            .map(|name| match name.parse::<Platform>() {
                Ok(Platform::Generic) | Err(_) => Err(ConfigError::Invalid(format!(
                    "unknown platform in catalog.platforms: {name}"
                ))),
                Ok(platform) => Ok(platform),
            })
            .collect()
    }
}

/// Dependency tree expansion limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    /// Deepest `level_from_root` that may be produced.
    pub max_depth: u32,

    /// Maximum number of records in one tree.
    pub max_nodes: usize,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

/// Common-ancestor configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AncestorConfig {
    /// Which parent lookup strategy to use.
    pub mode: AncestorMode,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing-subscriber` filter directive, used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.catalog.default_cluster, DEFAULT_CLUSTER);
        assert_eq!(config.traversal.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.ancestors.mode, AncestorMode::Corrected);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_recognized_platforms() {
        let config = CatalogConfig::default();
        assert_eq!(
            config.recognized_platforms().unwrap(),
            vec![Platform::Hive, Platform::Dalids]
        );

        let bad = CatalogConfig {
            platforms: vec!["hdfs".to_string()],
            ..CatalogConfig::default()
        };
        assert!(bad.recognized_platforms().is_err());
    }

    #[test]
    fn test_zero_depth_is_invalid() {
        let mut config = Config::default();
        config.traversal.max_depth = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}

//! Runtime configuration
//!
//! Settings for the composition root. Everything has a default so an empty
//! environment yields a working tracker.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::nutrition::ScalingMode;

/// Environment variable for the database file
pub const DATABASE_PATH_VAR: &str = "MACROTRACKER_DATABASE_PATH";
/// Environment variable for an external catalog file
pub const CATALOG_PATH_VAR: &str = "MACROTRACKER_CATALOG_PATH";
/// Environment variable selecting the scaling mode
pub const SCALING_VAR: &str = "MACROTRACKER_SCALING";
/// Environment variable for the connection pool size
pub const POOL_SIZE_VAR: &str = "MACROTRACKER_POOL_SIZE";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {var}")]
    InvalidValue { var: &'static str, value: String },
}

/// Tracker configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Database file; `None` keeps everything in memory
    pub database_path: Option<PathBuf>,
    /// Catalog file; `None` uses the bundled catalog
    pub catalog_path: Option<PathBuf>,
    pub scaling: ScalingMode,
    /// Sort each catalog category by name after loading
    pub sort_catalog: bool,
    pub pool_size: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            catalog_path: None,
            scaling: ScalingMode::default(),
            sort_catalog: true,
            pool_size: 4,
        }
    }
}

impl TrackerConfig {
    /// In-memory configuration for tests and throwaway sessions
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Build from `MACROTRACKER_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(DATABASE_PATH_VAR) {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Some(path) = lookup(CATALOG_PATH_VAR) {
            config.catalog_path = Some(PathBuf::from(path));
        }

        if let Some(value) = lookup(SCALING_VAR) {
            config.scaling = ScalingMode::from_str(&value).ok_or(ConfigError::InvalidValue {
                var: SCALING_VAR,
                value,
            })?;
        }

        if let Some(value) = lookup(POOL_SIZE_VAR) {
            config.pool_size = match value.trim().parse::<u32>() {
                Ok(size) if size > 0 => size,
                _ => return Err(ConfigError::InvalidValue { var: POOL_SIZE_VAR, value }),
            };
        }

        Ok(config)
    }
}

/// Default database location: `data/macrotracker.db` under the project root
/// when running from `target/`, else next to the executable
pub fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("macrotracker.db");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_environment_gives_defaults() {
        let config = TrackerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, TrackerConfig::default());
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_reads_all_variables() {
        let config = TrackerConfig::from_lookup(lookup(&[
            (DATABASE_PATH_VAR, "/tmp/m.db"),
            (CATALOG_PATH_VAR, "/tmp/foods.json"),
            (SCALING_VAR, "truncating"),
            (POOL_SIZE_VAR, "8"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/m.db")));
        assert_eq!(config.catalog_path, Some(PathBuf::from("/tmp/foods.json")));
        assert_eq!(config.scaling, ScalingMode::Truncating);
        assert_eq!(config.pool_size, 8);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(TrackerConfig::from_lookup(lookup(&[(SCALING_VAR, "rounded")])).is_err());
        assert!(TrackerConfig::from_lookup(lookup(&[(POOL_SIZE_VAR, "0")])).is_err());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: TrackerConfig = serde_json::from_str(r#"{"scaling": "truncating"}"#).unwrap();
        assert_eq!(config.scaling, ScalingMode::Truncating);
        assert_eq!(config.pool_size, 4);
    }

    #[test]
    fn test_default_database_path_file_name() {
        assert!(default_database_path().ends_with("data/macrotracker.db"));
    }
}

//! appscale.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "appscale.toml";
pub const DEFAULT_STORE_PATH: &str = "appscale.redb";
pub const DEFAULT_LOG_FILTER: &str = "appscale=info";
pub const DEFAULT_REPLICA_CEILING: u32 = 10;
/// Replica bounds are entered with at most two digits.
pub const MAX_REPLICA_CEILING: u32 = 99;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppscaleConfig {
    pub store: Option<StoreConfig>,
    pub scale: Option<ScaleConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaleConfig {
    /// Highest replica count accepted by the scale range wizard.
    pub replica_ceiling: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub filter: Option<String>,
}

impl AppscaleConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppscaleConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load an explicit config file, or `appscale.toml` in the working
    /// directory when present, or the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.is_file() {
                    Self::from_file(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.store
            .as_ref()
            .and_then(|s| s.path.as_deref())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH))
    }

    /// Configured ceiling, capped at [`MAX_REPLICA_CEILING`].
    pub fn replica_ceiling(&self) -> u32 {
        self.scale
            .as_ref()
            .and_then(|s| s.replica_ceiling)
            .unwrap_or(DEFAULT_REPLICA_CEILING)
            .min(MAX_REPLICA_CEILING)
    }

    pub fn log_filter(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.filter.as_deref())
            .unwrap_or(DEFAULT_LOG_FILTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppscaleConfig::default();
        assert_eq!(config.store_path(), PathBuf::from("appscale.redb"));
        assert_eq!(config.replica_ceiling(), 10);
        assert_eq!(config.log_filter(), "appscale=info");
    }

    #[test]
    fn test_parse_full() {
        let toml_str = r#"
[store]
path = "/var/lib/appscale/state.redb"

[scale]
replica_ceiling = 30

[logging]
filter = "appscale=debug"
"#;
        let config: AppscaleConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.store_path(),
            PathBuf::from("/var/lib/appscale/state.redb")
        );
        assert_eq!(config.replica_ceiling(), 30);
        assert_eq!(config.log_filter(), "appscale=debug");
    }

    #[test]
    fn test_parse_partial_section() {
        let config: AppscaleConfig = toml::from_str("[scale]\n").unwrap();
        assert_eq!(config.replica_ceiling(), 10);
    }

    #[test]
    fn test_replica_ceiling_is_capped() {
        let config: AppscaleConfig = toml::from_str("[scale]\nreplica_ceiling = 300\n").unwrap();
        assert_eq!(config.replica_ceiling(), MAX_REPLICA_CEILING);
    }
}

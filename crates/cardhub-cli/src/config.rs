//! Hub configuration file.
//!
//! Looked up at `--config PATH`, else `config.toml` in the platform config
//! folder:
//! - Linux: ~/.config/cardhub/
//! - macOS: ~/Library/Application Support/org.cardhub.CardHub/
//! - Windows: %APPDATA%/cardhub/CardHub/config/
//!
//! A missing file means defaults. Every key is optional:
//!
//! ```toml
//! database = "/srv/cardhub/hub.sqlite3"
//! default_user = "ana"
//!
//! [format]
//! main_limit = 50
//! egg_limit = 5
//! default_max_copies = 4
//!
//! [cache]
//! stale_days = 30
//!
//! [display]
//! currency = "R$"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cardhub_core::{HubSettings, STALE_AFTER_DAYS};
use cardhub_validate::FormatLimits;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

const APP_QUALIFIER: &str = "org";
const APP_ORG: &str = "cardhub";
const APP_NAME: &str = "CardHub";
const CONFIG_FILENAME: &str = "config.toml";
const DATABASE_FILENAME: &str = "cardhub.sqlite3";

/// Environment variable overriding the database path.
pub const DB_ENV: &str = "CARDHUB_DB";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub database: Option<PathBuf>,
    /// Username used when `--user` is not given.
    pub default_user: Option<String>,
    pub format: FormatLimits,
    pub cache: CacheConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub stale_days: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_days: STALE_AFTER_DAYS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Printed before every price.
    pub currency: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency: "R$".to_string(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

fn default_database_path() -> PathBuf {
    project_dirs().map_or_else(
        || PathBuf::from(DATABASE_FILENAME),
        |dirs| dirs.data_dir().join(DATABASE_FILENAME),
    )
}

impl HubConfig {
    /// Read and parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parse config {}", path.display()))
    }

    /// An explicit path must exist; the platform default may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn settings(&self) -> HubSettings {
        HubSettings {
            limits: self.format,
            stale_days: self.cache.stale_days,
        }
    }

    /// Database to open: `--db`, then the environment, then the config
    /// file, then the platform data folder.
    pub fn database_path(&self, flag: Option<&Path>, env: Option<String>) -> PathBuf {
        if let Some(path) = flag {
            return path.to_path_buf();
        }
        if let Some(value) = env.filter(|value| !value.trim().is_empty()) {
            return PathBuf::from(value);
        }
        self.database.clone().unwrap_or_else(default_database_path)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_means_defaults() {
        let config: HubConfig = toml::from_str("").unwrap();
        assert_eq!(config, HubConfig::default());
        assert_eq!(config.settings(), HubSettings::default());
        assert_eq!(config.display.currency, "R$");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: HubConfig = toml::from_str(
            r#"
            default_user = "ana"

            [format]
            main_limit = 40

            [cache]
            stale_days = 7
            "#,
        )
        .unwrap();
        assert_eq!(config.default_user.as_deref(), Some("ana"));
        assert_eq!(config.format.main_limit, 40);
        assert_eq!(config.format.egg_limit, 5);
        assert_eq!(config.settings().stale_days, 7);
    }

    #[test]
    fn database_precedence() {
        let config = HubConfig {
            database: Some(PathBuf::from("from-config.sqlite3")),
            ..HubConfig::default()
        };
        let flag = PathBuf::from("from-flag.sqlite3");
        assert_eq!(
            config.database_path(Some(&flag), Some("from-env.sqlite3".into())),
            flag
        );
        assert_eq!(
            config.database_path(None, Some("from-env.sqlite3".into())),
            PathBuf::from("from-env.sqlite3")
        );
        assert_eq!(
            config.database_path(None, Some("  ".into())),
            PathBuf::from("from-config.sqlite3")
        );
        assert_eq!(
            config.database_path(None, None),
            PathBuf::from("from-config.sqlite3")
        );
    }

    #[test]
    fn serialized_config_parses_back() {
        let mut config = HubConfig::default();
        config.display.currency = "€".to_string();
        let parsed: HubConfig = toml::from_str(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}

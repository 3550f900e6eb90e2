//! Application configuration.
//!
//! Values are layered: built-in defaults, then
//! `<config_dir>/treasure-hunter/config.toml`, then `TREASURE_HUNTER__*`
//! environment variables (for example `TREASURE_HUNTER__SEED=42`).

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const APP_DIR: &str = "treasure-hunter";
const CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "TREASURE_HUNTER";

const DEFAULT_CONFIG: &str = r##"# Treasure Hunter configuration.
#
# Name offered at the title prompt.
# hunter_name = "ann"
#
# Fixed seed; every game replays the same towns and dice.
# seed = 42
#
# Where treasure-hunter.log is written.
# log_dir = "/tmp/treasure-hunter"
#
# Colour overrides per narrative tone (hex).
# [theme]
# gold = "#f5a623"
# danger = "#e5534b"
"##;

/// User-facing settings for the game and its terminal driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default hunter name offered at the title prompt.
    pub hunter_name: Option<String>,
    /// Seed for the session RNG; entropy is used when unset.
    pub seed: Option<u64>,
    /// Directory holding the log file.
    pub log_dir: PathBuf,
    /// Hex colour overrides keyed by tone name (`gold`, `danger`, ...).
    pub theme: BTreeMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            hunter_name: None,
            seed: None,
            log_dir: default_log_dir(),
            theme: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Load from the default config file and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load from `path` (optional) and the environment.
    pub fn load_from(path: &Path) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("failed to read configuration from {}", path.display()))?;
        let config: AppConfig = settings
            .try_deserialize()
            .context("invalid configuration values")?;
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Path of the log file inside [`log_dir`](Self::log_dir).
    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("treasure-hunter.log")
    }
}

/// Location of the user's config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::cache_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

/// Write the commented default config if none exists yet.
pub fn ensure_default_config() -> Result<()> {
    ensure_default_config_at(&config_path()).map(|_| ())
}

/// Same as [`ensure_default_config`] for an explicit path. Returns true when
/// a file was written.
pub fn ensure_default_config_at(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write default config to {}", path.display()))?;
    info!(path = %path.display(), "wrote default configuration");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_file_is_created_once_and_parses_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        assert!(ensure_default_config_at(&path).unwrap());
        assert!(!ensure_default_config_at(&path).unwrap());

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.hunter_name, None);
        assert_eq!(config.seed, None);
        assert!(config.theme.is_empty());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            "hunter_name = \"kenji\"\nseed = 7\nlog_dir = \"/var/tmp/th\"\n\n[theme]\ngold = \"#ffcc00\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.hunter_name.as_deref(), Some("kenji"));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.log_file(), PathBuf::from("/var/tmp/th/treasure-hunter.log"));
        assert_eq!(config.theme.get("gold").map(String::as_str), Some("#ffcc00"));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.log_dir, default_log_dir());
    }

    #[test]
    fn malformed_values_are_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "seed = \"soon\"\n").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }
}

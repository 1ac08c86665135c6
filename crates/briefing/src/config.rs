use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use briefing_spec::{MetricsSettings, SettingsError};
use directories::ProjectDirs;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const CONFIG_ENV: &str = "BRIEFING_CONFIG";
pub const CONFIG_FILE: &str = "briefing.toml";

/// Engine settings read from `briefing.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub metrics: MetricsSettings,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config {path}: {source}")]
    Settings {
        path: PathBuf,
        #[source]
        source: SettingsError,
    },
}

impl EngineConfig {
    /// Resolves the config file: explicit path, then `BRIEFING_CONFIG`, then
    /// the user config directory. Falls back to defaults when none exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        if let Some(path) = env::var_os(CONFIG_ENV).filter(|value| !value.is_empty()) {
            return Self::from_path(Path::new(&path));
        }
        match default_path() {
            Some(path) if path.is_file() => Self::from_path(&path),
            _ => {
                debug!("no briefing config found; using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw, path)?;
        debug!(path = %path.display(), "briefing config loaded");
        Ok(config)
    }

    fn from_toml_str(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config
            .metrics
            .validate()
            .map_err(|source| ConfigError::Settings {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(config)
    }
}

/// `<config dir>/briefing.toml` for the current user, when a home directory exists.
pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "briefing").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

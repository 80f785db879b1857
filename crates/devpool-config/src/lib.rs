//! devpool configuration
//!
//! Settings are read from a YAML file and then overridden by environment
//! variables. The file is searched in this order:
//!
//! 1. `DEVPOOL_CONFIG_PATH` (direct path)
//! 2. current directory: `devpool.local.yaml`, `devpool.yaml`, `.devpool.yaml`
//! 3. `~/.config/devpool/config.yaml`
//!
//! Without any file the defaults apply.

pub mod error;

pub use error::*;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "DEVPOOL_CONFIG_PATH";
pub const GMSAAS_PATH_ENV: &str = "DEVPOOL_GMSAAS_PATH";
pub const REGISTRY_PATH_ENV: &str = "DEVPOOL_REGISTRY_PATH";
pub const SESSION_ID_ENV: &str = "DEVPOOL_SESSION_ID";

const LOCAL_CANDIDATES: [&str; 3] = ["devpool.local.yaml", "devpool.yaml", ".devpool.yaml"];

/// devpool settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// gmsaas executable (name on PATH or absolute path)
    pub gmsaas_path: String,

    /// JSON file holding the busy device registry
    pub registry_path: PathBuf,

    /// Session identifier used for instance naming
    pub session_id: String,

    /// Leading component of generated instance names
    pub name_prefix: String,

    /// Lookup-then-claim rounds before giving up
    pub claim_attempts: u32,

    /// Age after which a registry lock file is treated as abandoned
    pub lock_stale_after_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            gmsaas_path: "gmsaas".to_string(),
            registry_path: default_registry_path(),
            session_id: default_session_id(),
            name_prefix: "Detox".to_string(),
            claim_attempts: 3,
            lock_stale_after_secs: 3600,
        }
    }
}

/// devpool's directory under the user config dir (not created)
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("devpool"))
}

fn default_registry_path() -> PathBuf {
    get_config_dir()
        .unwrap_or_else(|| std::env::temp_dir().join("devpool"))
        .join("busy-devices.json")
}

fn default_session_id() -> String {
    format!("{}-{}", std::process::id(), Utc::now().timestamp_millis())
}

/// Find the config file, if any
pub fn find_config_file() -> Result<Option<PathBuf>> {
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(Some(path));
        }
        tracing::warn!("{} points to missing file {}", CONFIG_PATH_ENV, path.display());
    }

    let current_dir = std::env::current_dir()?;
    Ok(find_config_file_in(&current_dir, get_config_dir().as_deref()))
}

fn find_config_file_in(dir: &Path, global_dir: Option<&Path>) -> Option<PathBuf> {
    LOCAL_CANDIDATES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
        .or_else(|| {
            global_dir
                .map(|dir| dir.join("config.yaml"))
                .filter(|path| path.exists())
        })
}

impl PoolConfig {
    /// Load settings from `explicit`, or from the first file found, then
    /// apply environment overrides
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => find_config_file()?,
        };

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => {
                tracing::debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML config file; missing keys take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var(GMSAAS_PATH_ENV) {
            self.gmsaas_path = path;
        }
        if let Ok(path) = std::env::var(REGISTRY_PATH_ENV) {
            self.registry_path = PathBuf::from(path);
        }
        if let Ok(id) = std::env::var(SESSION_ID_ENV) {
            self.session_id = id;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.gmsaas_path.trim().is_empty() {
            return Err(ConfigError::Invalid("gmsaas_path must not be empty".to_string()));
        }
        if self.claim_attempts == 0 {
            return Err(ConfigError::Invalid(
                "claim_attempts must be at least 1".to_string(),
            ));
        }
        // '.' separates the parts of an instance name
        for (field, value) in [
            ("session_id", &self.session_id),
            ("name_prefix", &self.name_prefix),
        ] {
            if value.is_empty() || value.contains('.') {
                return Err(ConfigError::Invalid(format!(
                    "{} must be non-empty and must not contain '.': '{}'",
                    field, value
                )));
            }
        }
        Ok(())
    }
}

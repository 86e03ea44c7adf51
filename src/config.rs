//! Configuration loading, validation and migration.
//!
//! The rule table lives in `oneseat.toml`:
//!
//! ```toml
//! version = 1
//!
//! [[vehicles]]
//! vehicle_type_match = "minicopter.entity"
//! prevent_if_driver_present = true
//! prevent_if_passenger_present = true
//! allow_teammates = true
//! ```
//!
//! Startup never fails on bad rules: [`load_or_init`] falls back to the
//! built-in table and writes it back. Explicit reloads use the strict
//! [`load_config`] so a half-edited file cannot wipe a working table.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::policy::{RuleTable, VehicleRule};

/// Schema version written by this build.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "ONESEAT_CONFIG_PATH";

/// File name of the config inside [`config_dir`].
pub const CONFIG_FILE_NAME: &str = "oneseat.toml";

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// Persisted configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Schema version; files written before versioning parse as `0`.
    #[serde(default)]
    pub version: u32,

    /// Vehicle rules in match order.
    #[serde(default)]
    pub vehicles: Vec<VehicleRule>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CURRENT_SCHEMA_VERSION,
            vehicles: RuleTable::defaults().rules().to_vec(),
        }
    }
}

impl Config {
    /// The rule table described by this config.
    pub fn rule_table(&self) -> RuleTable {
        RuleTable::new(self.vehicles.clone())
    }

    /// Check that every rule can be matched meaningfully.
    ///
    /// # Errors
    ///
    /// Returns a description of the first offending rule. An empty match
    /// string would regulate every vehicle, so it is rejected.
    pub fn validate(&self) -> Result<(), String> {
        for (index, rule) in self.vehicles.iter().enumerate() {
            if rule.vehicle_type_match.trim().is_empty() {
                return Err(format!("vehicles[{index}] has an empty vehicle_type_match"));
            }
        }
        Ok(())
    }
}

/// Errors from reading or writing the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`Config`].
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// The file parsed but contains an unusable rule.
    #[error("invalid config at {}: {reason}", path.display())]
    Invalid {
        /// Config file path.
        path: PathBuf,
        /// What is wrong.
        reason: String,
    },

    /// The config could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The file could not be written.
    #[error("failed to write config at {}: {source}", path.display())]
    Write {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    fn is_not_found(&self) -> bool {
        matches!(self, Self::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

// ---------------------------------------------------------------------------
// Migration
// ---------------------------------------------------------------------------

/// Record of a schema migration applied at load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    /// Version found in the file.
    pub from: u32,
    /// Version after migration.
    pub to: u32,
    /// Whether the stored rules were replaced with the defaults.
    pub reset_to_defaults: bool,
}

/// Bring `config` up to [`CURRENT_SCHEMA_VERSION`].
///
/// Pre-versioned files (version `0`) are replaced with the default table.
/// Returns `None` when the config is already current.
pub fn migrate(config: Config) -> (Config, Option<Migration>) {
    if config.version >= CURRENT_SCHEMA_VERSION {
        return (config, None);
    }

    let from = config.version;
    let reset_to_defaults = from < 1;
    let mut migrated = if reset_to_defaults {
        Config::default()
    } else {
        config
    };
    migrated.version = CURRENT_SCHEMA_VERSION;

    (
        migrated,
        Some(Migration {
            from,
            to: CURRENT_SCHEMA_VERSION,
            reset_to_defaults,
        }),
    )
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Migrate and validate a freshly parsed config.
fn prepare(config: Config, path: &Path) -> Result<(Config, Option<Migration>), ConfigError> {
    let (config, migration) = migrate(config);
    if let Some(m) = migration {
        warn!(
            from = m.from,
            to = m.to,
            reset = m.reset_to_defaults,
            "config changes detected, migrated"
        );
    }
    config.validate().map_err(|reason| ConfigError::Invalid {
        path: path.to_path_buf(),
        reason,
    })?;
    Ok((config, migration))
}

/// Strictly load the config at `path`: read, parse, migrate, validate.
///
/// # Errors
///
/// Returns a [`ConfigError`] if any step fails. Nothing is written.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let (config, _) = load_config_with_migration(path)?;
    Ok(config)
}

/// Like [`load_config`], also reporting the migration applied, if any, so the
/// caller can persist the upgraded file.
///
/// # Errors
///
/// Same as [`load_config`].
pub fn load_config_with_migration(
    path: &Path,
) -> Result<(Config, Option<Migration>), ConfigError> {
    let config = read_config(path)?;
    prepare(config, path)
}

/// Load the config at `path`, falling back to the defaults.
///
/// A missing, unreadable, unparsable or invalid file yields
/// [`Config::default`], which is written back to `path`. A migrated file is
/// written back as well.
///
/// # Errors
///
/// Only fails if the resulting config cannot be persisted.
pub fn load_or_init(path: &Path) -> Result<Config, ConfigError> {
    let (config, dirty) = match read_config(path).and_then(|c| prepare(c, path)) {
        Ok((config, migration)) => (config, migration.is_some()),
        Err(e) if e.is_not_found() => {
            info!(path = %path.display(), "no config file found, writing defaults");
            (Config::default(), true)
        }
        Err(e) => {
            warn!(error = %e, "config unusable, falling back to default rules");
            (Config::default(), true)
        }
    };

    if dirty {
        save_config(path, &config)?;
    }
    Ok(config)
}

/// Write `config` to `path` as pretty TOML, creating parent directories.
///
/// # Errors
///
/// Returns a [`ConfigError`] if serialization or the write fails.
pub fn save_config(path: &Path, config: &Config) -> Result<(), ConfigError> {
    let contents = toml::to_string_pretty(config)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    // Write-then-rename so a watcher never reads a half-written file.
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, contents)
        .and_then(|()| std::fs::rename(&tmp, path))
        .map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// Resolve the default config directory (`~/.oneseat/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".oneseat"))
}

/// Resolve the config file path: `$ONESEAT_CONFIG_PATH`, else
/// `~/.oneseat/oneseat.toml`.
///
/// # Errors
///
/// Returns an error if no override is set and the home directory is unknown.
pub fn config_path() -> anyhow::Result<PathBuf> {
    config_path_with(|key| std::env::var(key).ok())
}

/// Resolve the config path using a custom env resolver.
///
/// # Errors
///
/// Same as [`config_path`].
pub fn config_path_with(env: impl Fn(&str) -> Option<String>) -> anyhow::Result<PathBuf> {
    if let Some(p) = env(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

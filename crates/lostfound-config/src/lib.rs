//! Shared configuration for the lost & found tools.
//!
//! Built-in defaults, then the TOML file, then `LOSTFOUND_*` environment
//! variables, merged with figment and translated to
//! `lostfound_core::CatalogConfig`. Command-line overrides are applied by
//! the front end on top of the loaded `Config`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lostfound_core::CatalogConfig;
use lostfound_core::config::{DEFAULT_ID_PREFIX, DEFAULT_ID_WIDTH, DEFAULT_RECONCILE_INTERVAL};

/// Environment prefix; nested keys use `__` (`LOSTFOUND_DEFAULTS__OUTPUT`).
pub const ENV_PREFIX: &str = "LOSTFOUND_";

/// Widest sequence padding accepted; `u64::MAX` has 20 digits.
const MAX_ID_WIDTH: usize = 20;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// SQLite database file. Falls back to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,

    /// Seconds between reconciliation passes; 0 disables the timer.
    #[serde(default = "default_reconcile_interval")]
    pub reconcile_interval_secs: u64,

    /// Prefix of allocated identifiers.
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,

    /// Zero-padded width of the identifier sequence.
    #[serde(default = "default_id_width")]
    pub id_width: usize,

    /// Presentation defaults for the CLI.
    #[serde(default)]
    pub defaults: Defaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            reconcile_interval_secs: default_reconcile_interval(),
            id_prefix: default_id_prefix(),
            id_width: default_id_width(),
            defaults: Defaults::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_reconcile_interval() -> u64 {
    DEFAULT_RECONCILE_INTERVAL.as_secs()
}
fn default_id_prefix() -> String {
    DEFAULT_ID_PREFIX.into()
}
fn default_id_width() -> usize {
    DEFAULT_ID_WIDTH
}
fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

impl Config {
    /// Database file to open: the configured one, else the default.
    pub fn database_path(&self) -> PathBuf {
        self.database.clone().unwrap_or_else(default_database_path)
    }

    /// Validate and translate into the core runtime configuration.
    pub fn to_catalog_config(&self) -> Result<CatalogConfig, ConfigError> {
        let prefix = self.id_prefix.trim();
        if prefix.is_empty() {
            return Err(ConfigError::Validation {
                field: "id_prefix".into(),
                reason: "must not be empty".into(),
            });
        }
        if prefix.chars().any(|c| c.is_ascii_digit() || c.is_whitespace()) {
            return Err(ConfigError::Validation {
                field: "id_prefix".into(),
                reason: format!("'{prefix}' must not contain digits or whitespace"),
            });
        }
        if !(1..=MAX_ID_WIDTH).contains(&self.id_width) {
            return Err(ConfigError::Validation {
                field: "id_width".into(),
                reason: format!("expected 1..={MAX_ID_WIDTH}, got {}", self.id_width),
            });
        }

        Ok(CatalogConfig {
            reconcile_interval: Duration::from_secs(self.reconcile_interval_secs),
            id_prefix: prefix.to_owned(),
            id_width: self.id_width,
        })
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "lostfound", "lostfound")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default SQLite file in the platform data directory.
pub fn default_database_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share").join("lostfound.db"),
        |dirs| dirs.data_dir().join("lostfound.db"),
    )
}

fn dirs_fallback(base: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(base);
    p.push("lostfound");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from defaults, file and environment.
///
/// `path` replaces the canonical config location when given. A missing
/// file is not an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`, or the canonical
/// config path. Returns where it was written.
pub fn save_config(cfg: &Config, path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(path)
}

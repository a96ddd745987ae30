//! CLI configuration: thin wrapper around `lostfound_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--config, --database, --output).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::ValueEnum;
use lostfound_core::{ItemRepository, LostAndFound};
use lostfound_store::SqliteRepository;
use tracing::debug;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use lostfound_config::{Config, config_path, load_config, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Config file in effect: `--config` / `LOSTFOUND_CONFIG`, else the
/// platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config_path)
}

/// Load config and fold in flag overrides.
///
/// Fills `global.output` / `global.color` from the config defaults when
/// the flags were not given.
pub fn resolve(global: &mut GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = load_config(Some(&config_file(global)))?;

    if let Some(ref database) = global.database {
        cfg.database = Some(database.clone());
    }
    if global.output.is_none() {
        global.output = Some(parse_default(&cfg.defaults.output, "defaults.output")?);
    }
    if global.color.is_none() {
        global.color = Some(parse_default(&cfg.defaults.color, "defaults.color")?);
    }
    Ok(cfg)
}

fn parse_default<T: ValueEnum>(value: &str, field: &str) -> Result<T, CliError> {
    T::from_str(value, true).map_err(|reason| CliError::Validation {
        field: field.into(),
        reason,
    })
}

/// Open the SQLite store and the catalog facade over it.
///
/// `interval_override` replaces the configured reconciliation period.
pub async fn open_desk(
    cfg: &Config,
    interval_override: Option<u64>,
) -> Result<LostAndFound, CliError> {
    let mut catalog_config = cfg.to_catalog_config()?;
    if let Some(secs) = interval_override {
        catalog_config.reconcile_interval = Duration::from_secs(secs);
    }

    let path = cfg.database_path();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let repository = SqliteRepository::open(&path)
        .await
        .map_err(|source| CliError::StoreOpen {
            path: path.display().to_string(),
            source,
        })?;
    debug!(path = %path.display(), "store opened");

    let desk = LostAndFound::open(catalog_config, Arc::new(repository) as Arc<dyn ItemRepository>)
        .await?;
    Ok(desk)
}


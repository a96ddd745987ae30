//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use lostfound_config::ConfigError;
use lostfound_core::CoreError;
use lostfound_store::StoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const STORE: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Store ────────────────────────────────────────────────────────
    #[error("Could not open item store at {path}")]
    #[diagnostic(
        code(lostfound::store_open),
        help(
            "Check that the directory is writable, or point elsewhere with\n\
             --database <FILE> or LOSTFOUND_DATABASE."
        )
    )]
    StoreOpen {
        path: String,
        #[source]
        source: StoreError,
    },

    #[error("Item store unavailable: {message}")]
    #[diagnostic(
        code(lostfound::store_unavailable),
        help("The report was not saved. Retry once the store is reachable.")
    )]
    StoreUnavailable { message: String },

    // ── Items ────────────────────────────────────────────────────────
    #[error("Item '{identifier}' not found")]
    #[diagnostic(
        code(lostfound::not_found),
        help("Run: lostfound list to see active reports")
    )]
    NotFound { identifier: String },

    #[error("Identifier '{identifier}' is already taken")]
    #[diagnostic(
        code(lostfound::conflict),
        help("Another writer used the same identifier. Submit the report again.")
    )]
    Conflict { identifier: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(lostfound::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(lostfound::config),
        help("Inspect the resolved settings with: lostfound config show")
    )]
    Config(#[from] ConfigError),

    #[error("Config file already exists at {path}")]
    #[diagnostic(
        code(lostfound::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    #[diagnostic(code(lostfound::internal))]
    Internal(String),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON output failed: {0}")]
    #[diagnostic(code(lostfound::json))]
    Json(#[from] serde_json::Error),

    #[error("YAML output failed: {0}")]
    #[diagnostic(code(lostfound::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML output failed: {0}")]
    #[diagnostic(code(lostfound::toml))]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::StoreOpen { .. } | Self::StoreUnavailable { .. } => exit_code::STORE,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } | Self::ConfigExists { .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::Config(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidItem(invalid) => CliError::Validation {
                field: invalid.field.into(),
                reason: "must not be empty".into(),
            },

            CoreError::DuplicateIdentifier { id } => CliError::Conflict {
                identifier: id.to_string(),
            },

            CoreError::RepositoryUnavailable { message } => CliError::StoreUnavailable { message },

            CoreError::NotFound { id } => CliError::NotFound {
                identifier: id.to_string(),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

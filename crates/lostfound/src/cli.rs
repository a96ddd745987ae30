//! Clap derive structures for the `lostfound` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use lostfound_core::{Category, ReportType, SearchQuery};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// lostfound -- report and browse lost & found items
#[derive(Debug, Parser)]
#[command(
    name = "lostfound",
    version,
    about = "Report and browse lost & found items",
    long_about = "A lost & found desk backed by a local SQLite store.\n\n\
        Reports are written to the store and mirrored into an in-memory\n\
        catalog that is kept in sync by periodic reconciliation.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "LOSTFOUND_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file (overrides config)
    #[arg(long, short = 'd', env = "LOSTFOUND_DATABASE", global = true)]
    pub database: Option<PathBuf>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "LOSTFOUND_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

impl GlobalOpts {
    pub fn output_format(&self) -> &OutputFormat {
        self.output.as_ref().unwrap_or(&OutputFormat::Table)
    }

    pub fn color_mode(&self) -> &ColorMode {
        self.color.as_ref().unwrap_or(&ColorMode::Auto)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one identifier per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report a lost or found item
    #[command(alias = "r")]
    Report(ReportArgs),

    /// List active reports
    #[command(alias = "ls")]
    List(FilterArgs),

    /// Show a single report by identifier
    Show {
        /// Item identifier (e.g. ITEM001)
        id: String,
    },

    /// Search reports by text, category and type
    #[command(alias = "s")]
    Search(SearchArgs),

    /// Count active reports per category
    Categories,

    /// Follow the catalog and print reports as they arrive
    Watch(WatchArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Filter Arguments ──────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Only this category (case-insensitive)
    #[arg(long, short = 'c')]
    pub category: Option<Category>,

    /// Only lost or found reports
    #[arg(long = "type", short = 't')]
    pub report_type: Option<ReportType>,
}

impl FilterArgs {
    pub fn to_query(&self, text: Option<String>) -> SearchQuery {
        SearchQuery {
            text,
            category: self.category,
            report_type: self.report_type,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  REPORT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Short name of the item
    pub name: String,

    /// Item category
    #[arg(long, short = 'c')]
    pub category: Category,

    /// Whether the item was lost or found
    #[arg(long = "type", short = 't')]
    pub report_type: ReportType,

    /// Where it was lost or found
    #[arg(long, short = 'l')]
    pub location: String,

    /// Free-form description
    #[arg(long, default_value = "")]
    pub description: String,

    /// How to reach the reporter
    #[arg(long, default_value = "")]
    pub contact: String,

    /// Reporter name (defaults to Anonymous)
    #[arg(long)]
    pub reporter: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SEARCH / WATCH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Text matched against name and description
    pub text: Option<String>,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Query the store directly instead of the in-memory catalog
    #[arg(long)]
    pub store: bool,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between reconciliation passes (overrides config)
    #[arg(long, short = 'i', value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Exit after this many catalog updates
    #[arg(long, short = 'n')]
    pub count: Option<usize>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG / COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

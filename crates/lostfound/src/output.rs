//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::fmt::Write as _;
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use lostfound_core::{Item, ItemStatus, ReportType};
use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

fn paint_type(report_type: ReportType, color: bool) -> String {
    match (report_type, color) {
        (_, false) => report_type.to_string(),
        (ReportType::Lost, true) => report_type.red().bold().to_string(),
        (ReportType::Found, true) => report_type.green().bold().to_string(),
    }
}

fn paint_status(status: ItemStatus, color: bool) -> String {
    match (status, color) {
        (_, false) => status.to_string(),
        (ItemStatus::Active, true) => status.cyan().to_string(),
        (ItemStatus::Claimed | ItemStatus::Closed, true) => status.dimmed().to_string(),
    }
}

// ── Item rows ────────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct ItemRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Type")]
    report_type: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Arc<Item>> for ItemRow {
    fn from(item: &Arc<Item>) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            category: item.category.to_string(),
            report_type: item.report_type.to_string(),
            location: item.location.clone(),
            date: item.reported_on.to_string(),
            status: item.status.to_string(),
        }
    }
}

/// Multi-line detail view for `show` and `report`.
pub fn item_detail(item: &Item, color: bool) -> String {
    let mut out = String::new();
    let title = if color {
        item.id.bold().to_string()
    } else {
        item.id.to_string()
    };
    let _ = writeln!(out, "{title}  {}", item.name);
    let _ = writeln!(out, "  Type:        {}", paint_type(item.report_type, color));
    let _ = writeln!(out, "  Category:    {}", item.category);
    let _ = writeln!(out, "  Location:    {}", item.location);
    if !item.description.is_empty() {
        let _ = writeln!(out, "  Description: {}", item.description);
    }
    if !item.contact.is_empty() {
        let _ = writeln!(out, "  Contact:     {}", item.contact);
    }
    let _ = writeln!(out, "  Reported by: {}", item.reported_by);
    let _ = writeln!(out, "  Reported on: {}", item.reported_on);
    let _ = write!(out, "  Status:      {}", paint_status(item.status, color));
    out
}

/// Render a set of items in the chosen format.
pub fn render_items(format: &OutputFormat, items: &[Arc<Item>]) -> Result<String, CliError> {
    render_list(format, items, |i| ItemRow::from(i), |i| i.id.to_string())
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted string,
/// since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    if rows.is_empty() {
        return "No items.".into();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let text = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(text)
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}

//! Read-side handlers: list, show, search, categories.

use std::sync::Arc;

use lostfound_core::{Category, ItemId, LostAndFound};
use serde::Serialize;
use strum::IntoEnumIterator;
use tabled::Tabled;

use crate::cli::{FilterArgs, GlobalOpts, SearchArgs};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Clone, Copy, Serialize, Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    category: Category,
    #[tabled(rename = "Items")]
    items: usize,
}

// ── Handlers ────────────────────────────────────────────────────────

/// Active reports from the catalog, optionally filtered.
pub fn list(desk: &LostAndFound, filter: &FilterArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let items = desk.search(&filter.to_query(None));
    let out = output::render_items(global.output_format(), &items)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// One report, falling back to the store for claimed or closed ones.
pub async fn show(desk: &LostAndFound, id: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let item = desk.item(&ItemId::new(id.trim())).await?;
    let color = output::should_color(global.color_mode());
    let out = output::render_single(
        global.output_format(),
        &item,
        |i| output::item_detail(i, color),
        |i| i.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn search(
    desk: &LostAndFound,
    args: SearchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let query = args.filter.to_query(args.text);
    let items = if args.store {
        desk.search_store(&query)
            .await?
            .into_iter()
            .map(Arc::new)
            .collect::<Vec<_>>()
    } else {
        desk.search(&query)
    };
    let out = output::render_items(global.output_format(), &items)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Every category with its number of active reports.
pub fn categories(desk: &LostAndFound, global: &GlobalOpts) -> Result<(), CliError> {
    let counts = desk.catalog().category_counts();
    let rows: Vec<CategoryRow> = Category::iter()
        .map(|category| CategoryRow {
            category,
            items: counts.get(&category).copied().unwrap_or(0),
        })
        .collect();
    let out = output::render_list(
        global.output_format(),
        &rows,
        |r| *r,
        |r| format!("{}\t{}", r.category, r.items),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

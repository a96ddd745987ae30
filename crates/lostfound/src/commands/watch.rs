//! Watch command: follow catalog snapshots as the reconciler publishes them.

use std::collections::HashSet;
use std::sync::Arc;

use lostfound_core::{Item, ItemId, LostAndFound};
use tracing::info;

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    desk: &LostAndFound,
    args: &WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if desk.reconciler().interval().is_zero() {
        return Err(CliError::Validation {
            field: "reconcile_interval_secs".into(),
            reason: "watch needs a non-zero interval; nothing else refreshes the catalog".into(),
        });
    }

    let mut stream = desk.watch();
    let mut seen = HashSet::new();

    emit(&unseen(stream.current(), &mut seen), global)?;
    if args.count == Some(0) {
        return Ok(());
    }

    desk.start().await;
    info!(interval = ?desk.reconciler().interval(), "watching catalog");

    let mut updates = 0;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            snapshot = stream.changed() => {
                let Some(snapshot) = snapshot else { break };
                emit(&unseen(&snapshot, &mut seen), global)?;
                updates += 1;
                if args.count.is_some_and(|limit| updates >= limit) {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Items in `snapshot` not printed before, in snapshot order.
fn unseen(snapshot: &[Arc<Item>], seen: &mut HashSet<ItemId>) -> Vec<Arc<Item>> {
    snapshot
        .iter()
        .filter(|item| seen.insert(item.id.clone()))
        .cloned()
        .collect()
}

fn emit(items: &[Arc<Item>], global: &GlobalOpts) -> Result<(), CliError> {
    if items.is_empty() {
        return Ok(());
    }
    let out = output::render_items(global.output_format(), items)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

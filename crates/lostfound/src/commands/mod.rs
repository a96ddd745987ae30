//! Command dispatch: bridges CLI args -> catalog facade -> output formatting.

pub mod config_cmd;
pub mod items;
pub mod report;
pub mod watch;

use lostfound_core::LostAndFound;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a catalog-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    desk: &LostAndFound,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Report(args) => report::handle(desk, args, global).await,
        Command::List(filter) => items::list(desk, &filter, global),
        Command::Show { id } => items::show(desk, &id, global).await,
        Command::Search(args) => items::search(desk, args, global).await,
        Command::Categories => items::categories(desk, global),
        Command::Watch(args) => watch::handle(desk, &args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "command does not use the catalog".into(),
        )),
    }
}

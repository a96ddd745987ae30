//! Report command handler.

use lostfound_core::{LostAndFound, NewItem};
use tracing::info;

use crate::cli::{GlobalOpts, ReportArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    desk: &LostAndFound,
    args: ReportArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut draft = NewItem::new(args.name, args.category, args.report_type, args.location)
        .with_description(args.description)
        .with_contact(args.contact);
    if let Some(reporter) = args.reporter {
        draft = draft.with_reporter(reporter);
    }

    let item = desk.report(draft).await?;
    info!(id = %item.id, "report submitted");

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

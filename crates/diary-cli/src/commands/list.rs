use diary_core::storage::HydratedEntry;
use diary_core::TimelineState;
use tracing::debug;

use crate::app::AppContext;
use crate::cli::ListArgs;
use crate::constants::DEFAULT_LIST_LIMIT;
use crate::output::{print_json, timeline_json};
use crate::ui::format::{format_tags, format_timestamp, single_line, truncate};
use crate::ui::{badge, header, hint, table, validate_format, Badge, Row, Spinner, UiContext};

fn matches_tag(entry: &HydratedEntry, tag: Option<&str>) -> bool {
    match tag {
        Some(wanted) => entry
            .record
            .tag_list()
            .iter()
            .any(|t| t.eq_ignore_ascii_case(wanted.trim())),
        None => true,
    }
}

fn entry_row(ui: &UiContext, entry: &HydratedEntry) -> Row {
    let pretty = ui.mode.is_pretty();
    let mut title = single_line(&entry.record.title);
    let cid = if pretty {
        title = truncate(&title, 40);
        entry.id.short().to_string()
    } else {
        entry.id.to_string()
    };
    if entry.locked {
        title = badge(ui, Badge::Locked, &title);
    }
    Row::new(vec![
        cid,
        format_timestamp(
            &entry.record.timestamp,
            entry.record.parsed_timestamp(),
            pretty,
        ),
        title,
        format_tags(&entry.record.tag_list()),
    ])
    .muted(entry.locked)
}

pub async fn handle_list(ctx: &AppContext<'_>, args: &ListArgs) -> anyhow::Result<()> {
    if let Some(format) = args.format.as_deref() {
        validate_format(format)?;
    }
    let ui = ctx.ui_context(args.json, args.format.as_deref());

    let store = ctx.store()?;
    let registry = ctx.registry()?;
    let session = ctx.session(args.no_key, args.no_input).await?;

    let mut state = TimelineState::new();
    let spinner = Spinner::start(&ui, "Opening entries");
    let refreshed = session.refresh(&mut state, &store, &registry).await;
    spinner.finish();
    refreshed?;

    let Some(timeline) = state.current() else {
        debug!("no batch result installed");
        return Ok(());
    };

    let limit = args.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    let entries: Vec<&HydratedEntry> = timeline
        .entries
        .iter()
        .filter(|e| matches_tag(e, args.tag.as_deref()))
        .take(limit)
        .collect();

    if ui.mode.is_json() {
        return print_json(&timeline_json(&entries, &timeline.unavailable));
    }

    if ui.mode.is_pretty() && !ctx.quiet() {
        let context = args.tag.as_deref().map(|t| format!("tag {}", t));
        println!("{}", header(&ui, "list", context.as_deref()));
    }

    if entries.is_empty() {
        if !ctx.quiet() {
            println!("No entries found.");
            println!("{}", hint(&ui, "Add one with `diary add --title \"...\"`"));
        }
    } else {
        let rows: Vec<Row> = entries.iter().map(|e| entry_row(&ui, e)).collect();
        println!("{}", table(&ui, &["CID", "Date", "Title", "Tags"], &rows));
    }

    if !timeline.unavailable.is_empty() {
        eprintln!(
            "{}",
            badge(
                &ui,
                Badge::Warn,
                &format!(
                    "{} entries could not be fetched",
                    timeline.unavailable.len()
                )
            )
        );
    }

    let locked = timeline.locked_count();
    if locked > 0 && !ctx.quiet() {
        let text = if session.is_unlocked() {
            format!(
                "{} entries are sealed for a different wallet signature.",
                locked
            )
        } else {
            format!(
                "{} sealed entries are locked; drop --no-key to unlock them.",
                locked
            )
        };
        println!("{}", hint(&ui, &text));
    }
    Ok(())
}

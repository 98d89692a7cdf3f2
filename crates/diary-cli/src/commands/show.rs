use diary_core::storage::{Registry, StoredEntry};
use diary_core::hydrate;

use crate::app::AppContext;
use crate::cli::ShowArgs;
use crate::errors::CliError;
use crate::output::{entry_json, print_json};
use crate::ui::format::{format_tags, format_timestamp};
use crate::ui::theme::{styled, styles};
use crate::ui::{badge, hint, kv, Badge};

/// Find the one stored entry whose identifier starts with `prefix`.
fn resolve_prefix<'a>(stored: &'a [StoredEntry], prefix: &str) -> anyhow::Result<&'a StoredEntry> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Err(CliError::invalid_input("Content identifier cannot be empty").into());
    }
    // A full identifier may be registered more than once; take the latest.
    if let Some(exact) = stored.iter().rev().find(|e| e.id.as_str() == prefix) {
        return Ok(exact);
    }
    let matches: Vec<&StoredEntry> = stored
        .iter()
        .filter(|e| e.id.as_str().starts_with(prefix))
        .collect();
    match matches.as_slice() {
        [single] => Ok(single),
        [] => Err(CliError::not_found(
            format!("No entry matching {}", prefix),
            "Hint: Run `diary list` to see content identifiers.",
        )
        .into()),
        many => Err(CliError::invalid_input(format!(
            "Identifier prefix {} is ambiguous ({} entries match)\nHint: Use more characters.",
            prefix,
            many.len()
        ))
        .into()),
    }
}

pub async fn handle_show(ctx: &AppContext<'_>, args: &ShowArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(args.json, None);

    let store = ctx.store()?;
    let registry = ctx.registry()?;
    let session = ctx.session(args.no_key, args.no_input).await?;

    let stored = registry.list(session.owner()).await?;
    let target = resolve_prefix(&stored, &args.id)?;

    let timeline = hydrate(&store, std::slice::from_ref(target), session.key()).await;
    let Some(entry) = timeline.entries.first() else {
        let reason = timeline
            .unavailable
            .first()
            .map(|u| u.reason.as_str())
            .unwrap_or("unknown error");
        return Err(anyhow::anyhow!(
            "Entry {} could not be fetched: {}",
            target.id,
            reason
        ));
    };

    if ui.mode.is_json() {
        return print_json(&entry_json(entry));
    }

    let record = &entry.record;
    let status = match (entry.encrypted, entry.locked) {
        (_, true) => "locked",
        (true, false) => "sealed",
        (false, false) => "legacy plaintext",
    };

    if ui.mode.is_pretty() {
        let title = if entry.locked {
            badge(&ui, Badge::Locked, &record.title)
        } else {
            styled(&record.title, styles::bold(), ui.color)
        };
        println!("{}", title);
    } else {
        println!("{}", kv(&ui, "Title", &record.title));
    }
    println!("{}", kv(&ui, "CID", entry.id.as_str()));
    println!(
        "{}",
        kv(
            &ui,
            "Date",
            &format_timestamp(&record.timestamp, record.parsed_timestamp(), ui.mode.is_pretty())
        )
    );
    println!("{}", kv(&ui, "Tags", &format_tags(&record.tag_list())));
    println!("{}", kv(&ui, "Status", status));
    println!();
    println!("{}", record.content);

    if entry.locked && !session.is_unlocked() {
        println!();
        println!("{}", hint(&ui, "Drop --no-key to unlock this entry."));
    }
    Ok(())
}

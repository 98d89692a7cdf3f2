//! JSON output for entries.

use serde_json::{json, Value};

use diary_core::storage::HydratedEntry;
use diary_core::timeline::Unavailable;

/// Convert an entry to JSON for output.
pub fn entry_json(entry: &HydratedEntry) -> Value {
    json!({
        "cid": entry.id.as_str(),
        "recorded_at": entry.recorded_at.to_rfc3339(),
        "title": entry.record.title,
        "content": entry.record.content,
        "tags": entry.record.tag_list(),
        "timestamp": entry.record.timestamp,
        "encrypted": entry.encrypted,
        "locked": entry.locked,
    })
}

/// JSON document for `diary list`.
pub fn timeline_json(entries: &[&HydratedEntry], unavailable: &[Unavailable]) -> Value {
    json!({
        "entries": entries.iter().map(|e| entry_json(e)).collect::<Vec<_>>(),
        "unavailable": unavailable
            .iter()
            .map(|u| json!({ "cid": u.id.as_str(), "reason": u.reason }))
            .collect::<Vec<_>>(),
    })
}

pub fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

//! List the native event catalogue.

use huddle_session::catalogue::{self, SideEffect};
use serde::Serialize;

#[derive(Serialize)]
struct EventRow {
    native: &'static str,
    aliases: &'static [&'static str],
    releases_remote_stream: bool,
}

pub fn run(json: bool) -> anyhow::Result<()> {
    let rows: Vec<EventRow> = catalogue::entries()
        .iter()
        .map(|e| EventRow {
            native: e.native,
            aliases: e.aliases,
            releases_remote_stream: matches!(e.effect, SideEffect::ReleaseRemoteStream { .. }),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let width = rows.iter().map(|r| r.native.len()).max().unwrap_or(0);
    for row in &rows {
        let marker = if row.releases_remote_stream { "  [releases stream]" } else { "" };
        println!("{:<width$}  -> {}{marker}", row.native, row.aliases.join(", "));
    }
    println!();
    println!(
        "{} native events, {} external names",
        rows.len(),
        catalogue::all_aliases().len()
    );
    Ok(())
}

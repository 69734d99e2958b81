use crate::commands::init_app;
use crate::output::{Output, OutputFormat};
use anikura_core::{query, RecordFilter};
use anikura_models::{AnimeRecord, MediaKind};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use serde_json::json;
use std::time::Duration;

const TRANSLATION_DRAIN: Duration = Duration::from_secs(10);

pub async fn run_list(
    year: Option<i32>,
    kind: Option<String>,
    status: Option<String>,
    search: Option<String>,
    output: &Output,
) -> Result<()> {
    let app = init_app()?;
    let kind = kind
        .map(|k| k.parse::<MediaKind>().map_err(|e| eyre!(e)))
        .transpose()?;
    let filter = RecordFilter {
        year,
        kind,
        status,
        search,
    };

    let mut records = query(&app.library, &filter);

    // Rendering offers every title for translation; give fresh results a
    // short window to land, then re-query so patched titles show up.
    if let Some(translator) = &app.translator {
        for record in &records {
            translator.consider_title(record.id, &record.title);
        }
        if translator.pending_count() > 0 {
            translator.wait_idle(TRANSLATION_DRAIN).await;
            records = query(&app.library, &filter);
        }
    }

    if records.is_empty() {
        output.info("No records match");
        return Ok(());
    }

    match output.format() {
        OutputFormat::Human => {
            output.println(render_table(&records, &app.watched.ids()));
            output.info(format!("{} record(s)", records.len()));
        }
        _ => {
            let rows: Vec<serde_json::Value> = records
                .iter()
                .map(|r| {
                    json!({
                        "id": r.id,
                        "title": r.title,
                        "kind": r.kind.as_str(),
                        "status": r.status,
                        "year": r.year,
                        "episodes": r.episodes,
                        "score": r.score,
                        "url": r.url,
                        "watched": app.watched.contains(r.id),
                    })
                })
                .collect();
            output.json(&json!({ "type": "list", "records": rows }));
        }
    }
    Ok(())
}

fn render_table(records: &[AnimeRecord], watched: &[u64]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(["", "ID", "Title", "Kind", "Year", "Eps", "Score", "Status"]);
    for record in records {
        let mark = if watched.contains(&record.id) { "✓" } else { "" };
        table.add_row([
            Cell::new(mark),
            Cell::new(record.id),
            Cell::new(&record.title),
            Cell::new(record.kind.as_str()),
            Cell::new(record.year.map(|y| y.to_string()).unwrap_or_default()),
            Cell::new(record.episodes.map(|e| e.to_string()).unwrap_or_default()),
            Cell::new(
                record
                    .score
                    .map(|s| format!("{:.2}", s))
                    .unwrap_or_default(),
            ),
            Cell::new(&record.status),
        ]);
    }
    table.to_string()
}

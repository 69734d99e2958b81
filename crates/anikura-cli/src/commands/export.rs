use crate::commands::init_app;
use crate::output::{Output, OutputFormat};
use anikura_core::year_table;
use color_eyre::eyre::Context;
use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use serde_json::json;
use std::path::PathBuf;

pub async fn run_export(out: PathBuf, columns: usize, output: &Output) -> Result<()> {
    let app = init_app()?;
    let start = app.config.fetch.year_start;
    let end = app.config.fetch.year_end;
    let rows = year_table(&app.library, start, end, columns);

    let mut table = Table::new();
    let mut header = vec!["Year".to_string()];
    header.extend((1..=columns).map(|i| format!("#{}", i)));
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    let mut populated_years = 0usize;
    for (year, records) in &rows {
        if records.is_empty() {
            continue;
        }
        populated_years += 1;
        let mut row = vec![year.to_string()];
        row.extend(
            records
                .iter()
                .map(|r| format!("{} ({:.2})", r.title, r.score_or_zero())),
        );
        row.resize(columns + 1, String::new());
        table.add_row(row);
    }

    std::fs::write(&out, format!("{}\n", table))
        .with_context(|| format!("Failed to write export to {}", out.display()))?;

    match output.format() {
        OutputFormat::Human => {
            output.success(format!(
                "Exported {} year(s) to {}",
                populated_years,
                out.display()
            ));
        }
        _ => {
            output.json(&json!({
                "type": "export",
                "path": out.display().to_string(),
                "years": populated_years,
            }));
        }
    }
    Ok(())
}

use crate::commands::init_app;
use crate::output::{Output, OutputFormat};
use anikura_core::{hot_year, shelf_stats, watched_per_year};
use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Table};
use serde_json::json;

pub async fn run_stats(output: &Output) -> Result<()> {
    let app = init_app()?;
    let stats = shelf_stats(&app.library, &app.watched);
    let per_year = watched_per_year(&app.library, &app.watched);
    let hot = hot_year(&app.library, &app.watched);

    match output.format() {
        OutputFormat::Human => {
            output.println(format!("Shelf:    {} record(s)", stats.loaded));
            output.println(format!(
                "Watched:  {} ({:.1}% coverage)",
                stats.watched, stats.coverage_percent
            ));
            if let Some((year, count)) = hot {
                output.println(format!("Hot year: {} ({} watched)", year, count));
            }
            if !per_year.is_empty() {
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL_CONDENSED)
                    .set_header(["Year", "Watched"]);
                for (year, count) in per_year.iter().rev() {
                    table.add_row([year.to_string(), count.to_string()]);
                }
                output.println(table.to_string());
            }
        }
        _ => {
            let per_year: Vec<serde_json::Value> = per_year
                .iter()
                .map(|(year, count)| json!({ "year": year, "watched": count }))
                .collect();
            output.json(&json!({
                "type": "stats",
                "loaded": stats.loaded,
                "watched": stats.watched,
                "coverage_percent": stats.coverage_percent,
                "hot_year": hot.map(|(year, count)| json!({ "year": year, "watched": count })),
                "per_year": per_year,
            }));
        }
    }
    Ok(())
}

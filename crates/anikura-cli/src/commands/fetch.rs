use crate::commands::init_app;
use crate::output::{Output, OutputFormat};
use anikura_core::{App, YearReport};
use anikura_sources::JikanClient;
use color_eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const TRANSLATION_DRAIN: Duration = Duration::from_secs(30);

pub async fn run_fetch(year: Option<i32>, pages: Option<u32>, output: &Output) -> Result<()> {
    let app = init_app()?;
    let year = year.unwrap_or(app.config.fetch.year_end);
    let pages = pages.unwrap_or(app.config.fetch.light_pages);

    output.info(format!("Fetching {} ({} pages)...", year, pages));
    let ingestor = app.ingestor(Arc::new(JikanClient::new()));
    let report = ingestor.fetch_year(year, pages).await;

    if report.pages_fetched == 0 && report.pages_requested > 0 {
        output.error(format!("No pages fetched for {}", year));
    }
    report_year(&report, output);
    drain_translations(&app, output).await;
    Ok(())
}

pub async fn run_prefetch(deep: bool, output: &Output) -> Result<()> {
    let app = init_app()?;
    let pages = if deep {
        app.config.fetch.deep_pages
    } else {
        app.config.fetch.light_pages
    };
    let start = app.config.fetch.year_start;
    let end = app.config.fetch.year_end;

    let years = (end - start + 1).max(0) as u64;
    info!("Prefetch starting: years {}..={}, {} page(s) each", start, end, pages);
    output.info(format!(
        "Prefetching {} through {} ({} pages per year)...",
        end, start, pages
    ));

    let bar = year_bar(years, output);
    let ingestor = app.ingestor(Arc::new(JikanClient::new()));
    let mut total_records = 0usize;
    let mut failed_years = 0u32;

    // Newest years first so an interrupted run still covers recent seasons.
    for year in (start..=end).rev() {
        bar.set_message(format!("{}", year));
        let report = ingestor.fetch_year(year, pages).await;
        total_records += report.records;
        if report.pages_fetched == 0 && report.pages_requested > 0 {
            failed_years += 1;
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    if failed_years > 0 {
        output.warn(format!("{} year(s) returned no pages", failed_years));
    }
    match output.format() {
        OutputFormat::Human => {
            output.success(format!("Prefetch complete: {} records stored", total_records));
        }
        _ => {
            output.json(&json!({
                "type": "prefetch",
                "records": total_records,
                "failed_years": failed_years,
            }));
        }
    }
    drain_translations(&app, output).await;
    Ok(())
}

fn report_year(report: &YearReport, output: &Output) {
    match output.format() {
        OutputFormat::Human => {
            output.success(format!(
                "Year {}: {} records across {}/{} pages",
                report.year, report.records, report.pages_fetched, report.pages_requested
            ));
            if report.rate_limited_pages > 0 {
                output.warn(format!(
                    "{} page(s) skipped after exhausting rate-limit retries",
                    report.rate_limited_pages
                ));
            }
            if report.failed_pages > 0 {
                output.warn(format!("{} page(s) failed", report.failed_pages));
            }
        }
        _ => {
            output.json(&json!({
                "type": "fetch",
                "year": report.year,
                "records": report.records,
                "pages_fetched": report.pages_fetched,
                "pages_requested": report.pages_requested,
                "rate_limited_pages": report.rate_limited_pages,
                "failed_pages": report.failed_pages,
            }));
        }
    }
}

/// Give queued translation tasks a bounded window to land before the
/// process exits, then report where they got to.
async fn drain_translations(app: &App, output: &Output) {
    let Some(translator) = &app.translator else {
        return;
    };
    if translator.pending_count() > 0 {
        output.info("Waiting for title translations...");
        translator.wait_idle(TRANSLATION_DRAIN).await;
    }
    let progress = translator.progress();
    if progress.queued_total > 0 {
        output.info(format!(
            "Translations: {}/{} resolved ({:.0}%)",
            progress.completed, progress.queued_total, progress.percent
        ));
    }
}

fn year_bar(years: u64, output: &Output) -> ProgressBar {
    // Bars only make sense on an interactive human terminal.
    if output.format() != OutputFormat::Human
        || output.is_quiet()
        || !std::io::stdout().is_terminal()
    {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(years);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("█▉▊▋▌▍▎▏  "),
    );
    bar
}

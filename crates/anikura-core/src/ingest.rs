use crate::library::Library;
use crate::translator::TranslationCoordinator;
use anikura_sources::{CatalogSource, FetchError, PageFetch};
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of ingesting one release year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YearReport {
    pub year: i32,
    pub pages_requested: u32,
    pub pages_fetched: u32,
    pub records: usize,
    pub rate_limited_pages: u32,
    pub failed_pages: u32,
}

/// Drives page fetches for a year into the library, handing every
/// stored title to the translation coordinator when one is attached.
pub struct Ingestor {
    source: Arc<dyn CatalogSource>,
    library: Arc<Library>,
    translator: Option<TranslationCoordinator>,
}

impl Ingestor {
    pub fn new(
        source: Arc<dyn CatalogSource>,
        library: Arc<Library>,
        translator: Option<TranslationCoordinator>,
    ) -> Self {
        Self {
            source,
            library,
            translator,
        }
    }

    /// Fetch `pages` sequential pages for one year, pausing after each
    /// one regardless of outcome. A bad page is logged and counted,
    /// never fatal for the year; everything stored before the failure
    /// stays stored. A rate-limit-exhausted page leaves the library
    /// untouched.
    pub async fn fetch_year(&self, year: i32, pages: u32) -> YearReport {
        let mut report = YearReport {
            year,
            pages_requested: pages,
            ..Default::default()
        };

        for page in 1..=pages {
            let keep_going = match self.source.fetch_page(year, page).await {
                Ok(PageFetch::Page(records)) => {
                    report.pages_fetched += 1;
                    if records.is_empty() {
                        // No data past this point for the year.
                        false
                    } else {
                        report.records += records.len();
                        for record in records {
                            let id = record.id;
                            let title = record.title.clone();
                            if let Err(e) = self.library.upsert(record) {
                                warn!("Failed to store record {}: {}", id, e);
                                continue;
                            }
                            if let Some(translator) = &self.translator {
                                translator.consider_title(id, &title);
                            }
                        }
                        true
                    }
                }
                Ok(PageFetch::RateLimitExhausted) => {
                    warn!("Rate limit exhausted on {} page {}, skipping", year, page);
                    report.rate_limited_pages += 1;
                    true
                }
                Err(FetchError::BadRequest) => {
                    warn!("Catalog rejected {} page {}, abandoning year", year, page);
                    report.failed_pages += 1;
                    false
                }
                Err(e) => {
                    warn!("Failed to fetch {} page {}: {}", year, page, e);
                    report.failed_pages += 1;
                    true
                }
            };
            // The pause follows every page, the year's last included, so
            // back-to-back years in a prefetch stay under the same
            // aggregate rate bound.
            self.source.cool_down().await;
            if !keep_going {
                break;
            }
        }

        info!(
            "Year {}: {} records across {}/{} pages",
            year, report.records, report.pages_fetched, report.pages_requested
        );
        report
    }
}

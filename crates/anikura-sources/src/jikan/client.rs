use super::api::PageEnvelope;
use super::normalize;
use crate::error::FetchError;
use crate::traits::{CatalogSource, PageFetch};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// Fixed page size of the catalog's search endpoint.
pub const PAGE_SIZE: u32 = 25;

const MAX_ATTEMPTS: u32 = 4;
const INITIAL_BACKOFF_MS: u64 = 800;
const BACKOFF_CEILING_MS: u64 = 4000;
const RATE_LIMIT_GROWTH: f64 = 1.8;
const RETRY_GROWTH: f64 = 1.6;
const PAGE_COOL_DOWN_MS: u64 = 500;

/// Rate-limited client for the Jikan v4 anime search endpoint.
///
/// Pages are queried by release-date range, ordered score-descending by
/// the service itself. Each page fetch runs its own bounded retry loop
/// with exponential backoff; the per-page cool-down keeps multi-year
/// runs under the service's rate limits by pacing, not by an external
/// limiter.
#[derive(Clone)]
pub struct JikanClient {
    client: Client,
    base_url: String,
}

impl JikanClient {
    pub fn new() -> Self {
        Self::with_base_url("https://api.jikan.moe/v4")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn fetch_page_inner(&self, year: i32, page: u32) -> Result<PageFetch, FetchError> {
        let url = format!(
            "{}/anime?start_date={year}-01-01&end_date={year}-12-31&order_by=score&sort=desc&limit={PAGE_SIZE}&page={page}",
            self.base_url
        );

        let mut delay = Duration::from_millis(INITIAL_BACKOFF_MS);
        for attempt in 1..=MAX_ATTEMPTS {
            let response = self
                .client
                .get(&url)
                .header("Accept", "application/json")
                .send()
                .await?;
            let status = response.status();

            if status.is_success() {
                let envelope: PageEnvelope = response.json().await?;
                let records: Vec<_> = envelope.data.iter().map(normalize::normalize).collect();
                debug!("Fetched {} records for {} page {}", records.len(), year, page);
                return Ok(PageFetch::Page(records));
            }

            match classify_status(status) {
                StatusClass::RateLimited => {
                    debug!(
                        "Rate limited on {} page {} (attempt {}/{}), backing off {}ms",
                        year,
                        page,
                        attempt,
                        MAX_ATTEMPTS,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    delay = grow_backoff(delay, RATE_LIMIT_GROWTH);
                }
                StatusClass::Fatal => {
                    warn!("Catalog rejected the query for {} page {}", year, page);
                    return Err(FetchError::BadRequest);
                }
                StatusClass::Transient => {
                    if attempt == MAX_ATTEMPTS {
                        return Err(FetchError::Status(status.as_u16()));
                    }
                    warn!(
                        "HTTP {} on {} page {} (attempt {}/{}), retrying in {}ms",
                        status,
                        year,
                        page,
                        attempt,
                        MAX_ATTEMPTS,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    delay = grow_backoff(delay, RETRY_GROWTH);
                }
            }
        }

        // Every attempt was consumed by 429s. Callers see this as its
        // own outcome and must not read it as "no more data".
        warn!("Rate-limit budget exhausted for {} page {}", year, page);
        Ok(PageFetch::RateLimitExhausted)
    }
}

impl Default for JikanClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogSource for JikanClient {
    async fn fetch_page(&self, year: i32, page: u32) -> Result<PageFetch, FetchError> {
        self.fetch_page_inner(year, page).await
    }

    async fn cool_down(&self) {
        tokio::time::sleep(Duration::from_millis(PAGE_COOL_DOWN_MS)).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusClass {
    /// 429: wait and retry, never surfaces as an error.
    RateLimited,
    /// 400: fail immediately, the request itself is bad.
    Fatal,
    /// Anything else non-success: retry, error out on the last attempt.
    Transient,
}

fn classify_status(status: StatusCode) -> StatusClass {
    match status {
        StatusCode::TOO_MANY_REQUESTS => StatusClass::RateLimited,
        StatusCode::BAD_REQUEST => StatusClass::Fatal,
        _ => StatusClass::Transient,
    }
}

fn grow_backoff(current: Duration, factor: f64) -> Duration {
    let next = (current.as_millis() as f64 * factor).round() as u64;
    Duration::from_millis(next.min(BACKOFF_CEILING_MS))
}

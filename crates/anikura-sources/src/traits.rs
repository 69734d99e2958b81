use crate::error::FetchError;
use anikura_models::AnimeRecord;
use async_trait::async_trait;

/// Outcome of a single page fetch.
///
/// Exhausting every retry attempt on rate-limit responses is a named
/// variant rather than an empty page, so callers can tell throttling
/// apart from "no more data exists".
#[derive(Debug)]
pub enum PageFetch {
    /// Normalized records, score-descending as the service orders them.
    Page(Vec<AnimeRecord>),
    /// Every attempt was rate-limited; no data, no error.
    RateLimitExhausted,
}

/// A paged, score-ordered catalog of anime records.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch one page for a release year. Implementations run their own
    /// bounded retry loop; a returned error is final for that page.
    async fn fetch_page(&self, year: i32, page: u32) -> Result<PageFetch, FetchError>;

    /// Pause between successive page fetches. Default no-op for stubs.
    async fn cool_down(&self) {}
}

use thiserror::Error;

/// Errors surfaced by the catalog client.
///
/// Rate-limit exhaustion is deliberately not an error; see
/// [`crate::traits::PageFetch::RateLimitExhausted`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// The service rejected the request outright. Retrying the same
    /// query is pointless; narrow it or slow down.
    #[error("catalog rejected the request (HTTP 400)")]
    BadRequest,

    /// A non-rate-limit failure survived every retry attempt.
    #[error("catalog returned HTTP {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

pub mod app;
pub mod ingest;
pub mod library;
pub mod query;
pub mod stats;
pub mod storage;
pub mod translator;
pub mod watched;

pub use app::App;
pub use ingest::{Ingestor, YearReport};
pub use library::Library;
pub use query::{query, RecordFilter};
pub use stats::{hot_year, shelf_stats, watched_per_year, year_table, ShelfStats};
pub use storage::Storage;
pub use translator::{TitleDisposition, TranslationCoordinator, TranslationProgress};
pub use watched::WatchedSet;

/// Lock a mutex, recovering the inner data if a panicking holder
/// poisoned it.
pub(crate) fn lock<T>(mutex: &std::sync::Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

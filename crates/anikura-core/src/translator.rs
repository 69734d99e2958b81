use crate::library::Library;
use crate::lock;
use crate::storage::Storage;
use anikura_models::script;
use anikura_sources::TranslationBackend;
use anyhow::Result;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

/// What `consider_title` decided to do with a candidate title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleDisposition {
    /// Empty, already Chinese, or nothing translatable in it.
    NotNeeded,
    /// The cache held this exact text; the record was patched in place
    /// without any provider call.
    PatchedFromCache,
    /// Another record with the same source text already has a
    /// resolution task in flight.
    AlreadyInFlight,
    /// A new resolution task was spawned.
    Queued,
}

/// Session progress counters.
///
/// `queued_total` only ever grows within a session, so `percent` is a
/// history-dependent, monotonically improving measure rather than a
/// snapshot of currently visible work.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranslationProgress {
    pub queued_total: usize,
    pub pending: usize,
    pub completed: usize,
    pub percent: f64,
}

/// Resolves non-Chinese titles through the provider chain, one in-flight
/// task per distinct source text, and patches records by id as results
/// arrive.
///
/// A cheap handle over shared state; clones observe the same cache,
/// pending set, and counters. The text-to-text cache is append-only and
/// persisted on every accepted result; the pending set is transient.
/// Tasks are fire-and-forget with no cancellation: process teardown
/// abandons them.
#[derive(Clone)]
pub struct TranslationCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    cache: Mutex<HashMap<String, String>>,
    pending: Mutex<HashSet<String>>,
    queued_total: AtomicUsize,
    backend: Arc<dyn TranslationBackend>,
    library: Arc<Library>,
    storage: Storage,
}

impl TranslationCoordinator {
    pub fn load(
        storage: Storage,
        library: Arc<Library>,
        backend: Arc<dyn TranslationBackend>,
    ) -> Self {
        let cache = storage.load_translations();
        if !cache.is_empty() {
            debug!("Loaded {} cached translations", cache.len());
        }
        Self {
            inner: Arc::new(Inner {
                cache: Mutex::new(cache),
                pending: Mutex::new(HashSet::new()),
                queued_total: AtomicUsize::new(0),
                backend,
                library,
                storage,
            }),
        }
    }

    /// Fire-and-forget entry point, invoked per record on upsert and on
    /// render. Idempotent per distinct source text: identical titles on
    /// many records trigger at most one in-flight task.
    pub fn consider_title(&self, id: u64, title: &str) -> TitleDisposition {
        if title.is_empty() || !script::needs_translation(title) {
            return TitleDisposition::NotNeeded;
        }

        if let Some(translated) = lock(&self.inner.cache).get(title).cloned() {
            if let Err(e) = self.inner.library.patch_title(id, translated) {
                warn!("Failed to persist cached translation for {}: {}", id, e);
            }
            return TitleDisposition::PatchedFromCache;
        }

        {
            let mut pending = lock(&self.inner.pending);
            if !pending.insert(title.to_string()) {
                return TitleDisposition::AlreadyInFlight;
            }
        }
        self.inner.queued_total.fetch_add(1, Ordering::SeqCst);

        let inner = Arc::clone(&self.inner);
        let text = title.to_string();
        tokio::spawn(async move {
            inner.resolve(id, text).await;
        });
        TitleDisposition::Queued
    }

    pub fn progress(&self) -> TranslationProgress {
        self.inner.progress()
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.inner.pending).len()
    }

    pub fn cache_len(&self) -> usize {
        lock(&self.inner.cache).len()
    }

    /// The one reset point for the session counter. Never called
    /// automatically; the counter otherwise only grows.
    pub fn reset_counter(&self) {
        self.inner.queued_total.store(0, Ordering::SeqCst);
    }

    /// Cooperatively wait until no resolution task is in flight, up to
    /// `max_wait`. Tasks left running past the deadline are abandoned
    /// to finish (or not) on their own.
    pub async fn wait_idle(&self, max_wait: Duration) {
        let deadline = tokio::time::Instant::now() + max_wait;
        while self.pending_count() > 0 && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }

    /// Drop the persisted text-to-text cache.
    pub fn clear_cache(&self) -> Result<()> {
        let mut cache = lock(&self.inner.cache);
        cache.clear();
        self.inner.storage.clear_translations()
    }
}

impl Inner {
    /// Resolution task body. Provider failures are swallowed: the title
    /// simply stays in its prior state and only the counters move.
    async fn resolve(self: Arc<Self>, id: u64, text: String) {
        let accepted = match self.backend.resolve(&text).await {
            Some(candidate) if candidate != text && script::is_chinese(&candidate) => {
                Some(candidate)
            }
            Some(rejected) => {
                debug!("Discarding unusable translation {:?} for {:?}", rejected, text);
                None
            }
            None => None,
        };

        if let Some(translated) = &accepted {
            // Guard held across the write so a concurrent resolution
            // cannot persist a snapshot missing this entry afterwards.
            {
                let mut cache = lock(&self.cache);
                cache.insert(text.clone(), translated.clone());
                if let Err(e) = self.storage.save_translations(&cache) {
                    warn!("Failed to persist translation cache: {}", e);
                }
            }
            // The patch applies by id only, no version check: if a
            // fresher fetch replaced the record in the interim, the
            // stale translation still lands on it.
            if let Err(e) = self.library.patch_title(id, translated.clone()) {
                warn!("Failed to apply translation to record {}: {}", id, e);
            }
        }

        lock(&self.pending).remove(&text);
        let progress = self.progress();
        debug!(
            "Translation progress: {}/{} completed, {} pending",
            progress.completed, progress.queued_total, progress.pending
        );
    }

    fn progress(&self) -> TranslationProgress {
        let queued_total = self.queued_total.load(Ordering::SeqCst);
        let pending = lock(&self.pending).len();
        let completed = queued_total.saturating_sub(pending);
        let percent = if queued_total == 0 {
            100.0
        } else {
            completed as f64 / queued_total as f64 * 100.0
        };
        TranslationProgress {
            queued_total,
            pending,
            completed,
            percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anikura_models::{AnimeRecord, MediaKind};
    use async_trait::async_trait;
    use tokio::sync::Notify;

    struct StubBackend {
        reply: Option<String>,
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    impl StubBackend {
        fn answering(reply: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.map(str::to_string),
                calls: AtomicUsize::new(0),
                gate: None,
            })
        }

        fn gated(reply: &str, gate: Arc<Notify>) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply.to_string()),
                calls: AtomicUsize::new(0),
                gate: Some(gate),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TranslationBackend for StubBackend {
        async fn resolve(&self, _text: &str) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.reply.clone()
        }
    }

    fn record(id: u64, title: &str) -> AnimeRecord {
        AnimeRecord {
            id,
            title: title.to_string(),
            kind: MediaKind::Tv,
            status: String::new(),
            year: Some(2013),
            episodes: Some(25),
            score: Some(8.5),
            image_url: String::new(),
            url: String::new(),
            aired: String::new(),
        }
    }

    fn setup(
        backend: Arc<StubBackend>,
    ) -> (tempfile::TempDir, Arc<Library>, TranslationCoordinator) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::at(dir.path()).unwrap();
        let library = Arc::new(Library::load(storage.clone()));
        let coordinator = TranslationCoordinator::load(storage, Arc::clone(&library), backend);
        (dir, library, coordinator)
    }

    #[tokio::test]
    async fn chinese_and_untranslatable_titles_are_skipped() {
        let backend = StubBackend::answering(Some("unused"));
        let (_dir, _library, coordinator) = setup(backend.clone());

        assert_eq!(coordinator.consider_title(1, "进击的巨人"), TitleDisposition::NotNeeded);
        assert_eq!(coordinator.consider_title(2, ""), TitleDisposition::NotNeeded);
        assert_eq!(coordinator.consider_title(3, "2013"), TitleDisposition::NotNeeded);
        assert_eq!(backend.calls(), 0);
        assert_eq!(coordinator.progress().queued_total, 0);
    }

    #[tokio::test]
    async fn cache_hit_patches_without_a_provider_call() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::at(dir.path()).unwrap();
        storage
            .save_translations(&HashMap::from([(
                "Attack on Titan".to_string(),
                "进击的巨人".to_string(),
            )]))
            .unwrap();
        let library = Arc::new(Library::load(storage.clone()));
        library.upsert(record(1, "Attack on Titan")).unwrap();
        let backend = StubBackend::answering(Some("unused"));
        let coordinator =
            TranslationCoordinator::load(storage, Arc::clone(&library), backend.clone());

        let disposition = coordinator.consider_title(1, "Attack on Titan");

        assert_eq!(disposition, TitleDisposition::PatchedFromCache);
        assert_eq!(library.get(1).unwrap().title, "进击的巨人");
        assert_eq!(backend.calls(), 0);
        assert_eq!(coordinator.pending_count(), 0);
        assert_eq!(coordinator.progress().queued_total, 0);
    }

    #[tokio::test]
    async fn identical_titles_share_one_in_flight_task() {
        let gate = Arc::new(Notify::new());
        let backend = StubBackend::gated("进击的巨人", gate.clone());
        let (_dir, library, coordinator) = setup(backend.clone());
        library.upsert(record(1, "Attack on Titan")).unwrap();
        library.upsert(record(3, "Attack on Titan")).unwrap();

        assert_eq!(coordinator.consider_title(1, "Attack on Titan"), TitleDisposition::Queued);
        assert_eq!(
            coordinator.consider_title(3, "Attack on Titan"),
            TitleDisposition::AlreadyInFlight
        );
        assert_eq!(coordinator.progress().queued_total, 1);
        assert_eq!(coordinator.pending_count(), 1);

        gate.notify_one();
        coordinator.wait_idle(Duration::from_secs(5)).await;

        assert_eq!(backend.calls(), 1);
        assert_eq!(library.get(1).unwrap().title, "进击的巨人");
        // The second record is only patched the next time it is
        // considered, now served from the cache.
        assert_eq!(
            coordinator.consider_title(3, "Attack on Titan"),
            TitleDisposition::PatchedFromCache
        );
        assert_eq!(library.get(3).unwrap().title, "进击的巨人");
    }

    #[tokio::test]
    async fn rejected_answers_leave_the_title_untouched() {
        let backend = StubBackend::answering(Some("still not chinese"));
        let (_dir, library, coordinator) = setup(backend.clone());
        library.upsert(record(1, "Attack on Titan")).unwrap();

        coordinator.consider_title(1, "Attack on Titan");
        coordinator.wait_idle(Duration::from_secs(5)).await;

        assert_eq!(library.get(1).unwrap().title, "Attack on Titan");
        let progress = coordinator.progress();
        assert_eq!(progress.pending, 0);
        assert_eq!(progress.completed, 1);
        assert_eq!(coordinator.cache_len(), 0);
    }

    #[tokio::test]
    async fn accepted_answers_persist_to_the_cache() {
        let backend = StubBackend::answering(Some("刀剑神域"));
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::at(dir.path()).unwrap();
        let library = Arc::new(Library::load(storage.clone()));
        library.upsert(record(9, "Sword Art Online")).unwrap();
        let coordinator =
            TranslationCoordinator::load(storage.clone(), Arc::clone(&library), backend);

        coordinator.consider_title(9, "Sword Art Online");
        coordinator.wait_idle(Duration::from_secs(5)).await;

        assert_eq!(library.get(9).unwrap().title, "刀剑神域");
        let persisted = storage.load_translations();
        assert_eq!(persisted.get("Sword Art Online").map(String::as_str), Some("刀剑神域"));
    }

    #[tokio::test]
    async fn progress_is_fully_complete_when_nothing_was_queued() {
        let backend = StubBackend::answering(None);
        let (_dir, _library, coordinator) = setup(backend);
        let progress = coordinator.progress();
        assert_eq!(progress.percent, 100.0);
        assert_eq!(progress.completed, 0);
    }

    #[tokio::test]
    async fn counter_only_resets_through_the_reset_operation() {
        let backend = StubBackend::answering(None);
        let (_dir, library, coordinator) = setup(backend);
        library.upsert(record(1, "Alpha Title")).unwrap();
        library.upsert(record(2, "Beta Title")).unwrap();

        coordinator.consider_title(1, "Alpha Title");
        coordinator.consider_title(2, "Beta Title");
        coordinator.wait_idle(Duration::from_secs(5)).await;

        assert_eq!(coordinator.progress().queued_total, 2);
        coordinator.reset_counter();
        assert_eq!(coordinator.progress().queued_total, 0);
    }
}

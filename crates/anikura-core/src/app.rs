use crate::ingest::Ingestor;
use crate::library::Library;
use crate::storage::Storage;
use crate::translator::TranslationCoordinator;
use crate::watched::WatchedSet;
use anikura_config::{Config, PathManager};
use anikura_sources::{CatalogSource, ProviderChain};
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

/// Shared application state: configuration, persisted stores, and the
/// translation coordinator (absent when translation is disabled).
pub struct App {
    pub config: Config,
    pub paths: PathManager,
    pub storage: Storage,
    pub library: Arc<Library>,
    pub watched: WatchedSet,
    pub translator: Option<TranslationCoordinator>,
}

impl App {
    /// Load everything from the standard paths, creating directories
    /// and falling back to default configuration when none is saved.
    pub fn init() -> Result<Self> {
        let paths = PathManager::default();
        Self::init_at(paths)
    }

    pub fn init_at(paths: PathManager) -> Result<Self> {
        paths.ensure_directories()?;
        let config = Config::load(&paths.config_file())?;
        let storage = Storage::new(&paths)?;
        let library = Arc::new(Library::load(storage.clone()));
        let watched = WatchedSet::load(storage.clone());
        let translator = if config.translation.enabled {
            Some(TranslationCoordinator::load(
                storage.clone(),
                Arc::clone(&library),
                Arc::new(ProviderChain::standard()),
            ))
        } else {
            debug!("Translation disabled by configuration");
            None
        };
        Ok(Self {
            config,
            paths,
            storage,
            library,
            watched,
            translator,
        })
    }

    pub fn ingestor(&self, source: Arc<dyn CatalogSource>) -> Ingestor {
        Ingestor::new(source, Arc::clone(&self.library), self.translator.clone())
    }
}

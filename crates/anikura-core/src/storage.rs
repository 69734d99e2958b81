use anikura_config::PathManager;
use anikura_models::AnimeRecord;
use anyhow::{anyhow, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Persisted snapshots for the three independent stores: the record
/// collection, the watched id list, and the translation cache. Each
/// write is a full snapshot of its store, never an incremental append.
/// An absent file loads as empty.
#[derive(Clone)]
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    pub fn new(path_manager: &PathManager) -> Result<Self> {
        Self::at(path_manager.data_dir())
    }

    pub fn at(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    fn records_path(&self) -> PathBuf {
        self.data_dir.join("records.json")
    }

    fn watched_path(&self) -> PathBuf {
        self.data_dir.join("watched.json")
    }

    fn translations_path(&self) -> PathBuf {
        self.data_dir.join("translations.json")
    }

    pub fn load_records(&self) -> Vec<AnimeRecord> {
        self.load_snapshot(&self.records_path(), "records")
    }

    pub fn save_records(&self, records: &[AnimeRecord]) -> Result<()> {
        self.save_snapshot(&self.records_path(), "records", &records)
    }

    pub fn load_watched(&self) -> Vec<u64> {
        self.load_snapshot(&self.watched_path(), "watched")
    }

    pub fn save_watched(&self, ids: &[u64]) -> Result<()> {
        self.save_snapshot(&self.watched_path(), "watched", &ids)
    }

    pub fn load_translations(&self) -> HashMap<String, String> {
        self.load_snapshot(&self.translations_path(), "translations")
    }

    pub fn save_translations(&self, cache: &HashMap<String, String>) -> Result<()> {
        self.save_snapshot(&self.translations_path(), "translations", cache)
    }

    pub fn clear_records(&self) -> Result<()> {
        remove_if_present(&self.records_path())
    }

    pub fn clear_watched(&self) -> Result<()> {
        remove_if_present(&self.watched_path())
    }

    pub fn clear_translations(&self) -> Result<()> {
        remove_if_present(&self.translations_path())
    }

    /// Corrupt or unreadable snapshots are not fatal: warn, delete the
    /// bad file, and start that store empty.
    fn load_snapshot<T>(&self, path: &Path, store: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        if !path.exists() {
            debug!("Snapshot miss: {} (file does not exist)", store);
            return T::default();
        }
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read {} snapshot: {}", store, e);
                return T::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(data) => {
                info!("Snapshot hit: {} loaded from {}", store, path.display());
                data
            }
            Err(e) => {
                warn!(
                    "Snapshot corruption detected for {}: {}. Deleting corrupted file.",
                    store, e
                );
                if let Err(rm_err) = std::fs::remove_file(path) {
                    warn!("Failed to delete corrupted {} snapshot: {}", store, rm_err);
                }
                T::default()
            }
        }
    }

    fn save_snapshot<T>(&self, path: &Path, store: &str, data: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| anyhow!("Failed to serialize {} snapshot: {}", store, e))?;
        std::fs::write(path, json)
            .map_err(|e| anyhow!("Failed to write {} snapshot: {}", store, e))?;
        debug!("Snapshot saved: {}", store);
        Ok(())
    }
}

fn remove_if_present(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anikura_models::MediaKind;

    fn record(id: u64) -> AnimeRecord {
        AnimeRecord {
            id,
            title: format!("Title {}", id),
            kind: MediaKind::Tv,
            status: "Finished Airing".to_string(),
            year: Some(2020),
            episodes: Some(12),
            score: Some(7.5),
            image_url: String::new(),
            url: String::new(),
            aired: String::new(),
        }
    }

    #[test]
    fn absent_snapshots_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::at(dir.path()).unwrap();
        assert!(storage.load_records().is_empty());
        assert!(storage.load_watched().is_empty());
        assert!(storage.load_translations().is_empty());
    }

    #[test]
    fn records_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::at(dir.path()).unwrap();
        storage.save_records(&[record(1), record(2)]).unwrap();
        let loaded = storage.load_records();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0], record(1));
    }

    #[test]
    fn corrupted_snapshot_is_deleted_and_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::at(dir.path()).unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(storage.load_records().is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn stores_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::at(dir.path()).unwrap();
        storage.save_watched(&[1, 2, 3]).unwrap();
        storage
            .save_translations(&HashMap::from([("a".to_string(), "甲".to_string())]))
            .unwrap();

        storage.clear_watched().unwrap();
        assert!(storage.load_watched().is_empty());
        assert_eq!(storage.load_translations().len(), 1);
    }
}

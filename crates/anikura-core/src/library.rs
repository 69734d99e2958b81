use crate::lock;
use crate::storage::Storage;
use anikura_models::AnimeRecord;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::info;

/// The in-memory record collection plus its persisted snapshot.
///
/// Three actors mutate it with last-write-wins semantics: the fetch
/// pipeline (full-record upserts), the translation coordinator
/// (title-only patches), and user-initiated clears. Exactly one record
/// exists per id at any time.
pub struct Library {
    records: Mutex<HashMap<u64, AnimeRecord>>,
    storage: Storage,
}

impl Library {
    pub fn load(storage: Storage) -> Self {
        let records: HashMap<u64, AnimeRecord> = storage
            .load_records()
            .into_iter()
            .map(|record| (record.id, record))
            .collect();
        if !records.is_empty() {
            info!("Loaded {} records from snapshot", records.len());
        }
        Self {
            records: Mutex::new(records),
            storage,
        }
    }

    /// Insert-or-replace by id, then write the full snapshot. Applying
    /// the same record twice leaves the same observable state. The lock
    /// is held across the write so concurrent mutations cannot persist
    /// a stale snapshot over a newer one.
    pub fn upsert(&self, record: AnimeRecord) -> Result<()> {
        let mut records = lock(&self.records);
        records.insert(record.id, record);
        let snapshot: Vec<AnimeRecord> = records.values().cloned().collect();
        self.storage.save_records(&snapshot)
    }

    /// Title-only patch used by the translation coordinator. Applies by
    /// id with no version check: a patch landing after a fresher fetch
    /// replaced the record overwrites that record's title too. A
    /// missing id (e.g. cleared mid-flight) is a no-op.
    pub fn patch_title(&self, id: u64, title: String) -> Result<()> {
        let mut records = lock(&self.records);
        match records.get_mut(&id) {
            Some(record) => record.title = title,
            None => return Ok(()),
        }
        let snapshot: Vec<AnimeRecord> = records.values().cloned().collect();
        self.storage.save_records(&snapshot)
    }

    pub fn get(&self, id: u64) -> Option<AnimeRecord> {
        lock(&self.records).get(&id).cloned()
    }

    pub fn contains(&self, id: u64) -> bool {
        lock(&self.records).contains_key(&id)
    }

    pub fn all(&self) -> Vec<AnimeRecord> {
        lock(&self.records).values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        lock(&self.records).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.records).is_empty()
    }

    /// Drop all records and the persisted snapshot.
    pub fn clear(&self) -> Result<()> {
        let mut records = lock(&self.records);
        records.clear();
        self.storage.clear_records()
    }
}

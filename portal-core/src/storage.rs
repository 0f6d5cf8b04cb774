//! Hybrid catalog storage.
//!
//! Merges two sequences into one addressable catalog:
//! - remote entries, replaced wholesale by every successful fetch and never
//!   persisted;
//! - user entries, appended one at a time and written to the durable store
//!   immediately.
//!
//! User ids come from a private counter starting at [`USER_ID_START`]. Only
//! [`CatalogStorage::add_user_entry`] advances it. The storage assumes a
//! single writer; sharing it across tasks requires an outer lock (the
//! command layer wraps it in a `tokio::sync::Mutex`).

use crate::error::{SourceError, StorageError};
use crate::persistence::{atomic_write_json, load_json};
use crate::source::CatalogSource;
use crate::types::{CatalogEntry, CatalogStats, USER_ID_START};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct CatalogStorage {
    remote: Vec<CatalogEntry>,
    user: Vec<CatalogEntry>,
    next_user_id: u64,
    source: Arc<dyn CatalogSource>,
    store_path: PathBuf,
}

impl CatalogStorage {
    /// Create storage and reload user entries from `store_path`.
    ///
    /// A missing, unreadable, or malformed store starts the user sequence
    /// empty instead of failing.
    pub fn open(source: Arc<dyn CatalogSource>, store_path: impl Into<PathBuf>) -> Self {
        let store_path = store_path.into();
        let mut user = match load_user_entries(&store_path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable user store");
                Vec::new()
            }
        };
        let next_user_id = match user.iter().map(|e| e.id).max() {
            None => USER_ID_START,
            Some(max) => match max.checked_add(1) {
                Some(next) => next,
                None => {
                    warn!(
                        path = %store_path.display(),
                        max_id = max,
                        "Ignoring user store with no ids left to allocate"
                    );
                    user.clear();
                    USER_ID_START
                }
            },
        };

        info!(
            path = %store_path.display(),
            user_entries = user.len(),
            next_user_id,
            "Catalog storage opened"
        );

        Self {
            remote: Vec::new(),
            user,
            next_user_id,
            source,
            store_path,
        }
    }

    /// Fetch one remote page and replace the remote sequence with it.
    ///
    /// On failure the current remote sequence is left untouched and the
    /// error is returned for the caller to report. Returns the number of
    /// entries now held remotely.
    pub async fn fetch_remote(&mut self, page: u32) -> Result<usize, SourceError> {
        let records = match self.source.fetch_page(page).await {
            Ok(records) => records,
            Err(e) => {
                warn!(source = %self.source.describe(), page, error = %e, "Remote fetch failed");
                return Err(e);
            }
        };

        let entries: Vec<CatalogEntry> =
            records.into_iter().map(CatalogEntry::from_remote).collect();

        // Reserved range collision would break id disjointness; surface it.
        for entry in entries.iter().filter(|e| e.id >= USER_ID_START) {
            warn!(
                id = entry.id,
                name = %entry.name,
                "Remote id falls inside the user-reserved range"
            );
        }

        info!(page, count = entries.len(), "Replaced remote entries");
        self.remote = entries;
        Ok(self.remote.len())
    }

    /// Remote entries followed by user entries.
    pub fn all(&self) -> Vec<&CatalogEntry> {
        self.remote.iter().chain(self.user.iter()).collect()
    }

    pub fn len(&self) -> usize {
        self.remote.len() + self.user.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get_by_id(&self, id: u64) -> Option<&CatalogEntry> {
        self.remote
            .iter()
            .chain(self.user.iter())
            .find(|entry| entry.id == id)
    }

    /// Case-insensitive substring match on names, in catalog order.
    pub fn search(&self, query: &str) -> Vec<&CatalogEntry> {
        self.remote
            .iter()
            .chain(self.user.iter())
            .filter(|entry| entry.name_matches(query))
            .collect()
    }

    /// Assign the next user id, append, and persist the whole user sequence.
    ///
    /// Once an id is assigned the in-memory append always happens. A write
    /// failure is returned as `Persist` and the entry stays in memory. When
    /// the id range is used up, `IdsExhausted` is returned and nothing changes.
    pub fn add_user_entry(&mut self, mut entry: CatalogEntry) -> Result<CatalogEntry, StorageError> {
        let Some(next) = self.next_user_id.checked_add(1) else {
            return Err(StorageError::IdsExhausted {
                last_id: self.next_user_id,
            });
        };
        entry.id = self.next_user_id;
        entry.created_by_user = true;
        self.next_user_id = next;
        self.user.push(entry.clone());
        debug!(id = entry.id, name = %entry.name, "Added user entry");

        self.persist()?;
        Ok(entry)
    }

    pub fn user_entries(&self) -> &[CatalogEntry] {
        &self.user
    }

    pub fn remote_entries(&self) -> &[CatalogEntry] {
        &self.remote
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats::collect(self.remote.iter().chain(self.user.iter()))
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// The id the next user entry will receive.
    pub fn next_user_id(&self) -> u64 {
        self.next_user_id
    }

    fn persist(&self) -> Result<(), StorageError> {
        atomic_write_json(&self.store_path, &self.user).map_err(|e| StorageError::Persist {
            path: self.store_path.clone(),
            message: e.to_string(),
        })?;
        info!(
            path = %self.store_path.display(),
            count = self.user.len(),
            "Persisted user entries"
        );
        Ok(())
    }
}

fn load_user_entries(path: &Path) -> Result<Vec<CatalogEntry>, StorageError> {
    let loaded: Option<Vec<CatalogEntry>> = load_json(path).map_err(|e| StorageError::Load {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(loaded
        .unwrap_or_default()
        .into_iter()
        .map(|mut entry| {
            entry.created_by_user = true;
            entry
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockCatalogSource;
    use crate::types::{Gender, RemoteRecord, Status};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn storage_with(source: MockCatalogSource, dir: &TempDir) -> CatalogStorage {
        CatalogStorage::open(Arc::new(source), dir.path().join("user_characters.json"))
    }

    fn two_records() -> Vec<RemoteRecord> {
        vec![
            RemoteRecord::new(1, "Rick Sanchez"),
            RemoteRecord::new(2, "Morty Smith"),
        ]
    }

    #[test]
    fn test_open_without_store_starts_empty() {
        let dir = TempDir::new().unwrap();
        let storage = storage_with(MockCatalogSource::new(), &dir);
        assert!(storage.is_empty());
        assert_eq!(storage.next_user_id(), USER_ID_START);
    }

    #[test]
    fn test_open_with_malformed_store_starts_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("user_characters.json"), "{ definitely not").unwrap();

        let storage = storage_with(MockCatalogSource::new(), &dir);
        assert!(storage.user_entries().is_empty());
        assert_eq!(storage.next_user_id(), USER_ID_START);
    }

    #[test]
    fn test_open_with_exhausted_ids_starts_empty() {
        let dir = TempDir::new().unwrap();
        let mut last = CatalogEntry::draft("X");
        last.id = u64::MAX;
        atomic_write_json(&dir.path().join("user_characters.json"), &vec![last]).unwrap();

        let storage = storage_with(MockCatalogSource::new(), &dir);
        assert!(storage.user_entries().is_empty());
        assert_eq!(storage.next_user_id(), USER_ID_START);
    }

    #[test]
    fn test_add_user_entry_refuses_when_ids_run_out() {
        let dir = TempDir::new().unwrap();
        let mut last = CatalogEntry::draft("X");
        last.id = u64::MAX - 1;
        atomic_write_json(&dir.path().join("user_characters.json"), &vec![last]).unwrap();

        let mut storage = storage_with(MockCatalogSource::new(), &dir);
        assert_eq!(storage.next_user_id(), u64::MAX);

        let result = storage.add_user_entry(CatalogEntry::draft("Summer"));
        assert!(matches!(
            result,
            Err(StorageError::IdsExhausted { last_id: u64::MAX })
        ));
        assert_eq!(storage.user_entries().len(), 1);
        assert_eq!(storage.next_user_id(), u64::MAX);
    }

    #[tokio::test]
    async fn test_fetch_replaces_remote_wholesale() {
        let dir = TempDir::new().unwrap();
        let source = MockCatalogSource::with_page(two_records());
        source.queue_page(vec![RemoteRecord::new(3, "Summer Smith")]);
        let mut storage = storage_with(source, &dir);

        assert_eq!(storage.fetch_remote(1).await.unwrap(), 2);
        assert_eq!(storage.fetch_remote(2).await.unwrap(), 1);
        let names: Vec<&str> = storage.all().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Summer Smith"]);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_previous_remote() {
        let dir = TempDir::new().unwrap();
        let source = MockCatalogSource::with_page(two_records());
        source.queue_failure(SourceError::Timeout { timeout_secs: 10 });
        let mut storage = storage_with(source, &dir);

        storage.fetch_remote(1).await.unwrap();
        let err = storage.fetch_remote(2).await.unwrap_err();
        assert_eq!(err, SourceError::Timeout { timeout_secs: 10 });

        let ids: Vec<u64> = storage.all().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_all_orders_remote_before_user() {
        let dir = TempDir::new().unwrap();
        let mut storage = storage_with(MockCatalogSource::with_page(two_records()), &dir);
        storage
            .add_user_entry(CatalogEntry::draft("Summer"))
            .unwrap();
        storage.fetch_remote(1).await.unwrap();

        let ids: Vec<u64> = storage.all().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, USER_ID_START]);
        assert_eq!(
            storage.len(),
            storage.remote_entries().len() + storage.user_entries().len()
        );
    }

    #[test]
    fn test_add_user_entry_assigns_sequential_ids() {
        let dir = TempDir::new().unwrap();
        let mut storage = storage_with(MockCatalogSource::new(), &dir);

        let mut draft = CatalogEntry::draft("Summer");
        draft.id = 42;
        draft.created_by_user = false;
        let summer = storage.add_user_entry(draft).unwrap();
        let beth = storage.add_user_entry(CatalogEntry::draft("Beth")).unwrap();

        assert_eq!(summer.id, 10_000);
        assert!(summer.created_by_user);
        assert_eq!(beth.id, 10_001);
        assert_eq!(storage.next_user_id(), 10_002);
    }

    #[test]
    fn test_add_user_entry_persists_whole_sequence() {
        let dir = TempDir::new().unwrap();
        let mut storage = storage_with(MockCatalogSource::new(), &dir);
        storage.add_user_entry(CatalogEntry::draft("Summer")).unwrap();
        storage.add_user_entry(CatalogEntry::draft("Beth")).unwrap();

        let on_disk: Vec<CatalogEntry> = load_json(storage.store_path()).unwrap().unwrap();
        assert_eq!(on_disk.len(), 2);
        assert_eq!(on_disk, storage.user_entries());
    }

    #[test]
    fn test_reload_restores_entries_and_counter() {
        let dir = TempDir::new().unwrap();
        let mut original = storage_with(MockCatalogSource::new(), &dir);
        let mut draft = CatalogEntry::draft("Beth");
        draft.status = Status::Dead;
        draft.gender = Gender::Female;
        draft.species = "Clone".into();
        original.add_user_entry(CatalogEntry::draft("Summer")).unwrap();
        original.add_user_entry(draft).unwrap();

        let reloaded = storage_with(MockCatalogSource::new(), &dir);
        assert_eq!(reloaded.user_entries(), original.user_entries());
        assert_eq!(reloaded.next_user_id(), 10_002);
    }

    #[test]
    fn test_persist_failure_still_appends() {
        let dir = TempDir::new().unwrap();
        // A directory at the store path makes the rename fail.
        let store = dir.path().join("store.json");
        std::fs::create_dir_all(&store).unwrap();
        std::fs::write(store.join("keep"), "x").unwrap();
        let mut storage = CatalogStorage::open(Arc::new(MockCatalogSource::new()), &store);

        let result = storage.add_user_entry(CatalogEntry::draft("Summer"));
        assert!(matches!(result, Err(StorageError::Persist { .. })));
        assert_eq!(storage.user_entries().len(), 1);
        assert_eq!(storage.next_user_id(), 10_001);
    }

    #[tokio::test]
    async fn test_get_by_id_and_search() {
        let dir = TempDir::new().unwrap();
        let mut storage = storage_with(MockCatalogSource::with_page(two_records()), &dir);
        storage.fetch_remote(1).await.unwrap();
        storage.add_user_entry(CatalogEntry::draft("Beth")).unwrap();

        assert_eq!(storage.get_by_id(2).unwrap().name, "Morty Smith");
        assert_eq!(storage.get_by_id(10_000).unwrap().name, "Beth");
        assert!(storage.get_by_id(99).is_none());

        assert_eq!(storage.search("rick").len(), 1);
        assert!(storage.search("ricky").is_empty());
        assert_eq!(storage.search("MORTY")[0].id, 2);
        assert_eq!(storage.search("").len(), 3);
    }

    #[tokio::test]
    async fn test_stats_counts_by_status_and_origin() {
        let dir = TempDir::new().unwrap();
        let mut records = two_records();
        records[0].status = Some("Alive".into());
        records[1].status = Some("Dead".into());
        let mut storage = storage_with(MockCatalogSource::with_page(records), &dir);
        storage.fetch_remote(1).await.unwrap();
        let mut draft = CatalogEntry::draft("Mystery");
        draft.status = Status::Unknown;
        storage.add_user_entry(draft).unwrap();

        let stats = storage.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.alive, 1);
        assert_eq!(stats.dead, 1);
        assert_eq!(stats.unknown, 1);
        assert_eq!(stats.user_created, 1);
    }
}

//! The persisted store of favorites and configuration.
//!
//! The [`SelectionStore`] is the single source of truth for which launches are
//! favorites and which theme is in use. Every intent is applied to the
//! in-memory snapshot first and then written through to a
//! [`SnapshotStorage`]. Storage failures never reach the caller: the
//! in-memory state stays authoritative and the write is retried with the
//! next mutation, on [`SelectionStore::flush`], or when the store is dropped.

use std::cmp::Ordering;

use crate::{
    domain::{Favorite, LaunchId, LaunchRecord, Theme},
    storage::{
        backend::SnapshotStorage,
        snapshot::{Configuration, Snapshot},
    },
};

/// Favorites and configuration, persisted after every change.
///
/// Mutations take `&mut self`, so only one can be in flight at a time. To
/// share a store between threads, wrap it in a `Mutex`.
#[derive(Debug)]
pub struct SelectionStore<S: SnapshotStorage> {
    storage: S,
    snapshot: Snapshot,
    /// Count of completed in-memory mutations.
    revision: u64,
    /// The revision the storage is known to hold.
    persisted: u64,
    /// The storage could not be read on open, so the stored copy is unknown.
    reload_pending: bool,
}

impl<S: SnapshotStorage> SelectionStore<S> {
    /// Opens the store over `storage`.
    ///
    /// A missing, unreadable or corrupt snapshot opens as an empty store. If
    /// the snapshot has never been initialized, the theme is seeded from
    /// `host_scheme`, which is not consulted otherwise.
    ///
    /// When the storage cannot be read at all, nothing is written until the
    /// first change. That change is applied on top of the stored snapshot if
    /// the storage can be read by then.
    #[must_use]
    pub fn open(storage: S, host_scheme: impl FnOnce() -> Theme) -> Self {
        let (snapshot, readable) = match storage.load() {
            Ok(Some(blob)) => match Snapshot::decode(&blob) {
                Ok(snapshot) => (snapshot, true),
                Err(e) => {
                    tracing::warn!("Discarding unreadable selection snapshot: {e}");
                    (Snapshot::default(), true)
                }
            },
            Ok(None) => {
                tracing::debug!("No selection snapshot found, starting empty");
                (Snapshot::default(), true)
            }
            Err(e) => {
                tracing::warn!("Failed to load selection snapshot: {e}");
                (Snapshot::default(), false)
            }
        };

        let mut store = Self {
            storage,
            snapshot,
            revision: 0,
            persisted: 0,
            reload_pending: !readable,
        };

        if store.snapshot.initialized {
            tracing::debug!(
                favorites = store.snapshot.favorites.len(),
                theme = %store.snapshot.configuration.theme,
                "Loaded selection snapshot"
            );
            return store;
        }

        let theme = host_scheme();
        tracing::debug!("First run, seeding theme '{theme}' from host");
        let seed = |snapshot: &mut Snapshot| {
            snapshot.configuration = Configuration { theme };
            snapshot.initialized = true;
        };
        if readable {
            store.mutate(seed);
        } else {
            // The stored copy may still be intact; it is read again before
            // the first change is written.
            seed(&mut store.snapshot);
        }

        store
    }

    /// Whether `id` is a favorite.
    #[must_use]
    pub fn is_favorite(&self, id: &LaunchId) -> bool {
        self.snapshot.favorites.contains_key(id)
    }

    /// The stored favorite for `id`, if any.
    #[must_use]
    pub fn favorite(&self, id: &LaunchId) -> Option<&Favorite> {
        self.snapshot.favorites.get(id)
    }

    /// All favorites, soonest launch first.
    ///
    /// Favorites whose instant cannot be parsed come last. Ties are broken by
    /// name.
    #[must_use]
    pub fn favorites(&self) -> Vec<&Favorite> {
        let mut favorites: Vec<_> = self.snapshot.favorites.values().collect();
        favorites.sort_by(|a, b| by_launch_time(a, b));
        favorites
    }

    /// The number of favorites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot.favorites.len()
    }

    /// Whether there are no favorites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot.favorites.is_empty()
    }

    /// Marks `record` as a favorite. Does nothing if it already is one.
    pub fn add_favorite(&mut self, record: &LaunchRecord) {
        self.reload_if_pending();
        if self.is_favorite(&record.id) {
            tracing::debug!("{} is already a favorite", record.id);
            return;
        }
        self.mutate(|snapshot| {
            snapshot
                .favorites
                .insert(record.id.clone(), Favorite::from(record));
        });
    }

    /// Removes `id` from the favorites. Does nothing if it is not one.
    pub fn remove_favorite(&mut self, id: &LaunchId) {
        self.reload_if_pending();
        if !self.is_favorite(id) {
            tracing::debug!("{id} is not a favorite");
            return;
        }
        self.mutate(|snapshot| {
            snapshot.favorites.remove(id);
        });
    }

    /// Adds `record` if it is not a favorite, removes it if it is.
    ///
    /// Returns whether the launch is a favorite afterwards.
    pub fn toggle_favorite(&mut self, record: &LaunchRecord) -> bool {
        self.reload_if_pending();
        if self.is_favorite(&record.id) {
            self.remove_favorite(&record.id);
            false
        } else {
            self.add_favorite(record);
            true
        }
    }

    /// The theme in use.
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.snapshot.configuration.theme
    }

    /// Switches to `theme`.
    pub fn set_theme(&mut self, theme: Theme) {
        self.mutate(|snapshot| snapshot.configuration.theme = theme);
    }

    /// Whether the storage holds the latest in-memory state.
    #[must_use]
    pub const fn is_synced(&self) -> bool {
        self.persisted == self.revision
    }

    /// Writes the in-memory state if the storage is behind.
    ///
    /// Returns whether the storage is in sync afterwards.
    pub fn flush(&mut self) -> bool {
        if !self.is_synced() {
            self.persist();
        }
        self.is_synced()
    }

    fn mutate(&mut self, change: impl FnOnce(&mut Snapshot)) {
        self.reload_if_pending();
        change(&mut self.snapshot);
        self.revision += 1;
        self.persist();
    }

    /// Reads the stored snapshot again after a failed open.
    ///
    /// A readable snapshot replaces the in-memory one, keeping the seeded
    /// theme only if the stored copy was never initialized. If the storage
    /// still cannot be read, the in-memory state is kept and will be written.
    fn reload_if_pending(&mut self) {
        if !self.reload_pending {
            return;
        }
        self.reload_pending = false;
        let blob = match self.storage.load() {
            Ok(Some(blob)) => blob,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!("Selection snapshot still unreadable, overwriting: {e}");
                return;
            }
        };
        match Snapshot::decode(&blob) {
            Ok(mut stored) => {
                if !stored.initialized {
                    stored.configuration = self.snapshot.configuration;
                    stored.initialized = true;
                }
                tracing::debug!(
                    favorites = stored.favorites.len(),
                    "Recovered selection snapshot"
                );
                self.snapshot = stored;
            }
            Err(e) => tracing::warn!("Discarding unreadable selection snapshot: {e}"),
        }
    }

    /// Writes the snapshot as it stands now.
    ///
    /// The blob is always encoded from the current state, so a retry can never
    /// store an older snapshot over a newer one.
    fn persist(&mut self) {
        let revision = self.revision;
        let result = self
            .snapshot
            .encode()
            .map_err(Into::into)
            .and_then(|blob| self.storage.save(&blob));
        match result {
            Ok(()) => {
                self.persisted = revision;
                tracing::trace!(revision, "Persisted selection snapshot");
            }
            Err(e) => {
                tracing::warn!(revision, "Failed to persist selection snapshot, will retry: {e}");
            }
        }
    }
}

impl<S: SnapshotStorage> Drop for SelectionStore<S> {
    fn drop(&mut self) {
        if !self.is_synced() {
            tracing::debug!("Flushing selection snapshot on shutdown");
            self.persist();
        }
    }
}

fn by_launch_time(a: &Favorite, b: &Favorite) -> Ordering {
    match (a.instant(), b.instant()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.name.cmp(&b.name))
    .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::{
        domain::LaunchStatus,
        storage::backend::{MemoryStorage, StorageError},
    };

    fn launch(id: &str, net: &str) -> LaunchRecord {
        LaunchRecord {
            id: LaunchId::try_from(id).unwrap(),
            name: format!("Launch {id}"),
            net: net.to_string(),
            status: LaunchStatus {
                name: "Go for Launch".to_string(),
                description: String::new(),
            },
            image: Some(format!("https://example.com/{id}.png")),
            pad: None,
            launch_service_provider: None,
        }
    }

    fn id(s: &str) -> LaunchId {
        LaunchId::try_from(s).unwrap()
    }

    /// Storage that can be switched off, counting saves.
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        down: Cell<bool>,
        saves: Cell<usize>,
    }

    impl SnapshotStorage for FlakyStorage {
        fn load(&self) -> Result<Option<Vec<u8>>, StorageError> {
            if self.down.get() {
                return Err(StorageError::Unavailable("offline".to_string()));
            }
            self.inner.load()
        }

        fn save(&self, blob: &[u8]) -> Result<(), StorageError> {
            if self.down.get() {
                return Err(StorageError::Unavailable("offline".to_string()));
            }
            self.saves.set(self.saves.get() + 1);
            self.inner.save(blob)
        }
    }

    #[test]
    fn toggle_twice_from_empty() {
        let mut store = SelectionStore::open(MemoryStorage::new(), || Theme::Light);
        let l1 = launch("L1", "2025-01-01T00:00:00Z");

        assert!(store.toggle_favorite(&l1));
        assert!(store.is_favorite(&id("L1")));

        assert!(!store.toggle_favorite(&l1));
        assert!(!store.is_favorite(&id("L1")));
    }

    #[test]
    fn add_is_idempotent() {
        let storage = MemoryStorage::new();
        let mut store = SelectionStore::open(storage.clone(), || Theme::Light);
        let l1 = launch("L1", "2025-01-01T00:00:00Z");

        store.add_favorite(&l1);
        let once = storage.blob();
        store.add_favorite(&l1);

        assert_eq!(store.len(), 1);
        assert_eq!(storage.blob(), once);
    }

    #[test]
    fn remove_restores_membership() {
        let mut store = SelectionStore::open(MemoryStorage::new(), || Theme::Light);
        let l1 = launch("L1", "2025-01-01T00:00:00Z");

        assert!(!store.is_favorite(&id("L1")));
        store.add_favorite(&l1);
        store.remove_favorite(&id("L1"));
        assert!(!store.is_favorite(&id("L1")));
        assert!(store.is_empty());

        // Removing again is a no-op.
        store.remove_favorite(&id("L1"));
        assert!(store.is_empty());
    }

    #[test]
    fn favorite_keeps_display_payload() {
        let mut store = SelectionStore::open(MemoryStorage::new(), || Theme::Light);
        store.add_favorite(&launch("L1", "2025-01-01T00:00:00Z"));

        let favorite = store.favorite(&id("L1")).unwrap();
        assert_eq!(favorite.name, "Launch L1");
        assert_eq!(favorite.status.name, "Go for Launch");
        assert_eq!(
            favorite.image.as_deref(),
            Some("https://example.com/L1.png")
        );
    }

    #[test]
    fn favorites_are_listed_soonest_first() {
        let mut store = SelectionStore::open(MemoryStorage::new(), || Theme::Light);
        store.add_favorite(&launch("late", "2025-03-01T00:00:00Z"));
        store.add_favorite(&launch("unknown", "TBD"));
        store.add_favorite(&launch("early", "2025-01-01T00:00:00Z"));

        let order: Vec<_> = store.favorites().iter().map(|f| f.id.as_str()).collect();
        assert_eq!(order, ["early", "late", "unknown"]);
    }

    #[test]
    fn first_run_seeds_theme_from_host() {
        let storage = MemoryStorage::new();
        let store = SelectionStore::open(storage.clone(), || Theme::Dark);
        assert_eq!(store.theme(), Theme::Dark);
        assert!(store.is_synced());
        drop(store);

        // The host is not asked again once initialized.
        let store = SelectionStore::open(storage, || panic!("host scheme consulted twice"));
        assert_eq!(store.theme(), Theme::Dark);
    }

    #[test]
    fn explicit_theme_survives_host_changes() {
        let storage = MemoryStorage::new();
        let mut store = SelectionStore::open(storage.clone(), || Theme::Dark);
        store.set_theme(Theme::Light);
        drop(store);

        let store = SelectionStore::open(storage, || Theme::Dark);
        assert_eq!(store.theme(), Theme::Light);
    }

    #[test]
    fn corrupt_snapshot_opens_empty() {
        let storage = MemoryStorage::with_blob(b"{ not json".to_vec());
        let store = SelectionStore::open(storage.clone(), || Theme::Dark);

        assert!(store.is_empty());
        assert_eq!(store.theme(), Theme::Dark);

        // The corrupt blob has been replaced by a readable one.
        assert!(Snapshot::decode(&storage.blob().unwrap()).is_ok());
    }

    #[test]
    fn failed_saves_keep_memory_state_and_retry() {
        let storage = FlakyStorage::default();
        let mut store = SelectionStore::open(&storage, || Theme::Light);
        assert!(store.is_synced());

        storage.down.set(true);
        store.add_favorite(&launch("L1", "2025-01-01T00:00:00Z"));
        assert!(store.is_favorite(&id("L1")));
        assert!(!store.is_synced());
        assert!(!store.flush());

        storage.down.set(false);
        store.add_favorite(&launch("L2", "2025-01-02T00:00:00Z"));
        assert!(store.is_synced());

        let reopened = SelectionStore::open(&storage.inner, || Theme::Light);
        assert!(reopened.is_favorite(&id("L1")));
        assert!(reopened.is_favorite(&id("L2")));
    }

    #[test]
    fn flush_retries_pending_write() {
        let storage = FlakyStorage::default();
        let mut store = SelectionStore::open(&storage, || Theme::Light);

        storage.down.set(true);
        store.set_theme(Theme::Dark);
        storage.down.set(false);

        assert!(store.flush());
        assert_eq!(
            SelectionStore::open(&storage.inner, || Theme::Light).theme(),
            Theme::Dark
        );
    }

    #[test]
    fn unavailable_storage_on_load_opens_empty() {
        let storage = FlakyStorage::default();
        storage.inner.save(br#"{"_version": "1", "initialized": true}"#).unwrap();
        storage.down.set(true);

        let store = SelectionStore::open(&storage, || Theme::Dark);
        assert!(store.is_empty());
        assert_eq!(store.theme(), Theme::Dark);

        // Nothing is written over the stored copy just for opening.
        storage.down.set(false);
        drop(store);
        assert_eq!(storage.saves.get(), 0);
    }

    #[test]
    fn change_after_failed_open_keeps_stored_selection() {
        let storage = FlakyStorage::default();
        {
            let mut store = SelectionStore::open(&storage.inner, || Theme::Light);
            store.add_favorite(&launch("A", "2025-01-01T00:00:00Z"));
            store.add_favorite(&launch("B", "2025-01-02T00:00:00Z"));
            store.set_theme(Theme::Dark);
        }

        storage.down.set(true);
        let mut store = SelectionStore::open(&storage, || Theme::Light);
        assert!(store.is_empty());
        storage.down.set(false);

        store.add_favorite(&launch("C", "2025-01-03T00:00:00Z"));
        assert!(store.is_synced());
        assert_eq!(store.len(), 3);
        assert_eq!(store.theme(), Theme::Dark);
        drop(store);

        let reopened = SelectionStore::open(&storage.inner, || Theme::Light);
        assert!(reopened.is_favorite(&id("A")));
        assert!(reopened.is_favorite(&id("B")));
        assert!(reopened.is_favorite(&id("C")));
        assert_eq!(reopened.theme(), Theme::Dark);
    }

    #[test]
    fn removal_after_failed_open_sees_stored_favorites() {
        let storage = FlakyStorage::default();
        {
            let mut store = SelectionStore::open(&storage.inner, || Theme::Light);
            store.add_favorite(&launch("A", "2025-01-01T00:00:00Z"));
            store.add_favorite(&launch("B", "2025-01-02T00:00:00Z"));
        }

        storage.down.set(true);
        let mut store = SelectionStore::open(&storage, || Theme::Dark);
        storage.down.set(false);

        assert!(!store.toggle_favorite(&launch("A", "2025-01-01T00:00:00Z")));
        drop(store);

        let reopened = SelectionStore::open(&storage.inner, || Theme::Dark);
        assert!(!reopened.is_favorite(&id("A")));
        assert!(reopened.is_favorite(&id("B")));
        assert_eq!(reopened.theme(), Theme::Light);
    }

    #[test]
    fn change_is_written_when_storage_stays_unreadable() {
        let storage = FlakyStorage::default();
        storage.down.set(true);
        let mut store = SelectionStore::open(&storage, || Theme::Dark);

        store.add_favorite(&launch("L1", "2025-01-01T00:00:00Z"));
        assert!(!store.is_synced());

        storage.down.set(false);
        assert!(store.flush());
        drop(store);

        let reopened = SelectionStore::open(&storage.inner, || Theme::Light);
        assert!(reopened.is_favorite(&id("L1")));
        assert_eq!(reopened.theme(), Theme::Dark);
    }

    #[test]
    fn drop_flushes_unsynced_state() {
        let storage = FlakyStorage::default();
        {
            let mut store = SelectionStore::open(&storage, || Theme::Light);
            storage.down.set(true);
            store.add_favorite(&launch("L1", "2025-01-01T00:00:00Z"));
            storage.down.set(false);
        }
        let reopened = SelectionStore::open(&storage.inner, || Theme::Light);
        assert!(reopened.is_favorite(&id("L1")));
    }

    #[test]
    fn each_mutation_is_one_write() {
        let storage = FlakyStorage::default();
        let mut store = SelectionStore::open(&storage, || Theme::Light);
        let seeded = storage.saves.get();

        store.toggle_favorite(&launch("L1", "2025-01-01T00:00:00Z"));
        store.toggle_favorite(&launch("L1", "2025-01-01T00:00:00Z"));
        store.set_theme(Theme::Dark);

        assert_eq!(storage.saves.get(), seeded + 3);
    }
}

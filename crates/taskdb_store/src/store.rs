//! Store facade and configuration.

use crate::collection::Collection;
use crate::document::{Document, DocumentId};
use crate::error::StoreResult;
use crate::snapshot::{SnapshotFile, SnapshotImage};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

/// Configuration for opening a store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Whether to create the snapshot file if it doesn't exist.
    pub create_if_missing: bool,

    /// Whether to rewrite the snapshot after every mutating call.
    ///
    /// When disabled, durability requires explicit [`Store::flush`] calls.
    pub flush_on_write: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            flush_on_write: true,
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create the snapshot if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets whether to rewrite the snapshot after every mutating call.
    #[must_use]
    pub const fn flush_on_write(mut self, value: bool) -> Self {
        self.flush_on_write = value;
        self
    }
}

/// Shared per-collection document map: id to CBOR payload.
pub(crate) type CollectionData = Arc<RwLock<BTreeMap<DocumentId, Vec<u8>>>>;

/// Shared store state behind the [`Store`] handle.
pub(crate) struct StoreInner {
    /// Collections by name, created on demand.
    collections: RwLock<HashMap<String, CollectionData>>,
    /// Snapshot file, when the store is persistent.
    snapshot: Option<Mutex<SnapshotFile>>,
    /// Whether mutating calls rewrite the snapshot.
    flush_on_write: bool,
}

impl StoreInner {
    /// Returns the data map for a collection, creating it if absent.
    pub(crate) fn data(&self, name: &str) -> CollectionData {
        if let Some(data) = self.collections.read().get(name) {
            return Arc::clone(data);
        }
        let mut collections = self.collections.write();
        Arc::clone(
            collections
                .entry(name.to_string())
                .or_insert_with(CollectionData::default),
        )
    }

    /// Rewrites the snapshot from the current in-memory state.
    ///
    /// A no-op for in-memory stores.
    pub(crate) fn flush(&self) -> StoreResult<()> {
        let Some(snapshot) = &self.snapshot else {
            return Ok(());
        };

        let mut image = SnapshotImage::default();
        {
            let collections = self.collections.read();
            for (name, data) in collections.iter() {
                let docs = data.read();
                image.collections.insert(
                    name.clone(),
                    docs.iter().map(|(id, bytes)| (*id, bytes.clone())).collect(),
                );
            }
        }

        snapshot.lock().write(&image)
    }

    /// Flushes after a mutating call when the policy asks for it.
    pub(crate) fn flush_after_write(&self) -> StoreResult<()> {
        if self.snapshot.is_some() && self.flush_on_write {
            self.flush()
        } else {
            Ok(())
        }
    }
}

/// A document store holding named collections.
///
/// The store hands out typed [`Collection`] handles. Every collection
/// call is atomic on its own; the store offers no way to group calls
/// into a transaction. Cloning the store is cheap and shares state.
///
/// # Example
///
/// ```rust,ignore
/// let store = Store::open("tasks.tdb")?;
/// let tasks = store.collection::<Task>();
/// let users = store.collection::<User>();
/// ```
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    /// Creates an ephemeral in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                collections: RwLock::new(HashMap::new()),
                snapshot: None,
                flush_on_write: false,
            }),
        }
    }

    /// Opens a persistent store at `path` with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read, is corrupted,
    /// or is locked by another process.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open_with_config(path, StoreConfig::default())
    }

    /// Opens a persistent store at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read, is corrupted,
    /// or is locked by another process.
    pub fn open_with_config(path: impl AsRef<Path>, config: StoreConfig) -> StoreResult<Self> {
        let (snapshot, image) = SnapshotFile::open(path.as_ref(), config.create_if_missing)?;

        let mut collections = HashMap::new();
        for (name, entries) in image.collections {
            let map: BTreeMap<DocumentId, Vec<u8>> = entries.into_iter().collect();
            collections.insert(name, Arc::new(RwLock::new(map)));
        }

        Ok(Self {
            inner: Arc::new(StoreInner {
                collections: RwLock::new(collections),
                snapshot: Some(Mutex::new(snapshot)),
                flush_on_write: config.flush_on_write,
            }),
        })
    }

    /// Returns a typed handle to the collection for `T`.
    #[must_use]
    pub fn collection<T: Document>(&self) -> Collection<T> {
        Collection::new(self.inner.data(T::COLLECTION), Arc::clone(&self.inner))
    }

    /// Rewrites the snapshot from the current in-memory state.
    ///
    /// A no-op for in-memory stores.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub fn flush(&self) -> StoreResult<()> {
        self.inner.flush()
    }

    /// Returns true if the store is backed by a snapshot file.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.inner.snapshot.is_some()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("persistent", &self.is_persistent())
            .field("collections", &self.inner.collections.read().len())
            .finish_non_exhaustive()
    }
}

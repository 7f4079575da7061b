//! Engine fixtures with automatic cleanup.

use std::path::PathBuf;
use taskdb_core::SyncEngine;
use taskdb_store::Store;
use tempfile::TempDir;

/// A sync engine over a test store, with automatic cleanup.
pub struct TestEngine {
    /// The engine under test.
    pub engine: SyncEngine,
    /// The backing store.
    pub store: Store,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: Option<TempDir>,
}

impl TestEngine {
    /// Creates an engine over an in-memory store.
    #[must_use]
    pub fn memory() -> Self {
        let store = Store::in_memory();
        Self {
            engine: SyncEngine::new(&store),
            store,
            _temp_dir: None,
        }
    }

    /// Creates an engine over a snapshot-backed store in a temp dir.
    #[must_use]
    pub fn file() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp directory");
        let store =
            Store::open(temp_dir.path().join("data.tdb")).expect("failed to open test store");
        Self {
            engine: SyncEngine::new(&store),
            store,
            _temp_dir: Some(temp_dir),
        }
    }

    /// Returns the snapshot path if file-backed, `None` if in-memory.
    #[must_use]
    pub fn path(&self) -> Option<PathBuf> {
        self._temp_dir.as_ref().map(|d| d.path().join("data.tdb"))
    }
}

impl std::ops::Deref for TestEngine {
    type Target = SyncEngine;

    fn deref(&self) -> &Self::Target {
        &self.engine
    }
}

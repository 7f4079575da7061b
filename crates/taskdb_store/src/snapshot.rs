//! Snapshot persistence for the store.
//!
//! A snapshot is a single file holding every collection's documents:
//! an 8-byte magic, a format version pair, then a CBOR body. Writes go
//! to a temporary sibling file and replace the snapshot atomically via
//! rename. A sidecar `.lock` file carries an exclusive advisory lock for
//! the lifetime of the store.

use crate::codec;
use crate::document::DocumentId;
use crate::error::{StoreError, StoreResult};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Magic bytes identifying a snapshot file.
const MAGIC: &[u8; 8] = b"TDBSNAP\0";

/// Format version written to new snapshots.
///
/// The major version must match exactly on load; the minor version may
/// differ.
const FORMAT_VERSION: (u16, u16) = (1, 0);

/// Header length: magic + major + minor.
const HEADER_LEN: usize = 8 + 2 + 2;

/// In-memory image of every collection, as stored in a snapshot body.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct SnapshotImage {
    /// Collection name to (document id, CBOR payload) pairs.
    pub collections: BTreeMap<String, Vec<(DocumentId, Vec<u8>)>>,
}

/// Handle to a snapshot file and its advisory lock.
#[derive(Debug)]
pub(crate) struct SnapshotFile {
    path: PathBuf,
    /// Held open for the advisory lock; released when the store drops.
    _lock: File,
}

impl SnapshotFile {
    /// Opens a snapshot, acquiring the exclusive lock and loading any
    /// existing image.
    pub(crate) fn open(
        path: &Path,
        create_if_missing: bool,
    ) -> StoreResult<(Self, SnapshotImage)> {
        if create_if_missing {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
        }

        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(sibling(path, ".lock"))?;
        lock.try_lock_exclusive().map_err(|e| {
            if e.kind() == io::ErrorKind::WouldBlock {
                StoreError::Locked
            } else {
                StoreError::Io(e)
            }
        })?;

        let image = if path.exists() {
            Self::load(path)?
        } else if create_if_missing {
            SnapshotImage::default()
        } else {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("snapshot not found: {}", path.display()),
            )));
        };

        Ok((
            Self {
                path: path.to_path_buf(),
                _lock: lock,
            },
            image,
        ))
    }

    /// Reads and verifies a snapshot file.
    fn load(path: &Path) -> StoreResult<SnapshotImage> {
        let bytes = fs::read(path)?;
        if bytes.len() < HEADER_LEN {
            return Err(StoreError::corrupt("truncated header"));
        }
        if &bytes[..8] != MAGIC {
            return Err(StoreError::corrupt("bad magic"));
        }
        let major = u16::from_le_bytes([bytes[8], bytes[9]]);
        if major != FORMAT_VERSION.0 {
            return Err(StoreError::corrupt(format!(
                "unsupported format version {major}"
            )));
        }
        codec::decode(&bytes[HEADER_LEN..])
            .map_err(|e| StoreError::corrupt(format!("invalid body: {e}")))
    }

    /// Writes the image, atomically replacing the snapshot file.
    pub(crate) fn write(&mut self, image: &SnapshotImage) -> StoreResult<()> {
        let body = codec::encode(image)?;
        let tmp_path = sibling(&self.path, ".tmp");

        let mut tmp = File::create(&tmp_path)?;
        tmp.write_all(MAGIC)?;
        tmp.write_all(&FORMAT_VERSION.0.to_le_bytes())?;
        tmp.write_all(&FORMAT_VERSION.1.to_le_bytes())?;
        tmp.write_all(&body)?;
        tmp.sync_all()?;
        drop(tmp);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

/// Returns `path` with `suffix` appended to its file name.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("snapshot"));
    name.push(suffix);
    path.with_file_name(name)
}

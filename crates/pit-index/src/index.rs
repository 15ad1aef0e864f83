//! The [`StagingIndex`] and its on-disk encoding.
//!
//! The index is an ordered `Vec<IndexEntry>`: insertion order is preserved so
//! that the `files` list of the next commit is deterministic. It holds at
//! most one entry per path. On disk it is a versioned JSON document:
//!
//! ```json
//! {"version":1,"entries":[{"path":"a.txt","hash":"3f1c..."}]}
//! ```
//!
//! Reading files from the working tree is the caller's job; the index only
//! sees paths and bytes.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use pit_store::{address_of, write_atomic, ObjectStore};
use pit_types::ObjectId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entry::{normalize_path, IndexEntry};
use crate::error::{IndexError, IndexResult};

/// Current on-disk index format version.
pub const INDEX_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct IndexDocument {
    version: u32,
    entries: Vec<IndexEntry>,
}

/// The staging index: the files staged for the next commit.
///
/// Staging writes the file's blob to `store` before recording the entry, so
/// every staged address names a stored object.
pub struct StagingIndex {
    entries: Vec<IndexEntry>,
    store: Arc<dyn ObjectStore>,
}

impl std::fmt::Debug for StagingIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagingIndex")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl StagingIndex {
    /// Create a new empty index backed by the given store.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            entries: Vec::new(),
            store,
        }
    }

    /// Load the index file at `path`. A missing file is an empty index.
    pub fn load(path: &Path, store: Arc<dyn ObjectStore>) -> IndexResult<Self> {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::new(store)),
            Err(e) => return Err(e.into()),
        };
        let mut index = Self::new(store);
        index.entries = decode(&data)?;
        debug!(path = %path.display(), entries = index.entries.len(), "index loaded");
        Ok(index)
    }

    /// Atomically write the index to `path`.
    pub fn persist(&self, path: &Path) -> IndexResult<()> {
        let data = encode(&self.entries)?;
        write_atomic(path, &data)?;
        debug!(path = %path.display(), entries = self.entries.len(), "index persisted");
        Ok(())
    }

    /// Number of entries in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn list(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Get an entry by (normalized) path.
    pub fn get(&self, path: &str) -> Option<&IndexEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// Returns `true` if exactly this `(path, object)` pair is staged.
    pub fn contains(&self, path: &str, object_id: &ObjectId) -> bool {
        self.get(path).is_some_and(|e| e.object_id == *object_id)
    }

    // ---------------------------------------------------------------
    // Stage operations
    // ---------------------------------------------------------------

    /// Stage file content under `path`.
    ///
    /// The blob is written to the object store and the entry recorded.
    /// Returns the blob's object ID.
    pub fn stage_file(&mut self, path: &str, content: &[u8]) -> IndexResult<ObjectId> {
        let path = normalize_path(path)?;
        let object_id = address_of(content);
        self.reject_duplicate(&path, &object_id)?;
        self.store.put(content)?;
        self.insert(IndexEntry::new(path, object_id));
        Ok(object_id)
    }

    /// Empty the index. Called when a commit seals the staged entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn reject_duplicate(&self, path: &str, object_id: &ObjectId) -> IndexResult<()> {
        if self.contains(path, object_id) {
            return Err(IndexError::AlreadyStaged {
                path: path.to_string(),
                object_id: *object_id,
            });
        }
        Ok(())
    }

    fn insert(&mut self, entry: IndexEntry) {
        insert_entry(&mut self.entries, entry);
    }
}

/// Insert `entry`, replacing an existing entry for the same path in place.
fn insert_entry(entries: &mut Vec<IndexEntry>, entry: IndexEntry) {
    match entries.iter_mut().find(|e| e.path == entry.path) {
        Some(existing) => *existing = entry,
        None => entries.push(entry),
    }
}

fn encode(entries: &[IndexEntry]) -> IndexResult<Vec<u8>> {
    let doc = IndexDocument {
        version: INDEX_VERSION,
        entries: entries.to_vec(),
    };
    serde_json::to_vec_pretty(&doc).map_err(|e| IndexError::Serialization(e.to_string()))
}

fn decode(data: &[u8]) -> IndexResult<Vec<IndexEntry>> {
    let doc: IndexDocument =
        serde_json::from_slice(data).map_err(|e| IndexError::Serialization(e.to_string()))?;
    if doc.version != INDEX_VERSION {
        return Err(IndexError::UnsupportedVersion(doc.version));
    }
    // Fold through insert so a hand-edited file with repeated paths still
    // yields one entry per path.
    let mut entries = Vec::with_capacity(doc.entries.len());
    for entry in doc.entries {
        insert_entry(&mut entries, entry);
    }
    Ok(entries)
}

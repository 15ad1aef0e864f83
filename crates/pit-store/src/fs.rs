//! Filesystem-backed object store.
//!
//! Layout: one file per object, named by the lowercase hex address, directly
//! under the objects directory:
//!
//! ```text
//! objects/
//!   3f1c...e2   (raw bytes of a file snapshot)
//!   91aa...07   (serialized commit)
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use pit_crypto::ContentHasher;
use pit_types::ObjectId;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::traits::{address_of, ObjectStore};

/// Write `data` to `target` atomically: temp file in the same directory,
/// fsync, then rename over the target.
///
/// Readers observe either the old contents or the new ones, never a torn
/// write.
pub fn write_atomic(target: &Path, data: &[u8]) -> io::Result<()> {
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

/// Object store keeping each object in its own file.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    dir: PathBuf,
}

impl FsObjectStore {
    /// Open a store rooted at an existing objects directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create the objects directory (if needed) and open a store on it.
    pub fn create(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The objects directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `id`.
    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        self.dir.join(id.to_hex())
    }
}

impl ObjectStore for FsObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<Vec<u8>>> {
        let data = match fs::read(self.object_path(id)) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if !ContentHasher::OBJECT.verify(&data, id) {
            let computed = address_of(&data);
            warn!(id = %id, computed = %computed, "object failed hash verification");
            return Err(StoreError::HashMismatch { id: *id, computed });
        }
        Ok(Some(data))
    }

    fn put(&self, content: &[u8]) -> StoreResult<ObjectId> {
        let id = address_of(content);
        let path = self.object_path(&id);
        if path.is_file() {
            debug!(id = %id.short_hex(), "object already stored");
            return Ok(id);
        }

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content)?;
        tmp.as_file().sync_all()?;
        match tmp.persist_noclobber(&path) {
            Ok(_) => {}
            // Another writer stored the same content first; the bytes are
            // identical by construction.
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e.error.into()),
        }

        debug!(id = %id.short_hex(), len = content.len(), "object written");
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.object_path(id).is_file())
    }
}

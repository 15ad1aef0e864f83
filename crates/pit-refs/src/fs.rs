//! File-backed head store: a single text file holding the hex address of the
//! head commit, or nothing at all before the first commit.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use pit_store::write_atomic;
use pit_types::ObjectId;
use tracing::debug;

use crate::error::{RefError, Result};
use crate::traits::HeadStore;

/// `HEAD` file on disk.
#[derive(Debug, Clone)]
pub struct FsHeadStore {
    path: PathBuf,
}

impl FsHeadStore {
    /// Open the head file at `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create an empty head file at `path`.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(path);
        fs::write(&store.path, b"")?;
        Ok(store)
    }

    /// Location of the head file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HeadStore for FsHeadStore {
    fn read_head(&self) -> Result<Option<ObjectId>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed
            .parse()
            .map(Some)
            .map_err(|e: pit_types::TypeError| RefError::MalformedHead {
                content: trimmed.to_string(),
                reason: e.to_string(),
            })
    }

    fn write_head(&self, id: &ObjectId) -> Result<()> {
        write_atomic(&self.path, id.to_hex().as_bytes())?;
        debug!(head = %id.short_hex(), "HEAD advanced");
        Ok(())
    }
}

//! Exclusive repository lock.
//!
//! Mutating operations hold an advisory lock on `.pit/LOCK` for their whole
//! duration. The lock file itself is never removed; only the OS-level lock
//! on it matters, so a crashed process cannot leave a stale lock behind.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::thread;

use fs2::FileExt;
use tracing::{debug, warn};

use crate::config::LockConfig;
use crate::error::{RepoError, RepoResult};

/// RAII guard for the repository lock. Unlocks on drop.
#[derive(Debug)]
pub struct RepoLock {
    file: File,
    path: PathBuf,
}

impl RepoLock {
    /// Acquire the lock at `path`, retrying per `config`.
    ///
    /// Fails with [`RepoError::LockContention`] once all attempts are used.
    pub fn acquire(path: &Path, config: &LockConfig) -> RepoResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let attempts = config.retries.max(1);
        for attempt in 1..=attempts {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    debug!(path = %path.display(), attempt, "repository lock acquired");
                    return Ok(Self {
                        file,
                        path: path.to_path_buf(),
                    });
                }
                Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
                    if attempt < attempts {
                        warn!(attempt, of = attempts, "repository locked, retrying");
                        thread::sleep(config.retry_delay());
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(RepoError::LockContention(path.to_path_buf()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RepoLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!(path = %self.path.display(), error = %e, "failed to release repository lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fast() -> LockConfig {
        LockConfig {
            retries: 2,
            retry_delay_ms: 1,
        }
    }

    #[test]
    fn acquire_creates_lock_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("LOCK");
        let lock = RepoLock::acquire(&path, &fast()).unwrap();
        assert!(path.exists());
        assert_eq!(lock.path(), path);
    }

    #[test]
    fn held_lock_causes_contention() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("LOCK");
        let _held = RepoLock::acquire(&path, &fast()).unwrap();

        let err = RepoLock::acquire(&path, &fast()).unwrap_err();
        assert!(matches!(err, RepoError::LockContention(_)));
    }

    #[test]
    fn dropping_releases_lock() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("LOCK");
        drop(RepoLock::acquire(&path, &fast()).unwrap());
        RepoLock::acquire(&path, &fast()).unwrap();
    }
}

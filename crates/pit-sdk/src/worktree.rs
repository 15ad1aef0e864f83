//! Working tree access.
//!
//! The repository never touches the working directory directly; it goes
//! through [`WorkingTree`], which enumerates candidate files and reads
//! their bytes. [`FsWorkingTree`] is the filesystem implementation.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use ignore::WalkBuilder;
use tracing::warn;

use crate::error::{RepoError, RepoResult};
use crate::repository::PIT_DIR;

/// Name of the per-repository ignore file in the working root.
pub const IGNORE_FILE: &str = ".pitignore";

/// Returns `true` if `path` (relative to the root) lies inside `.pit/`.
pub fn is_repository_path(path: &str) -> bool {
    let unified = path.replace('\\', "/");
    Path::new(&unified)
        .components()
        .find(|c| !matches!(c, Component::CurDir))
        .is_some_and(|c| c.as_os_str() == PIT_DIR)
}

/// The files a repository tracks changes for.
pub trait WorkingTree: Send + Sync {
    /// Relative, `/`-separated paths of all non-ignored files, in a stable
    /// order.
    fn files(&self) -> RepoResult<Vec<String>>;

    /// Read the file at the relative `path`.
    ///
    /// Fails with [`RepoError::FileNotFound`] if it is missing or is not a
    /// regular file.
    fn read(&self, path: &str) -> RepoResult<Vec<u8>>;
}

/// A working tree rooted at a directory on disk.
///
/// Enumeration skips `.pit/`, honours `.pitignore` files (gitignore syntax,
/// in the root and in subdirectories), and applies any extra patterns given
/// at construction. Hidden files are included. Paths come back sorted.
#[derive(Debug, Clone)]
pub struct FsWorkingTree {
    root: PathBuf,
    extra: Gitignore,
}

impl FsWorkingTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            extra: Gitignore::empty(),
            root,
        }
    }

    /// A working tree that additionally ignores `patterns`.
    pub fn with_patterns(root: impl Into<PathBuf>, patterns: &[String]) -> RepoResult<Self> {
        let root = root.into();
        let mut builder = GitignoreBuilder::new(&root);
        for pattern in patterns {
            builder
                .add_line(None, pattern)
                .map_err(|e| RepoError::Config(format!("bad ignore pattern {pattern:?}: {e}")))?;
        }
        let extra = builder
            .build()
            .map_err(|e| RepoError::Config(e.to_string()))?;
        Ok(Self { root, extra })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn relative(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let parts: Option<Vec<&str>> = rel.components().map(|c| c.as_os_str().to_str()).collect();
        parts.map(|p| p.join("/"))
    }
}

impl WorkingTree for FsWorkingTree {
    fn files(&self) -> RepoResult<Vec<String>> {
        let extra = self.extra.clone();
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .parents(false)
            .add_custom_ignore_filename(IGNORE_FILE)
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                if is_dir && entry.file_name() == PIT_DIR {
                    return false;
                }
                !extra.matched(entry.path(), is_dir).is_ignore()
            })
            .build();

        let mut files = Vec::new();
        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable working tree entry");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            match self.relative(entry.path()) {
                Some(rel) => files.push(rel),
                None => warn!(path = %entry.path().display(), "skipping non UTF-8 path"),
            }
        }
        files.sort();
        Ok(files)
    }

    fn read(&self, path: &str) -> RepoResult<Vec<u8>> {
        if is_repository_path(path) {
            return Err(RepoError::FileNotFound(PathBuf::from(path)));
        }
        let full = self.root.join(path);
        match fs::read(&full) {
            Ok(data) => Ok(data),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
                ) || full.is_dir() =>
            {
                Err(RepoError::FileNotFound(PathBuf::from(path)))
            }
            Err(e) => Err(e.into()),
        }
    }
}

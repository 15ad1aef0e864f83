//! Working tree status reconciliation.
//!
//! Three independent states are compared here: the files on disk, the
//! staging index, and the file set of the head commit. The classification
//! precedence and the output order are fixed so that status output is
//! reproducible.

use std::collections::{HashMap, HashSet};

use pit_types::ObjectId;
use serde::Serialize;

use crate::entry::IndexEntry;

/// Label of a file reported by status.
///
/// Files that are committed and unchanged are not reported at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Content differs from what is staged, or from the head commit.
    Modified,
    /// Staged for the next commit with the content currently on disk.
    Staged,
    /// Neither staged nor part of the head commit.
    Untracked,
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Modified => write!(f, "modified"),
            Self::Staged => write!(f, "staged"),
            Self::Untracked => write!(f, "untracked"),
        }
    }
}

/// A single reported file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    /// The file path relative to the working tree root.
    pub path: String,
    /// The classification.
    pub status: FileStatus,
}

impl StatusEntry {
    /// Create a new status entry.
    pub fn new(path: impl Into<String>, status: FileStatus) -> Self {
        Self {
            path: path.into(),
            status,
        }
    }
}

/// Complete status of a repository.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    /// Head commit, or `None` before the first commit.
    pub head: Option<ObjectId>,
    /// Reported files, in reconciliation order.
    pub entries: Vec<StatusEntry>,
}

impl StatusReport {
    /// Create a report.
    pub fn new(head: Option<ObjectId>, entries: Vec<StatusEntry>) -> Self {
        Self { head, entries }
    }

    /// Returns `true` if no commit exists yet.
    pub fn has_no_commits(&self) -> bool {
        self.head.is_none()
    }

    /// Returns `true` if nothing is modified, staged, or untracked.
    pub fn is_clean(&self) -> bool {
        self.entries.is_empty()
    }

    /// Paths carrying the given label, in report order.
    pub fn paths_with(&self, status: FileStatus) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.status == status)
            .map(|e| e.path.as_str())
            .collect()
    }

    /// Label of `path`, or `None` if it is not reported.
    pub fn status_of(&self, path: &str) -> Option<FileStatus> {
        self.entries
            .iter()
            .find(|e| e.path == path)
            .map(|e| e.status)
    }
}

/// Classify working tree files against the index and the head commit.
///
/// `working` is the enumerated working tree as `(path, current address)`
/// pairs, in enumeration order. Each file is classified as follows, the
/// index taking precedence over the head commit:
///
/// 1. staged with a different address than on disk: [`FileStatus::Modified`]
/// 2. staged with the same address: [`FileStatus::Staged`]
/// 3. in head with the same address: unchanged, not reported
/// 4. in head with a different address: [`FileStatus::Modified`]
/// 5. otherwise: [`FileStatus::Untracked`]
///
/// Staged paths missing from the working tree are appended afterwards, in
/// index order, as [`FileStatus::Staged`].
pub fn reconcile(
    working: &[(String, ObjectId)],
    staged: &[IndexEntry],
    head_files: &[IndexEntry],
) -> Vec<StatusEntry> {
    let staged_by_path: HashMap<&str, &ObjectId> = staged
        .iter()
        .map(|e| (e.path.as_str(), &e.object_id))
        .collect();
    let head_by_path: HashMap<&str, &ObjectId> = head_files
        .iter()
        .map(|e| (e.path.as_str(), &e.object_id))
        .collect();

    let mut result = Vec::new();
    let mut covered: HashSet<&str> = HashSet::new();

    for (path, current) in working {
        covered.insert(path.as_str());
        let status = match staged_by_path.get(path.as_str()) {
            Some(staged_id) if *staged_id != current => Some(FileStatus::Modified),
            Some(_) => Some(FileStatus::Staged),
            None => match head_by_path.get(path.as_str()) {
                Some(head_id) if *head_id == current => None,
                Some(_) => Some(FileStatus::Modified),
                None => Some(FileStatus::Untracked),
            },
        };
        if let Some(status) = status {
            result.push(StatusEntry::new(path.clone(), status));
        }
    }

    for entry in staged {
        if covered.insert(entry.path.as_str()) {
            result.push(StatusEntry::new(entry.path.clone(), FileStatus::Staged));
        }
    }

    result
}

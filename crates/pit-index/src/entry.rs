//! Index entry type and path normalization.

use std::path::{Component, Path};

use pit_types::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::{IndexError, IndexResult};

/// An entry in the staging index: one file staged for the next commit.
///
/// Serialized as `{"path": ..., "hash": ...}`, which is also the shape of
/// each element of a commit's `files` list.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Relative, `/`-separated path from the working tree root.
    pub path: String,
    /// Content address of the file's blob in the object store.
    #[serde(rename = "hash")]
    pub object_id: ObjectId,
}

impl IndexEntry {
    /// Create a new index entry.
    pub fn new(path: impl Into<String>, object_id: ObjectId) -> Self {
        Self {
            path: path.into(),
            object_id,
        }
    }
}

/// Normalize a working-tree path for storage in the index.
///
/// - Converts `\` separators to `/`
/// - Removes `./` components
/// - Rejects empty, absolute, and `..` paths
pub fn normalize_path(path: &str) -> IndexResult<String> {
    if path.is_empty() {
        return Err(IndexError::InvalidPath("empty path".to_string()));
    }
    let unified = path.replace('\\', "/");
    let mut parts = Vec::new();
    for component in Path::new(&unified).components() {
        match component {
            Component::Normal(part) => {
                let part = part
                    .to_str()
                    .ok_or_else(|| IndexError::InvalidPath(path.to_string()))?;
                parts.push(part);
            }
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(IndexError::InvalidPath(format!(
                    "path traversal not allowed: {path}"
                )));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(IndexError::InvalidPath(format!(
                    "absolute paths not allowed: {path}"
                )));
            }
        }
    }
    if parts.is_empty() {
        return Err(IndexError::InvalidPath(path.to_string()));
    }
    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_serializes_with_hash_key() {
        let id = ObjectId::from_bytes(b"x");
        let entry = IndexEntry::new("a.txt", id);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["path"], "a.txt");
        assert_eq!(json["hash"], id.to_hex());
    }

    #[test]
    fn normalize_strips_dot_prefix() {
        assert_eq!(normalize_path("./src/main.rs").unwrap(), "src/main.rs");
    }

    #[test]
    fn normalize_converts_backslashes() {
        assert_eq!(normalize_path("src\\lib.rs").unwrap(), "src/lib.rs");
    }

    #[test]
    fn normalize_keeps_awkward_characters() {
        let odd = "dir, with [brackets]/it's \"quoted\".txt";
        assert_eq!(normalize_path(odd).unwrap(), odd);
    }

    #[test]
    fn normalize_rejects_bad_paths() {
        for bad in ["", ".", "/etc/passwd", "../outside.txt", "a/../../b"] {
            assert!(
                matches!(normalize_path(bad), Err(IndexError::InvalidPath(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}

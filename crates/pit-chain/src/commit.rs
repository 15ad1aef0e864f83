use chrono::{DateTime, Utc};
use pit_index::IndexEntry;
use pit_store::address_of;
use pit_types::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::{ChainError, ChainResult};

/// A commit record.
///
/// Serialized as a JSON object with keys in this order: `parent` (hex
/// address or `null`), `message`, `date` (RFC 3339 / ISO-8601, UTC) and
/// `files` (list of `{path, hash}`). The serialization is deterministic, so
/// the address of a commit is a function of its contents alone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub parent: Option<ObjectId>,
    pub message: String,
    pub date: DateTime<Utc>,
    pub files: Vec<IndexEntry>,
}

impl Commit {
    pub fn new(
        parent: Option<ObjectId>,
        message: impl Into<String>,
        date: DateTime<Utc>,
        files: Vec<IndexEntry>,
    ) -> Self {
        Self {
            parent,
            message: message.into(),
            date,
            files,
        }
    }

    /// Canonical serialized form; these are the bytes that get stored.
    pub fn to_bytes(&self) -> ChainResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| ChainError::Serialization(e.to_string()))
    }

    /// Parse the stored bytes of the commit at `id`.
    pub fn from_bytes(id: &ObjectId, data: &[u8]) -> ChainResult<Self> {
        serde_json::from_slice(data).map_err(|e| ChainError::MalformedCommit {
            id: *id,
            reason: e.to_string(),
        })
    }

    /// The address this commit is stored under.
    pub fn address(&self) -> ChainResult<ObjectId> {
        Ok(address_of(&self.to_bytes()?))
    }

    /// Returns `true` for the first commit of a repository.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Look up a committed file by path.
    pub fn file(&self, path: &str) -> Option<&IndexEntry> {
        self.files.iter().find(|f| f.path == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap()
    }

    fn sample() -> Commit {
        Commit::new(
            Some(ObjectId::from_bytes(b"parent")),
            "second",
            fixed_date(),
            vec![
                IndexEntry::new("a.txt", ObjectId::from_bytes(b"a")),
                IndexEntry::new("dir/b, c.txt", ObjectId::from_bytes(b"b")),
            ],
        )
    }

    #[test]
    fn serialize_then_parse_reproduces_fields() {
        let commit = sample();
        let bytes = commit.to_bytes().unwrap();
        let parsed = Commit::from_bytes(&address_of(&bytes), &bytes).unwrap();
        assert_eq!(parsed.parent, commit.parent);
        assert_eq!(parsed.message, commit.message);
        assert_eq!(parsed.date, commit.date);
        assert_eq!(parsed.files, commit.files);
    }

    #[test]
    fn serialized_keys_are_stable() {
        let commit = sample();
        let text = String::from_utf8(commit.to_bytes().unwrap()).unwrap();
        let parent = text.find("\"parent\"").unwrap();
        let message = text.find("\"message\"").unwrap();
        let date = text.find("\"date\"").unwrap();
        let files = text.find("\"files\"").unwrap();
        assert!(parent < message && message < date && date < files);
        assert!(text.contains("\"path\":\"a.txt\""));
        assert!(text.contains("\"date\":\"2024-05-17T09:30:00Z\""));
    }

    #[test]
    fn root_commit_has_null_parent() {
        let commit = Commit::new(None, "first", fixed_date(), vec![]);
        assert!(commit.is_root());
        let json: serde_json::Value = serde_json::from_slice(&commit.to_bytes().unwrap()).unwrap();
        assert!(json["parent"].is_null());
    }

    #[test]
    fn address_depends_on_every_field() {
        let base = sample();
        let mut renamed = base.clone();
        renamed.message = "other".into();
        let mut reparented = base.clone();
        reparented.parent = None;
        assert_ne!(base.address().unwrap(), renamed.address().unwrap());
        assert_ne!(base.address().unwrap(), reparented.address().unwrap());
        assert_eq!(base.address().unwrap(), sample().address().unwrap());
    }

    #[test]
    fn file_lookup() {
        let commit = sample();
        assert!(commit.file("a.txt").is_some());
        assert!(commit.file("missing.txt").is_none());
    }

    #[test]
    fn non_commit_bytes_are_malformed() {
        let id = address_of(b"hello");
        let err = Commit::from_bytes(&id, b"hello").unwrap_err();
        assert!(matches!(err, ChainError::MalformedCommit { .. }));
    }
}

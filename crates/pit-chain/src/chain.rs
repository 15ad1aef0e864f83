//! The commit chain: creating commits and walking history.
//!
//! Commits form a singly linked list through their `parent` field, with
//! `HEAD` naming the newest. A commit is written in three steps, in this
//! order:
//!
//! 1. the commit object is put into the object store
//! 2. `HEAD` is advanced to the new commit
//! 3. the staging index is cleared
//!
//! A crash between steps leaves either an unreferenced object (harmless) or
//! a committed index that is re-sealed by the next commit. `HEAD` never
//! names an object that was not written.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pit_index::StagingIndex;
use pit_refs::HeadStore;
use pit_store::{ObjectStore, StoreError};
use pit_types::ObjectId;
use tracing::{debug, info, warn};

use crate::commit::Commit;
use crate::error::{ChainError, ChainResult};

/// Creates commits and reads them back.
#[derive(Clone)]
pub struct CommitChain {
    store: Arc<dyn ObjectStore>,
    head: Arc<dyn HeadStore>,
}

impl std::fmt::Debug for CommitChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommitChain").finish_non_exhaustive()
    }
}

impl CommitChain {
    pub fn new(store: Arc<dyn ObjectStore>, head: Arc<dyn HeadStore>) -> Self {
        Self { store, head }
    }

    /// Address of the newest commit, or `None` before the first commit.
    pub fn head(&self) -> ChainResult<Option<ObjectId>> {
        Ok(self.head.read_head()?)
    }

    /// Seal the staged entries into a new commit dated now.
    ///
    /// An empty index is allowed and produces a commit with no files.
    /// On success the index is empty; persisting it is up to the caller.
    pub fn commit(&self, index: &mut StagingIndex, message: &str) -> ChainResult<ObjectId> {
        self.commit_at(index, message, Utc::now())
    }

    /// Like [`commit`](Self::commit) with an explicit date.
    pub fn commit_at(
        &self,
        index: &mut StagingIndex,
        message: &str,
        date: DateTime<Utc>,
    ) -> ChainResult<ObjectId> {
        let parent = self.head.read_head()?;
        let commit = Commit::new(parent, message, date, index.list().to_vec());
        let bytes = commit.to_bytes()?;

        let id = self.store.put(&bytes)?;
        self.head.write_head(&id)?;
        index.clear();

        info!(
            commit = %id.short_hex(),
            parent = ?parent.map(|p| p.short_hex()),
            files = commit.files.len(),
            "commit created"
        );
        Ok(id)
    }

    /// Load the commit at `id`.
    pub fn show(&self, id: &ObjectId) -> ChainResult<Commit> {
        match self.store.read(id)? {
            Some(data) => Commit::from_bytes(id, &data),
            None => Err(ChainError::ObjectNotFound(*id)),
        }
    }

    /// Walk history from `HEAD` back to the root commit, newest first.
    ///
    /// The walk is lazy: each step reads one commit object.
    pub fn log(&self) -> ChainResult<History> {
        let head = self.head.read_head()?;
        Ok(History {
            store: Arc::clone(&self.store),
            next: head.map(|id| (id, None)),
        })
    }

    /// Walk the whole history and check that every committed file blob is
    /// present. Returns the number of commits.
    pub fn verify(&self) -> ChainResult<usize> {
        let mut count = 0;
        for item in self.log()? {
            let (id, commit) = item?;
            for file in &commit.files {
                if !self.store.exists(&file.object_id)? {
                    warn!(commit = %id.short_hex(), path = %file.path, "committed blob missing");
                    return Err(ChainError::CorruptHistory {
                        missing: file.object_id,
                        referenced_by: Some(id),
                    });
                }
            }
            count += 1;
        }
        debug!(commits = count, "history verified");
        Ok(count)
    }
}

/// Lazy newest-first iterator over the commit chain.
///
/// Yields `(address, commit)` pairs. After the first error the iterator is
/// exhausted.
pub struct History {
    store: Arc<dyn ObjectStore>,
    // Next commit to load, with the commit that referenced it.
    next: Option<(ObjectId, Option<ObjectId>)>,
}

impl std::fmt::Debug for History {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("History")
            .field("next", &self.next.map(|(id, _)| id))
            .finish()
    }
}

impl History {
    fn load(&self, id: &ObjectId, referenced_by: Option<ObjectId>) -> ChainResult<Commit> {
        let corrupt = || ChainError::CorruptHistory {
            missing: *id,
            referenced_by,
        };
        match self.store.read(id) {
            Ok(Some(data)) => Commit::from_bytes(id, &data),
            Ok(None) => {
                warn!(missing = %id.short_hex(), "history references a missing object");
                Err(corrupt())
            }
            Err(StoreError::HashMismatch { .. }) => Err(corrupt()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Iterator for History {
    type Item = ChainResult<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let (id, referenced_by) = self.next.take()?;
        match self.load(&id, referenced_by) {
            Ok(commit) => {
                self.next = commit.parent.map(|parent| (parent, Some(id)));
                Some(Ok((id, commit)))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

impl std::iter::FusedIterator for History {}

#[cfg(test)]
mod tests {
    use super::*;
    use pit_refs::InMemoryHeadStore;
    use pit_store::InMemoryObjectStore;

    struct Fixture {
        store: Arc<InMemoryObjectStore>,
        chain: CommitChain,
        index: StagingIndex,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryObjectStore::new());
        let head: Arc<dyn HeadStore> = Arc::new(InMemoryHeadStore::new());
        let chain = CommitChain::new(store.clone(), head);
        let index = StagingIndex::new(store.clone());
        Fixture {
            store,
            chain,
            index,
        }
    }

    #[test]
    fn empty_repository_has_no_history() {
        let fx = fixture();
        assert_eq!(fx.chain.head().unwrap(), None);
        assert_eq!(fx.chain.log().unwrap().count(), 0);
        assert_eq!(fx.chain.verify().unwrap(), 0);
    }

    #[test]
    fn commit_seals_index_and_advances_head() {
        let mut fx = fixture();
        let blob = fx.index.stage_file("a.txt", b"hello").unwrap();
        let id = fx.chain.commit(&mut fx.index, "first").unwrap();

        assert!(fx.index.is_empty());
        assert_eq!(fx.chain.head().unwrap(), Some(id));

        let commit = fx.chain.show(&id).unwrap();
        assert!(commit.is_root());
        assert_eq!(commit.message, "first");
        assert_eq!(commit.file("a.txt").unwrap().object_id, blob);
    }

    #[test]
    fn log_is_newest_first_with_parent_links() {
        let mut fx = fixture();
        let mut ids = Vec::new();
        for i in 0..4 {
            fx.index
                .stage_file(&format!("f{i}.txt"), format!("v{i}").as_bytes())
                .unwrap();
            ids.push(fx.chain.commit(&mut fx.index, &format!("commit {i}")).unwrap());
        }

        let history: Vec<(ObjectId, Commit)> =
            fx.chain.log().unwrap().collect::<ChainResult<_>>().unwrap();
        assert_eq!(history.len(), 4);

        let walked: Vec<ObjectId> = history.iter().map(|(id, _)| *id).collect();
        let expected: Vec<ObjectId> = ids.iter().rev().copied().collect();
        assert_eq!(walked, expected);

        for pair in history.windows(2) {
            assert_eq!(pair[0].1.parent, Some(pair[1].0));
        }
        assert!(history.last().unwrap().1.is_root());
        assert_eq!(history[0].1.message, "commit 3");
    }

    #[test]
    fn commit_files_keep_staging_order() {
        let mut fx = fixture();
        fx.index.stage_file("b.txt", b"b").unwrap();
        fx.index.stage_file("a.txt", b"a").unwrap();
        let id = fx.chain.commit(&mut fx.index, "unsorted").unwrap();

        let commit = fx.chain.show(&id).unwrap();
        let paths: Vec<&str> = commit.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, ["b.txt", "a.txt"]);
    }

    #[test]
    fn empty_commit_is_allowed() {
        let mut fx = fixture();
        let id = fx.chain.commit(&mut fx.index, "nothing staged").unwrap();
        assert!(fx.chain.show(&id).unwrap().files.is_empty());
    }

    #[test]
    fn commits_only_contain_files_staged_since_parent() {
        let mut fx = fixture();
        fx.index.stage_file("a.txt", b"a").unwrap();
        fx.chain.commit(&mut fx.index, "one").unwrap();
        fx.index.stage_file("b.txt", b"b").unwrap();
        let second = fx.chain.commit(&mut fx.index, "two").unwrap();

        let commit = fx.chain.show(&second).unwrap();
        let paths: Vec<&str> = commit.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["b.txt"]);
    }

    #[test]
    fn commit_at_is_deterministic() {
        let date = DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut a = fixture();
        let mut b = fixture();
        a.index.stage_file("x", b"same").unwrap();
        b.index.stage_file("x", b"same").unwrap();
        assert_eq!(
            a.chain.commit_at(&mut a.index, "m", date).unwrap(),
            b.chain.commit_at(&mut b.index, "m", date).unwrap()
        );
    }

    #[test]
    fn missing_parent_is_corrupt_history() {
        let mut fx = fixture();
        let first = fx.chain.commit(&mut fx.index, "first").unwrap();
        let second = fx.chain.commit(&mut fx.index, "second").unwrap();
        fx.store.remove(&first);

        let mut log = fx.chain.log().unwrap();
        let (newest, _) = log.next().unwrap().unwrap();
        assert_eq!(newest, second);

        let err = log.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            ChainError::CorruptHistory { missing, referenced_by: Some(by) }
                if missing == first && by == second
        ));
        assert!(log.next().is_none());
    }

    #[test]
    fn missing_head_object_is_corrupt_history() {
        let mut fx = fixture();
        let only = fx.chain.commit(&mut fx.index, "only").unwrap();
        fx.store.remove(&only);

        let err = fx.chain.log().unwrap().next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            ChainError::CorruptHistory { referenced_by: None, .. }
        ));
    }

    #[test]
    fn show_unknown_commit_is_not_found() {
        let fx = fixture();
        let id = ObjectId::from_bytes(b"nope");
        assert!(matches!(fx.chain.show(&id), Err(ChainError::ObjectNotFound(_))));
    }

    #[test]
    fn show_blob_is_malformed_commit() {
        let mut fx = fixture();
        let blob = fx.index.stage_file("a.txt", b"not a commit").unwrap();
        assert!(matches!(
            fx.chain.show(&blob),
            Err(ChainError::MalformedCommit { .. })
        ));
    }

    #[test]
    fn verify_detects_missing_blob() {
        let mut fx = fixture();
        let blob = fx.index.stage_file("a.txt", b"payload").unwrap();
        let id = fx.chain.commit(&mut fx.index, "c").unwrap();
        assert_eq!(fx.chain.verify().unwrap(), 1);

        fx.store.remove(&blob);
        let err = fx.chain.verify().unwrap_err();
        assert!(matches!(
            err,
            ChainError::CorruptHistory { missing, referenced_by: Some(by) }
                if missing == blob && by == id
        ));
    }
}

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pit_chain::{Commit, CommitChain};
use pit_index::{
    normalize_path, reconcile, IndexEntry, IndexError, StagingIndex, StatusReport,
};
use pit_refs::{FsHeadStore, HeadStore};
use pit_store::{address_of, FsObjectStore, ObjectStore};
use pit_types::ObjectId;
use tracing::{debug, info, warn};

use crate::config::RepoConfig;
use crate::error::{RepoError, RepoResult};
use crate::lock::RepoLock;
use crate::worktree::{is_repository_path, FsWorkingTree, WorkingTree};

/// Name of the repository directory inside the working root.
pub const PIT_DIR: &str = ".pit";

const OBJECTS_DIR: &str = "objects";
const HEAD_FILE: &str = "HEAD";
const INDEX_FILE: &str = "index";
const CONFIG_FILE: &str = "config.toml";
const LOCK_FILE: &str = "LOCK";

/// An on-disk Pit repository.
///
/// Holds paths and configuration only. Each operation loads the index and
/// `HEAD` afresh, and mutating operations run under [`RepoLock`].
pub struct Repository {
    root: PathBuf,
    config: RepoConfig,
    worktree: Arc<dyn WorkingTree>,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("root", &self.root)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Repository {
    /// Create a new repository in `root` (created if needed).
    ///
    /// Fails with [`RepoError::RepositoryAlreadyExists`] if `root/.pit`
    /// already exists; nothing is modified in that case.
    pub fn init_repository(root: impl AsRef<Path>) -> RepoResult<Self> {
        let root = root.as_ref();
        fs::create_dir_all(root)?;
        let root = root.canonicalize()?;
        let pit_dir = root.join(PIT_DIR);

        match fs::create_dir(&pit_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(RepoError::RepositoryAlreadyExists(pit_dir));
            }
            Err(e) => return Err(e.into()),
        }

        let store = FsObjectStore::create(pit_dir.join(OBJECTS_DIR))?;
        FsHeadStore::create(pit_dir.join(HEAD_FILE))?;
        StagingIndex::new(Arc::new(store)).persist(&pit_dir.join(INDEX_FILE))?;
        let config = RepoConfig::default();
        config.save(&pit_dir.join(CONFIG_FILE))?;

        info!(path = %pit_dir.display(), "repository initialized");
        Self::with_config(root, config)
    }

    /// Open the repository whose working root is `root`.
    pub fn open(root: impl AsRef<Path>) -> RepoResult<Self> {
        let root = root.as_ref();
        let pit_dir = root.join(PIT_DIR);
        if !pit_dir.is_dir() {
            return Err(RepoError::RepositoryNotFound(root.to_path_buf()));
        }
        let root = root.canonicalize()?;
        let config = RepoConfig::load(&root.join(PIT_DIR).join(CONFIG_FILE))?;
        debug!(root = %root.display(), "repository opened");
        Self::with_config(root, config)
    }

    /// Open the repository containing `start`, searching parent directories.
    pub fn discover(start: impl AsRef<Path>) -> RepoResult<Self> {
        let start = start.as_ref();
        let absolute = start
            .canonicalize()
            .map_err(|_| RepoError::RepositoryNotFound(start.to_path_buf()))?;
        for dir in absolute.ancestors() {
            if dir.join(PIT_DIR).is_dir() {
                return Self::open(dir);
            }
        }
        Err(RepoError::RepositoryNotFound(absolute))
    }

    fn with_config(root: PathBuf, config: RepoConfig) -> RepoResult<Self> {
        let worktree = FsWorkingTree::with_patterns(&root, &config.ignore.patterns)?;
        Ok(Self {
            root,
            config,
            worktree: Arc::new(worktree),
        })
    }

    /// Replace the working tree collaborator.
    pub fn with_working_tree(mut self, worktree: Arc<dyn WorkingTree>) -> Self {
        self.worktree = worktree;
        self
    }

    // ---- Accessors ----

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pit_dir(&self) -> PathBuf {
        self.root.join(PIT_DIR)
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    pub fn working_tree(&self) -> &dyn WorkingTree {
        self.worktree.as_ref()
    }

    fn store(&self) -> Arc<dyn ObjectStore> {
        Arc::new(FsObjectStore::new(self.pit_dir().join(OBJECTS_DIR)))
    }

    fn chain(&self, store: Arc<dyn ObjectStore>) -> CommitChain {
        let head: Arc<dyn HeadStore> = Arc::new(FsHeadStore::new(self.pit_dir().join(HEAD_FILE)));
        CommitChain::new(store, head)
    }

    fn index_path(&self) -> PathBuf {
        self.pit_dir().join(INDEX_FILE)
    }

    fn load_index(&self, store: Arc<dyn ObjectStore>) -> RepoResult<StagingIndex> {
        Ok(StagingIndex::load(&self.index_path(), store)?)
    }

    fn lock(&self) -> RepoResult<RepoLock> {
        RepoLock::acquire(&self.pit_dir().join(LOCK_FILE), &self.config.lock)
    }

    // ---- Staging ----

    /// Stage the working file at `path` (relative to the root).
    ///
    /// Stores its content as a blob and records it in the index. Fails with
    /// [`RepoError::FileNotFound`] if the file cannot be read and with
    /// [`RepoError::AlreadyStaged`] if this path is already staged with the
    /// same content. Paths inside `.pit/` are refused.
    pub fn stage_file(&self, path: &str) -> RepoResult<ObjectId> {
        let path = normalize_path(path)?;
        if is_repository_path(&path) {
            return Err(RepoError::Index(IndexError::InvalidPath(format!(
                "{path} is inside the repository directory"
            ))));
        }
        let content = self.worktree.read(&path)?;

        let _lock = self.lock()?;
        let mut index = self.load_index(self.store())?;
        let id = index.stage_file(&path, &content)?;
        index.persist(&self.index_path())?;

        info!(path = %path, object = %id.short_hex(), "file staged");
        Ok(id)
    }

    /// Entries currently staged, in insertion order.
    pub fn staged(&self) -> RepoResult<Vec<IndexEntry>> {
        Ok(self.load_index(self.store())?.list().to_vec())
    }

    // ---- History ----

    /// Seal the staged entries into a new commit and return its address.
    pub fn commit(&self, message: &str) -> RepoResult<ObjectId> {
        let _lock = self.lock()?;
        let store = self.store();
        let mut index = self.load_index(Arc::clone(&store))?;
        let id = self.chain(store).commit(&mut index, message)?;
        index.persist(&self.index_path())?;
        Ok(id)
    }

    /// Address of the newest commit, or `None` before the first commit.
    pub fn head(&self) -> RepoResult<Option<ObjectId>> {
        Ok(self.chain(self.store()).head()?)
    }

    /// Commits from `HEAD` back to the root, newest first. Lazy.
    pub fn log(&self) -> RepoResult<impl Iterator<Item = RepoResult<(ObjectId, Commit)>>> {
        let history = self.chain(self.store()).log()?;
        Ok(history.map(|item| item.map_err(RepoError::from)))
    }

    /// Load a single commit by address.
    pub fn show(&self, id: &ObjectId) -> RepoResult<Commit> {
        Ok(self.chain(self.store()).show(id)?)
    }

    /// Check that every commit and committed blob reachable from `HEAD` is
    /// present and intact. Returns the number of commits.
    pub fn verify(&self) -> RepoResult<usize> {
        Ok(self.chain(self.store()).verify()?)
    }

    // ---- Status ----

    /// Compare the working tree against the index and the head commit.
    pub fn status(&self) -> RepoResult<StatusReport> {
        let store = self.store();
        let chain = self.chain(Arc::clone(&store));
        let head = chain.head()?;
        let head_files = match head {
            Some(id) => chain.show(&id)?.files,
            None => Vec::new(),
        };
        let index = self.load_index(store)?;

        let mut working = Vec::new();
        for path in self.worktree.files()? {
            match self.worktree.read(&path) {
                Ok(content) => working.push((path, address_of(&content))),
                // Removed or made unreadable since enumeration.
                Err(RepoError::FileNotFound(_)) => {
                    warn!(path = %path, "skipping file that disappeared during status");
                }
                Err(e) => return Err(e),
            }
        }

        let entries = reconcile(&working, index.list(), &head_files);
        debug!(
            files = working.len(),
            reported = entries.len(),
            "status computed"
        );
        Ok(StatusReport::new(head, entries))
    }
}

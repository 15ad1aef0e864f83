use std::path::PathBuf;

use pit_chain::ChainError;
use pit_index::IndexError;
use pit_types::ObjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("repository already exists at {0}")]
    RepositoryAlreadyExists(PathBuf),

    #[error("not a pit repository (or any parent up to /): {0}")]
    RepositoryNotFound(PathBuf),

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("{path} is already staged with the same content")]
    AlreadyStaged { path: String, object_id: ObjectId },

    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),

    #[error("corrupt history: object {missing} is missing or damaged")]
    CorruptHistory {
        missing: ObjectId,
        referenced_by: Option<ObjectId>,
    },

    #[error("repository is locked by another process: {0}")]
    LockContention(PathBuf),

    #[error("store error: {0}")]
    Store(#[from] pit_store::StoreError),

    #[error("index error: {0}")]
    Index(IndexError),

    #[error("chain error: {0}")]
    Chain(ChainError),

    #[error("ref error: {0}")]
    Refs(#[from] pit_refs::RefError),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<IndexError> for RepoError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::AlreadyStaged { path, object_id } => Self::AlreadyStaged { path, object_id },
            IndexError::Store(e) => Self::Store(e),
            other => Self::Index(other),
        }
    }
}

impl From<ChainError> for RepoError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::CorruptHistory {
                missing,
                referenced_by,
            } => Self::CorruptHistory {
                missing,
                referenced_by,
            },
            ChainError::ObjectNotFound(id) => Self::ObjectNotFound(id),
            ChainError::Store(e) => Self::Store(e),
            ChainError::Refs(e) => Self::Refs(e),
            other => Self::Chain(other),
        }
    }
}

pub type RepoResult<T> = Result<T, RepoError>;

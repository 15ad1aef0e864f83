//! Error types for the index crate.

use pit_types::ObjectId;

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The identical `(path, object)` pair is already staged.
    #[error("{path} is already staged at {object_id}")]
    AlreadyStaged { path: String, object_id: ObjectId },

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] pit_store::StoreError),

    /// Serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The index file was written by an unknown format version.
    #[error("unsupported index version {0}")]
    UnsupportedVersion(u32),

    /// An invalid path was provided.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// I/O error reading or writing the index file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;

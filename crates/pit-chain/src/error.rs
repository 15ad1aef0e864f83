use pit_types::ObjectId;

/// Errors produced by commit chain operations.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// An object reachable from HEAD is missing or damaged.
    ///
    /// `referenced_by` is the commit naming the missing object, or `None`
    /// when HEAD itself points at nothing.
    #[error("corrupt history: object {missing} is missing or damaged")]
    CorruptHistory {
        missing: ObjectId,
        referenced_by: Option<ObjectId>,
    },

    /// A commit requested by address does not exist.
    #[error("commit not found: {0}")]
    ObjectNotFound(ObjectId),

    /// The object exists but is not a well-formed commit record.
    #[error("malformed commit {id}: {reason}")]
    MalformedCommit { id: ObjectId, reason: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("store error: {0}")]
    Store(#[from] pit_store::StoreError),

    #[error("ref error: {0}")]
    Refs(#[from] pit_refs::RefError),
}

/// Result alias for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

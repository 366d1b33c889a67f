use snapdiff_diff::DiffError;

/// Errors from snapshot cache operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CacheError {
    /// An argument was empty or otherwise unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A baseline is already stored under this key.
    #[error("duplicate key: {key}")]
    DuplicateKey { key: String },

    /// No baseline is stored under this key.
    #[error("key not found: {key}")]
    KeyNotFound { key: String },

    /// The stored baseline holds a different element type than requested.
    #[error("type mismatch for {key}: stored {stored}, requested {requested}")]
    TypeMismatch {
        key: String,
        stored: &'static str,
        requested: &'static str,
    },

    /// The comparison itself failed.
    #[error("diff error: {0}")]
    Diff(#[from] DiffError),

    /// A thread panicked while holding the cache lock.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Result alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

use thiserror::Error;

/// Failure reported by a storage adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    /// The store aborted the transaction and it may succeed if run again
    /// (serialization failure, deadlock).
    #[error("transaction aborted, retry possible: {0}")]
    Retryable(String),
    #[error("store error: {0}")]
    Backend(String),
}

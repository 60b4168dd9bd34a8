use thiserror::Error;

/// Postgres SQLSTATE codes for transactions the server aborted and that may
/// succeed when run again.
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl RepositoryError {
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::DatabaseError(sqlx::Error::Database(e)) => e.is_unique_violation(),
            _ => false,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::DatabaseError(sqlx::Error::Database(e)) => matches!(
                e.code().as_deref(),
                Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED)
            ),
            _ => false,
        }
    }
}

//! PostgreSQL implementations of the store ports.

mod booking;
mod catalog;

pub use booking::PostgresBookingStore;
pub use catalog::PostgresCatalogAdapter;

use crate::{domain::ports::outbound::StoreError, repositories::RepositoryError};

impl From<RepositoryError> for StoreError {
    fn from(e: RepositoryError) -> Self {
        if e.is_unique_violation() {
            StoreError::UniqueViolation(e.to_string())
        } else if e.is_retryable() {
            StoreError::Retryable(e.to_string())
        } else {
            StoreError::Backend(e.to_string())
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        RepositoryError::from(e).into()
    }
}

#[cfg(test)]
mod tests;

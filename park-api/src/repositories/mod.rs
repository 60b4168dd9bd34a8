mod activity_repo;
mod booking_repo;
mod repo_error;

pub use activity_repo::*;
pub use booking_repo::*;
pub use repo_error::RepositoryError;

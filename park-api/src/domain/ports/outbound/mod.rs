mod booking_store;
mod catalog_repository;
mod seed_repository;
mod store_error;

pub use booking_store::*;
pub use catalog_repository::*;
pub use seed_repository::*;
pub use store_error::*;

mod booking;
mod catalog;
mod seeding;

pub use booking::{BookingServiceImpl, DEFAULT_MAX_ATTEMPTS};
pub use catalog::CatalogServiceImpl;
pub use seeding::{CatalogSeeder, SeedPlan, SeedReport};

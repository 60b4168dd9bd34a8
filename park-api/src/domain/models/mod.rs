mod activity;
mod booking;
mod ids;
mod schedule;
mod visitor;

pub use activity::*;
pub use booking::*;
pub use ids::*;
pub use schedule::*;
pub use visitor::*;

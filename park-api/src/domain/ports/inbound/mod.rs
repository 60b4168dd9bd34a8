mod booking;
mod catalog;

pub use booking::*;
pub use catalog::*;

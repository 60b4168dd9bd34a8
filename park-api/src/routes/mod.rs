pub(crate) mod activities;
pub(crate) mod bookings;
pub(crate) mod error;
pub(crate) mod health;

pub(crate) use error::ApiError;

#[cfg(test)]
mod tests;

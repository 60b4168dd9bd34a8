use serde::Serialize;
use thiserror::Error;
use time::{Date, Weekday};

use crate::domain::models::{ActivityId, NationalId, TimeSlotId};

/// Broad failure categories shared by every domain error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Malformed or unknown input the caller can correct.
    InvalidInput,
    /// The park, slot or schedule is not offered.
    Unavailable,
    /// A business precondition on the request is not met.
    PreconditionFailed,
    /// The request collides with current state (capacity, existing booking).
    Conflict,
    /// Storage or transaction failure.
    Internal,
}

/// Errors that can occur while booking visitors onto an activity.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("the park is closed on {weekday}s ({date})")]
    ParkClosed { date: Date, weekday: Weekday },
    #[error("terms and conditions must be accepted")]
    TermsNotAccepted,
    #[error("invalid visitor data: {0}")]
    InvalidVisitor(String),
    #[error("activity not found: {0}")]
    ActivityNotFound(ActivityId),
    #[error("time slot not found: {0}")]
    TimeSlotNotFound(TimeSlotId),
    #[error("activity {activity_id} is not offered at time slot {time_slot_id} on {date}")]
    ScheduleUnavailable {
        activity_id: ActivityId,
        time_slot_id: TimeSlotId,
        date: Date,
    },
    #[error("not enough capacity: {requested} places requested, {remaining} remaining")]
    CapacityExhausted { requested: usize, remaining: i32 },
    #[error("a clothing size is required for visitor {0}")]
    SizeRequired(NationalId),
    #[error("visitor {0} already holds a booking for this time slot and date")]
    DuplicateBooking(NationalId),
    #[error("{0}")]
    Internal(String),
}

impl BookingError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDate(_) | Self::InvalidVisitor(_) | Self::ActivityNotFound(_) => {
                ErrorKind::InvalidInput
            }
            Self::ParkClosed { .. } | Self::TimeSlotNotFound(_) | Self::ScheduleUnavailable { .. } => {
                ErrorKind::Unavailable
            }
            Self::TermsNotAccepted | Self::SizeRequired(_) => ErrorKind::PreconditionFailed,
            Self::CapacityExhausted { .. } | Self::DuplicateBooking(_) => ErrorKind::Conflict,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Errors raised by the read-only catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("activity not found: {0}")]
    ActivityNotFound(ActivityId),
    #[error("{0}")]
    Store(String),
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ActivityNotFound(_) => ErrorKind::Unavailable,
            Self::Store(_) => ErrorKind::Internal,
        }
    }
}

/// Errors raised while installing reference data and capacity rows.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("seed range ends ({end}) before it starts ({start})")]
    InvalidRange { start: Date, end: Date },
    #[error("{0}")]
    Store(String),
}

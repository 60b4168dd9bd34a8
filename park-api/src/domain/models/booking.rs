use serde::Deserialize;

use super::{ActivityId, BookingId, NewVisitor, TimeSlotId};

/// A request to book a group of visitors onto one activity session.
///
/// `date` is kept as submitted; parsing it is the first validation step.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub activity_id: ActivityId,
    pub time_slot_id: TimeSlotId,
    pub date: String,
    pub visitors: Vec<NewVisitor>,
    pub accepts_terms: bool,
}

/// Confirmation of a committed booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingReceipt {
    pub booking_ids: Vec<BookingId>,
    /// Capacity left on the booked row after this booking.
    pub remaining_capacity: i32,
}

impl BookingReceipt {
    pub const CONFIRMATION: &'static str = "Booking confirmed";
}

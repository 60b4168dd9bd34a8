use async_trait::async_trait;

use crate::domain::{
    models::{BookingReceipt, BookingRequest},
    BookingError,
};

/// Inbound port for registering visitors on an activity session.
#[async_trait]
pub trait BookingService: Send + Sync + 'static {
    /// Validate a booking request and, if every rule passes, record all of its
    /// visitors in one transaction.
    ///
    /// Either every visitor is booked and the capacity row is decremented by
    /// the visitor count, or nothing is written.
    async fn book_visitors(&self, request: &BookingRequest) -> Result<BookingReceipt, BookingError>;
}

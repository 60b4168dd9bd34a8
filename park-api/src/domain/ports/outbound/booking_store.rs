//! Transactional booking port (outbound).
//!
//! The booking engine drives a [`BookingTransaction`] through validation and
//! writes. Nothing a transaction does is visible to others until
//! [`BookingTransaction::commit`]; dropping it without committing rolls back.

use async_trait::async_trait;

use crate::domain::models::{
    Activity, ActivityId, BookingId, NewVisitor, ScheduleKey, TimeSlotId, VisitorId,
};

use super::StoreError;

/// Opens booking transactions against the store.
#[async_trait]
pub trait BookingStore: Send + Sync + 'static {
    type Tx: BookingTransaction;

    async fn begin(&self) -> Result<Self::Tx, StoreError>;
}

/// One all-or-nothing unit of booking work.
#[async_trait]
pub trait BookingTransaction: Send {
    async fn find_activity(&mut self, activity_id: ActivityId)
        -> Result<Option<Activity>, StoreError>;

    async fn time_slot_exists(&mut self, time_slot_id: TimeSlotId) -> Result<bool, StoreError>;

    /// Read the remaining capacity of a row and lock it until the transaction
    /// ends, so concurrent bookings of the same row run one after the other.
    ///
    /// Returns `None` if the activity is not offered at that slot and date.
    async fn lock_capacity(&mut self, key: &ScheduleKey) -> Result<Option<i32>, StoreError>;

    /// Return the visitor with the same national id, creating it if absent.
    async fn find_or_create_visitor(&mut self, visitor: &NewVisitor)
        -> Result<VisitorId, StoreError>;

    /// Fails with [`StoreError::UniqueViolation`] if the visitor already holds
    /// a booking for the same time slot and date.
    async fn insert_booking(
        &mut self,
        visitor_id: VisitorId,
        key: &ScheduleKey,
    ) -> Result<BookingId, StoreError>;

    /// Subtract one place from the row, only if it has one left.
    ///
    /// Returns `false` when no row was changed.
    async fn decrement_capacity(&mut self, key: &ScheduleKey) -> Result<bool, StoreError>;

    async fn commit(self) -> Result<(), StoreError>;
}

use std::sync::Arc;

use async_trait::async_trait;
use time::Date;

use crate::domain::{
    calendar::{parse_visit_date, ParkCalendar},
    models::{BookingReceipt, BookingRequest, ScheduleKey},
    ports::{
        inbound::BookingService,
        outbound::{BookingStore, BookingTransaction, StoreError},
    },
    BookingError,
};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Implementation of the BookingService inbound port.
///
/// Checks run in a fixed order and stop at the first failure:
/// date and closed weekday, terms, non-empty visitor list, activity, time
/// slot, capacity row, remaining capacity, clothing sizes, visitor fields.
/// Everything from the activity lookup onwards happens inside one store
/// transaction that holds the capacity row locked until it commits or rolls
/// back.
pub struct BookingServiceImpl<S> {
    store: Arc<S>,
    calendar: ParkCalendar,
    max_attempts: u32,
}

impl<S> BookingServiceImpl<S> {
    pub fn new(store: Arc<S>, calendar: ParkCalendar) -> Self {
        Self {
            store,
            calendar,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Bound on how many times a transaction aborted by the store is run.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }
}

/// Outcome of one transaction attempt that did not commit.
enum AttemptError {
    Rejected(BookingError),
    Retryable(String),
}

impl From<BookingError> for AttemptError {
    fn from(err: BookingError) -> Self {
        Self::Rejected(err)
    }
}

fn store_failure(err: StoreError) -> AttemptError {
    match err {
        StoreError::Retryable(reason) => AttemptError::Retryable(reason),
        other => AttemptError::Rejected(BookingError::internal(other.to_string())),
    }
}

impl<S: BookingStore> BookingServiceImpl<S> {
    /// Checks that need no stored state. Returns the parsed visit date.
    fn check_request(&self, request: &BookingRequest) -> Result<Date, BookingError> {
        let date = parse_visit_date(&request.date)
            .ok_or_else(|| BookingError::InvalidDate(request.date.clone()))?;

        if !self.calendar.is_open(date) {
            return Err(BookingError::ParkClosed {
                date,
                weekday: date.weekday(),
            });
        }

        if !request.accepts_terms {
            return Err(BookingError::TermsNotAccepted);
        }

        if request.visitors.is_empty() {
            return Err(BookingError::InvalidVisitor(
                "at least one visitor is required".to_string(),
            ));
        }

        Ok(date)
    }

    async fn attempt(
        &self,
        request: &BookingRequest,
        key: ScheduleKey,
    ) -> Result<BookingReceipt, AttemptError> {
        let mut tx = self.store.begin().await.map_err(store_failure)?;

        let activity = tx
            .find_activity(key.activity_id)
            .await
            .map_err(store_failure)?
            .ok_or(BookingError::ActivityNotFound(key.activity_id))?;

        if !tx
            .time_slot_exists(key.time_slot_id)
            .await
            .map_err(store_failure)?
        {
            return Err(BookingError::TimeSlotNotFound(key.time_slot_id).into());
        }

        let remaining = tx
            .lock_capacity(&key)
            .await
            .map_err(store_failure)?
            .ok_or(BookingError::ScheduleUnavailable {
                activity_id: key.activity_id,
                time_slot_id: key.time_slot_id,
                date: key.date,
            })?;

        let requested = request.visitors.len();
        let wanted = i32::try_from(requested).unwrap_or(i32::MAX);
        if remaining < wanted {
            return Err(BookingError::CapacityExhausted {
                requested,
                remaining,
            }
            .into());
        }

        if activity.requires_size {
            if let Some(visitor) = request.visitors.iter().find(|v| v.size().is_none()) {
                return Err(BookingError::SizeRequired(visitor.national_id.clone()).into());
            }
        }

        for visitor in &request.visitors {
            visitor.validate().map_err(BookingError::InvalidVisitor)?;
        }

        let mut booking_ids = Vec::with_capacity(requested);
        for visitor in &request.visitors {
            let visitor_id = tx
                .find_or_create_visitor(visitor)
                .await
                .map_err(store_failure)?;

            let booking_id = tx
                .insert_booking(visitor_id, &key)
                .await
                .map_err(|err| match err {
                    StoreError::UniqueViolation(_) => AttemptError::Rejected(
                        BookingError::DuplicateBooking(visitor.national_id.clone()),
                    ),
                    other => store_failure(other),
                })?;

            // The row is locked, so this only fails if another writer bypassed the lock.
            if !tx.decrement_capacity(&key).await.map_err(store_failure)? {
                return Err(BookingError::CapacityExhausted {
                    requested,
                    remaining: 0,
                }
                .into());
            }

            booking_ids.push(booking_id);
        }

        tx.commit().await.map_err(store_failure)?;

        Ok(BookingReceipt {
            booking_ids,
            remaining_capacity: remaining - wanted,
        })
    }
}

#[async_trait]
impl<S: BookingStore> BookingService for BookingServiceImpl<S> {
    async fn book_visitors(&self, request: &BookingRequest) -> Result<BookingReceipt, BookingError> {
        let date = self.check_request(request).inspect_err(|e| {
            tracing::warn!("booking rejected: {}", e);
        })?;
        let key = ScheduleKey::new(request.activity_id, request.time_slot_id, date);

        let mut attempt = 1;
        loop {
            match self.attempt(request, key).await {
                Ok(receipt) => {
                    tracing::info!(
                        activity_id = %key.activity_id,
                        time_slot_id = %key.time_slot_id,
                        %date,
                        visitors = receipt.booking_ids.len(),
                        remaining = receipt.remaining_capacity,
                        "booking confirmed"
                    );
                    return Ok(receipt);
                }
                Err(AttemptError::Rejected(err @ BookingError::Internal(_))) => {
                    tracing::error!("booking failed: {}", err);
                    return Err(err);
                }
                Err(AttemptError::Rejected(err)) => {
                    tracing::warn!("booking rejected: {}", err);
                    return Err(err);
                }
                Err(AttemptError::Retryable(reason)) if attempt < self.max_attempts => {
                    tracing::warn!(attempt, "booking transaction aborted, retrying: {}", reason);
                    attempt += 1;
                }
                Err(AttemptError::Retryable(reason)) => {
                    tracing::error!(attempt, "booking transaction aborted, giving up: {}", reason);
                    return Err(BookingError::internal(format!(
                        "booking aborted after {attempt} attempts: {reason}"
                    )));
                }
            }
        }
    }
}

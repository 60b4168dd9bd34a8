//! PostgreSQL implementation of the booking transaction port.
//!
//! Each booking runs in one database transaction. The capacity row is read
//! with `FOR UPDATE`, so a second booking of the same row waits until the
//! first commits or rolls back.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::{
    models::{
        Activity, ActivityId, BookingId, NewVisitor, ScheduleKey, TimeSlotId, VisitorId,
    },
    ports::outbound::{BookingStore, BookingTransaction, StoreError},
};
use crate::repositories::{BookingRepo, DatabaseScheduleKey, NewDatabaseVisitor};

#[derive(Clone)]
pub struct PostgresBookingStore {
    pool: PgPool,
}

impl PostgresBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for PostgresBookingStore {
    type Tx = PostgresBookingTransaction;

    async fn begin(&self) -> Result<Self::Tx, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(PostgresBookingTransaction { tx })
    }
}

/// Rolled back by sqlx when dropped uncommitted.
pub struct PostgresBookingTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl BookingTransaction for PostgresBookingTransaction {
    async fn find_activity(
        &mut self,
        activity_id: ActivityId,
    ) -> Result<Option<Activity>, StoreError> {
        let activity = BookingRepo::find_activity(&mut self.tx, activity_id.as_i32()).await?;
        Ok(activity.map(Activity::from))
    }

    async fn time_slot_exists(&mut self, time_slot_id: TimeSlotId) -> Result<bool, StoreError> {
        Ok(BookingRepo::time_slot_exists(&mut self.tx, time_slot_id.as_i32()).await?)
    }

    async fn lock_capacity(&mut self, key: &ScheduleKey) -> Result<Option<i32>, StoreError> {
        Ok(BookingRepo::lock_capacity(&mut self.tx, &db_key(key)).await?)
    }

    async fn find_or_create_visitor(
        &mut self,
        visitor: &NewVisitor,
    ) -> Result<VisitorId, StoreError> {
        let national_id = visitor.national_id.as_str();

        if let Some(id) = BookingRepo::find_visitor_id(&mut self.tx, national_id).await? {
            return Ok(VisitorId::new(id));
        }

        let new_visitor = NewDatabaseVisitor {
            national_id,
            name: visitor.name.trim(),
            age: visitor.age,
            size: visitor.size(),
        };
        if let Some(id) = BookingRepo::insert_visitor(&mut self.tx, &new_visitor).await? {
            return Ok(VisitorId::new(id));
        }

        // Created by a concurrent transaction that has since committed.
        BookingRepo::find_visitor_id(&mut self.tx, national_id)
            .await?
            .map(VisitorId::new)
            .ok_or_else(|| StoreError::Retryable(format!("visitor {national_id} vanished")))
    }

    async fn insert_booking(
        &mut self,
        visitor_id: VisitorId,
        key: &ScheduleKey,
    ) -> Result<BookingId, StoreError> {
        let id = BookingRepo::insert_booking(&mut self.tx, visitor_id.as_i32(), &db_key(key)).await?;
        Ok(BookingId::new(id))
    }

    async fn decrement_capacity(&mut self, key: &ScheduleKey) -> Result<bool, StoreError> {
        Ok(BookingRepo::decrement_capacity(&mut self.tx, &db_key(key)).await?)
    }

    async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }
}

fn db_key(key: &ScheduleKey) -> DatabaseScheduleKey {
    DatabaseScheduleKey {
        activity_id: key.activity_id.as_i32(),
        time_slot_id: key.time_slot_id.as_i32(),
        visit_date: key.date,
    }
}

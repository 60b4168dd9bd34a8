use std::sync::Arc;

use sqlx::PgPool;
use time::{
    macros::{date, time},
    Date, Time,
};

use super::*;
use crate::{
    domain::{
        calendar::ParkCalendar,
        models::{
            ActivityId, BookingRequest, CapacityRow, NewActivity, NewVisitor, ScheduleKey,
            TimeSlotId,
        },
        ports::{
            inbound::BookingService,
            outbound::{BookingStore, BookingTransaction, CatalogRepository, SeedRepository},
        },
        services::BookingServiceImpl,
        BookingError,
    },
    repositories::{ActivityRepositoryImpl, BookingRepo, DatabaseScheduleKey},
};

const VISIT_DATE: Date = date!(2025 - 10 - 15);

fn catalog(pool: &PgPool) -> PostgresCatalogAdapter {
    PostgresCatalogAdapter::new(Arc::new(ActivityRepositoryImpl::new(pool.clone())))
}

fn booking_service(pool: &PgPool) -> BookingServiceImpl<PostgresBookingStore> {
    BookingServiceImpl::new(
        Arc::new(PostgresBookingStore::new(pool.clone())),
        ParkCalendar::default(),
    )
}

async fn add_offering(
    pool: &PgPool,
    name: &str,
    at: Time,
    capacity: i32,
) -> (ActivityId, TimeSlotId) {
    let catalog = catalog(pool);
    let activity_id = catalog
        .ensure_activity(&NewActivity::new(name, false))
        .await
        .unwrap();
    let time_slot_id = catalog.ensure_time_slot(at).await.unwrap();
    catalog
        .insert_capacity_rows(&[CapacityRow {
            key: ScheduleKey::new(activity_id, time_slot_id, VISIT_DATE),
            capacity,
        }])
        .await
        .unwrap();
    (activity_id, time_slot_id)
}

fn request(
    activity_id: ActivityId,
    time_slot_id: TimeSlotId,
    visitors: Vec<NewVisitor>,
) -> BookingRequest {
    BookingRequest {
        activity_id,
        time_slot_id,
        date: "2025-10-15".to_string(),
        visitors,
        accepts_terms: true,
    }
}

fn visitor(national_id: &str) -> NewVisitor {
    NewVisitor::new(format!("Visitor {national_id}"), national_id, 30)
}

async fn remaining(pool: &PgPool, activity_id: ActivityId, time_slot_id: TimeSlotId) -> i32 {
    sqlx::query_scalar(
        "SELECT capacity FROM capacity_slots WHERE activity_id = $1 AND time_slot_id = $2 AND visit_date = $3",
    )
    .bind(activity_id.as_i32())
    .bind(time_slot_id.as_i32())
    .bind(VISIT_DATE)
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn concurrent_bookings_never_oversell(pool: PgPool) {
    const CAPACITY: i32 = 3;
    const REQUESTS: usize = 8;

    let (activity_id, time_slot_id) = add_offering(&pool, "Safari", time!(10:00), CAPACITY).await;
    let service = Arc::new(booking_service(&pool));

    let handles: Vec<_> = (0..REQUESTS)
        .map(|i| {
            let service = Arc::clone(&service);
            let request = request(activity_id, time_slot_id, vec![visitor(&format!("v-{i}"))]);
            tokio::spawn(async move { service.book_visitors(&request).await })
        })
        .collect();

    let results: Vec<_> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let exhausted = results
        .iter()
        .filter(|r| matches!(r, Err(BookingError::CapacityExhausted { .. })))
        .count();

    assert_eq!(successes, CAPACITY as usize);
    assert_eq!(exhausted, REQUESTS - CAPACITY as usize);
    assert_eq!(remaining(&pool, activity_id, time_slot_id).await, 0);
    assert_eq!(count(&pool, "bookings").await, i64::from(CAPACITY));
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_booking_across_activities_rolls_back_the_request(pool: PgPool) {
    let (safari, ten) = add_offering(&pool, "Safari", time!(10:00), 6).await;
    let (gardening, _) = add_offering(&pool, "Jardinería", time!(10:00), 6).await;
    let service = booking_service(&pool);

    service
        .book_visitors(&request(safari, ten, vec![visitor("A")]))
        .await
        .unwrap();

    let err = service
        .book_visitors(&request(gardening, ten, vec![visitor("B"), visitor("A")]))
        .await
        .unwrap_err();

    assert!(matches!(err, BookingError::DuplicateBooking(ref id) if id.as_str() == "A"));
    assert_eq!(remaining(&pool, gardening, ten).await, 6);
    assert_eq!(remaining(&pool, safari, ten).await, 5);
    assert_eq!(count(&pool, "visitors").await, 1);
    assert_eq!(count(&pool, "bookings").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn returning_visitor_is_not_duplicated(pool: PgPool) {
    let (safari, ten) = add_offering(&pool, "Safari", time!(10:00), 6).await;
    let (_, eleven) = add_offering(&pool, "Safari", time!(11:00), 6).await;
    let service = booking_service(&pool);

    service
        .book_visitors(&request(safari, ten, vec![visitor("12345678")]))
        .await
        .unwrap();
    let receipt = service
        .book_visitors(&request(safari, eleven, vec![visitor("12345678")]))
        .await
        .unwrap();

    assert_eq!(receipt.remaining_capacity, 5);
    assert_eq!(count(&pool, "visitors").await, 1);
    assert_eq!(count(&pool, "bookings").await, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn decrement_never_goes_below_zero(pool: PgPool) {
    let (activity_id, time_slot_id) = add_offering(&pool, "Safari", time!(10:00), 1).await;
    let key = ScheduleKey::new(activity_id, time_slot_id, VISIT_DATE);
    let store = PostgresBookingStore::new(pool.clone());

    let mut tx = store.begin().await.unwrap();
    assert_eq!(tx.lock_capacity(&key).await.unwrap(), Some(1));
    assert!(tx.decrement_capacity(&key).await.unwrap());
    assert!(!tx.decrement_capacity(&key).await.unwrap());
    tx.commit().await.unwrap();

    assert_eq!(remaining(&pool, activity_id, time_slot_id).await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn concurrent_update_is_reported_as_retryable(pool: PgPool) {
    let (activity_id, time_slot_id) = add_offering(&pool, "Safari", time!(10:00), 5).await;
    let key = DatabaseScheduleKey {
        activity_id: activity_id.as_i32(),
        time_slot_id: time_slot_id.as_i32(),
        visit_date: VISIT_DATE,
    };

    let mut stale = pool.begin().await.unwrap();
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
        .execute(&mut *stale)
        .await
        .unwrap();
    // Plain read: takes the snapshot without locking the row.
    sqlx::query("SELECT capacity FROM capacity_slots")
        .fetch_all(&mut *stale)
        .await
        .unwrap();

    let mut other = pool.acquire().await.unwrap();
    assert!(BookingRepo::decrement_capacity(&mut other, &key).await.unwrap());

    let err = BookingRepo::decrement_capacity(&mut stale, &key)
        .await
        .unwrap_err();
    assert!(err.is_retryable());
    assert!(matches!(StoreError::from(err), StoreError::Retryable(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn summaries_aggregate_capacity_rows(pool: PgPool) {
    let (safari, _) = add_offering(&pool, "Safari", time!(10:00), 8).await;
    add_offering(&pool, "Safari", time!(9:30), 5).await;
    let catalog = catalog(&pool);
    let gardening = catalog
        .ensure_activity(&NewActivity::new("Jardinería", false))
        .await
        .unwrap();

    let summaries = catalog.activity_summaries().await.unwrap();

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].activity.id, safari);
    assert_eq!(summaries[0].total_capacity, 13);
    assert_eq!(summaries[0].schedule_count, 2);
    assert_eq!(summaries[1].activity.id, gardening);
    assert_eq!(summaries[1].total_capacity, 0);
    assert_eq!(summaries[1].schedule_count, 0);

    let schedule = catalog.activity_schedule(safari).await.unwrap();
    let times: Vec<_> = schedule.iter().map(|e| e.time_slot.starts_at).collect();
    assert_eq!(times, vec![time!(9:30), time!(10:00)]);
}

#[sqlx::test(migrations = "./migrations")]
async fn seed_writes_are_idempotent(pool: PgPool) {
    let catalog = catalog(&pool);
    let safari = NewActivity::new("Safari", false);

    let first = catalog.ensure_activity(&safari).await.unwrap();
    let nine = catalog.ensure_time_slot(time!(9:00)).await.unwrap();
    assert_eq!(catalog.ensure_activity(&safari).await.unwrap(), first);
    assert_eq!(catalog.ensure_time_slot(time!(9:00)).await.unwrap(), nine);

    let rows = [
        CapacityRow {
            key: ScheduleKey::new(first, nine, VISIT_DATE),
            capacity: 8,
        },
        CapacityRow {
            key: ScheduleKey::new(first, nine, date!(2025 - 10 - 16)),
            capacity: 8,
        },
    ];
    assert_eq!(catalog.insert_capacity_rows(&rows).await.unwrap(), 2);
    assert_eq!(catalog.insert_capacity_rows(&rows).await.unwrap(), 0);
    assert_eq!(count(&pool, "capacity_slots").await, 2);
}

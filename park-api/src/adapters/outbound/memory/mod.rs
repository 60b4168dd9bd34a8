//! In-memory implementation of the store ports.
//!
//! A transaction takes the store-wide lock and works on a copy of the state;
//! commit swaps the copy in, dropping the transaction discards it. Bookings
//! are therefore fully serialized, which is what a single-process store needs.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use time::Time;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{
    models::{
        Activity, ActivityId, ActivitySummary, BookingId, CapacityRow, NewActivity, NewVisitor,
        ScheduleEntry, ScheduleKey, TimeSlot, TimeSlotId, Visitor, VisitorId,
    },
    ports::outbound::{
        BookingStore, BookingTransaction, CatalogRepository, SeedRepository, StoreError,
    },
};

#[derive(Debug, Clone)]
struct BookingRecord {
    visitor_id: VisitorId,
    key: ScheduleKey,
}

/// Last id handed out per table; each starts at 1 like a SERIAL column.
#[derive(Debug, Clone, Copy, Default)]
struct Sequences {
    activities: i32,
    time_slots: i32,
    visitors: i32,
    bookings: i32,
}

fn next_id(sequence: &mut i32) -> i32 {
    *sequence += 1;
    *sequence
}

#[derive(Debug, Clone, Default)]
struct ParkState {
    activities: BTreeMap<ActivityId, Activity>,
    time_slots: BTreeMap<TimeSlotId, TimeSlot>,
    capacity: BTreeMap<ScheduleKey, i32>,
    visitors: Vec<Visitor>,
    bookings: BTreeMap<BookingId, BookingRecord>,
    sequences: Sequences,
}

/// Shared handle to an in-memory park; clones see the same data.
#[derive(Clone, Default)]
pub struct InMemoryParkStore {
    state: Arc<Mutex<ParkState>>,
}

impl InMemoryParkStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn remaining_capacity(&self, key: &ScheduleKey) -> Option<i32> {
        self.state.lock().await.capacity.get(key).copied()
    }

    #[cfg(test)]
    pub async fn visitor_count(&self) -> usize {
        self.state.lock().await.visitors.len()
    }

    #[cfg(test)]
    pub async fn booking_count(&self) -> usize {
        self.state.lock().await.bookings.len()
    }
}

pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<ParkState>,
    working: ParkState,
}

#[async_trait]
impl BookingStore for InMemoryParkStore {
    type Tx = InMemoryTransaction;

    async fn begin(&self) -> Result<Self::Tx, StoreError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Ok(InMemoryTransaction { guard, working })
    }
}

#[async_trait]
impl BookingTransaction for InMemoryTransaction {
    async fn find_activity(
        &mut self,
        activity_id: ActivityId,
    ) -> Result<Option<Activity>, StoreError> {
        Ok(self.working.activities.get(&activity_id).cloned())
    }

    async fn time_slot_exists(&mut self, time_slot_id: TimeSlotId) -> Result<bool, StoreError> {
        Ok(self.working.time_slots.contains_key(&time_slot_id))
    }

    async fn lock_capacity(&mut self, key: &ScheduleKey) -> Result<Option<i32>, StoreError> {
        // The whole store is already held by this transaction.
        Ok(self.working.capacity.get(key).copied())
    }

    async fn find_or_create_visitor(
        &mut self,
        visitor: &NewVisitor,
    ) -> Result<VisitorId, StoreError> {
        if let Some(existing) = self
            .working
            .visitors
            .iter()
            .find(|v| v.national_id == visitor.national_id)
        {
            return Ok(existing.id);
        }

        let id = VisitorId::new(next_id(&mut self.working.sequences.visitors));
        self.working.visitors.push(Visitor {
            id,
            name: visitor.name.trim().to_string(),
            national_id: visitor.national_id.clone(),
            age: visitor.age,
            size: visitor.size().map(str::to_string),
        });
        Ok(id)
    }

    async fn insert_booking(
        &mut self,
        visitor_id: VisitorId,
        key: &ScheduleKey,
    ) -> Result<BookingId, StoreError> {
        let taken = self.working.bookings.values().any(|booking| {
            booking.visitor_id == visitor_id
                && booking.key.time_slot_id == key.time_slot_id
                && booking.key.date == key.date
        });
        if taken {
            return Err(StoreError::UniqueViolation(format!(
                "visitor {visitor_id} already booked at slot {} on {}",
                key.time_slot_id, key.date
            )));
        }

        let id = BookingId::new(next_id(&mut self.working.sequences.bookings));
        self.working.bookings.insert(
            id,
            BookingRecord {
                visitor_id,
                key: *key,
            },
        );
        Ok(id)
    }

    async fn decrement_capacity(&mut self, key: &ScheduleKey) -> Result<bool, StoreError> {
        match self.working.capacity.get_mut(key) {
            Some(capacity) if *capacity > 0 => {
                *capacity -= 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn commit(self) -> Result<(), StoreError> {
        let Self { mut guard, working } = self;
        *guard = working;
        Ok(())
    }
}

#[async_trait]
impl CatalogRepository for InMemoryParkStore {
    async fn activity_summaries(&self) -> Result<Vec<ActivitySummary>, StoreError> {
        let state = self.state.lock().await;

        let summaries = state
            .activities
            .values()
            .map(|activity| {
                let rows = state
                    .capacity
                    .iter()
                    .filter(|(key, _)| key.activity_id == activity.id);
                let (total_capacity, schedule_count) = rows
                    .fold((0i64, 0i64), |(total, count), (_, capacity)| {
                        (total + i64::from(*capacity), count + 1)
                    });
                ActivitySummary {
                    activity: activity.clone(),
                    total_capacity,
                    schedule_count,
                }
            })
            .collect();

        Ok(summaries)
    }

    async fn find_activity(&self, activity_id: ActivityId) -> Result<Option<Activity>, StoreError> {
        Ok(self.state.lock().await.activities.get(&activity_id).cloned())
    }

    async fn activity_schedule(
        &self,
        activity_id: ActivityId,
    ) -> Result<Vec<ScheduleEntry>, StoreError> {
        let state = self.state.lock().await;

        let mut schedule: Vec<ScheduleEntry> = state
            .capacity
            .iter()
            .filter(|(key, _)| key.activity_id == activity_id)
            .filter_map(|(key, capacity)| {
                state.time_slots.get(&key.time_slot_id).map(|slot| ScheduleEntry {
                    time_slot: *slot,
                    date: key.date,
                    remaining_capacity: *capacity,
                })
            })
            .collect();
        schedule.sort_by_key(|entry| (entry.date, entry.time_slot.starts_at));

        Ok(schedule)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl SeedRepository for InMemoryParkStore {
    async fn ensure_activity(&self, activity: &NewActivity) -> Result<ActivityId, StoreError> {
        let mut state = self.state.lock().await;

        if let Some(existing) = state.activities.values().find(|a| a.name == activity.name) {
            return Ok(existing.id);
        }

        let id = ActivityId::new(next_id(&mut state.sequences.activities));
        state.activities.insert(
            id,
            Activity {
                id,
                name: activity.name.clone(),
                requires_size: activity.requires_size,
                description: activity.description.clone(),
                terms: activity.terms.clone(),
            },
        );
        Ok(id)
    }

    async fn ensure_time_slot(&self, starts_at: Time) -> Result<TimeSlotId, StoreError> {
        let mut state = self.state.lock().await;

        if let Some(existing) = state.time_slots.values().find(|s| s.starts_at == starts_at) {
            return Ok(existing.id);
        }

        let id = TimeSlotId::new(next_id(&mut state.sequences.time_slots));
        state.time_slots.insert(id, TimeSlot { id, starts_at });
        Ok(id)
    }

    async fn insert_capacity_rows(&self, rows: &[CapacityRow]) -> Result<u64, StoreError> {
        let mut state = self.state.lock().await;

        for row in rows {
            if !state.activities.contains_key(&row.key.activity_id)
                || !state.time_slots.contains_key(&row.key.time_slot_id)
            {
                return Err(StoreError::Backend(format!(
                    "capacity row references unknown activity {} or time slot {}",
                    row.key.activity_id, row.key.time_slot_id
                )));
            }
            if row.capacity < 0 {
                return Err(StoreError::Backend(format!(
                    "negative capacity {} for activity {}",
                    row.capacity, row.key.activity_id
                )));
            }
        }

        let mut inserted = 0;
        for row in rows {
            if !state.capacity.contains_key(&row.key) {
                state.capacity.insert(row.key, row.capacity);
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}

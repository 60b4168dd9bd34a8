//! Installs the park's fixed catalog and generates capacity rows.

use std::sync::Arc;

use itertools::iproduct;
use time::{macros::time, Date, Duration, Time};

use crate::domain::{
    calendar::ParkCalendar,
    models::{ActivityId, CapacityRow, NewActivity, ScheduleKey, TimeSlotId},
    ports::outbound::{SeedRepository, StoreError},
    SeedError,
};

const PARK_TERMS: &str = "Taking part in the activity implies following the park rules. \
Comfortable clothing and footwear suited to the activity are recommended. \
The organisers are not responsible for lost items or minor personal damage. \
In case of adverse weather the activity may be rescheduled or cancelled. \
By accepting, you authorise the use of images in the park's promotional material.";

/// One catalog activity and the capacity each of its sessions starts with.
#[derive(Debug, Clone)]
pub struct SeedActivity {
    pub activity: NewActivity,
    pub capacity: i32,
}

/// Reference data to install: activities and the daily time-slot ladder.
#[derive(Debug, Clone)]
pub struct SeedPlan {
    pub activities: Vec<SeedActivity>,
    pub time_slots: Vec<Time>,
}

impl SeedPlan {
    /// The park's catalog: four activities, sessions every half hour from
    /// 09:00 to 17:30.
    pub fn park_default() -> Self {
        let activity = |name: &str, requires_size: bool, description: &str, capacity: i32| {
            SeedActivity {
                activity: NewActivity::new(name, requires_size)
                    .with_description(description)
                    .with_terms(PARK_TERMS),
                capacity,
            }
        };

        Self {
            activities: vec![
                activity(
                    "Tirolesa",
                    true,
                    "Fly over the park on our zip line and enjoy the views. One hour, including instruction, certified equipment and supervision.",
                    10,
                ),
                activity(
                    "Safari",
                    false,
                    "Discover the park's wildlife on a two hour guided safari with an expert guide.",
                    8,
                ),
                activity(
                    "Palestra",
                    true,
                    "Climb our wall and take on its challenges for an hour and a half. Equipment and instructors included.",
                    10,
                ),
                activity(
                    "Jardinería",
                    false,
                    "Join a two hour gardening session and learn growing tricks at nature's pace.",
                    12,
                ),
            ],
            time_slots: half_hour_ladder(time!(9:00), time!(17:30)),
        }
    }
}

/// Times from `first` to `last` inclusive, 30 minutes apart.
pub fn half_hour_ladder(first: Time, last: Time) -> Vec<Time> {
    let mut slots = Vec::new();
    let mut current = first;
    while current <= last {
        slots.push(current);
        let next = current + Duration::minutes(30);
        // Time wraps at midnight
        if next <= current {
            break;
        }
        current = next;
    }
    slots
}

/// What a seeding run wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub activities: usize,
    pub time_slots: usize,
    pub open_days: usize,
    /// Rows inserted by this run; rows that already existed are not counted.
    pub capacity_rows: u64,
}

pub struct CatalogSeeder<R> {
    repository: Arc<R>,
    calendar: ParkCalendar,
}

fn store_error(err: StoreError) -> SeedError {
    SeedError::Store(err.to_string())
}

impl<R: SeedRepository> CatalogSeeder<R> {
    pub fn new(repository: Arc<R>, calendar: ParkCalendar) -> Self {
        Self {
            repository,
            calendar,
        }
    }

    /// Install the plan's catalog and a capacity row for every activity and
    /// slot on every open day from `start` to `end` inclusive.
    pub async fn seed(&self, plan: &SeedPlan, start: Date, end: Date) -> Result<SeedReport, SeedError> {
        if end < start {
            return Err(SeedError::InvalidRange { start, end });
        }

        let mut activities: Vec<(ActivityId, i32)> = Vec::with_capacity(plan.activities.len());
        for seed in &plan.activities {
            let id = self
                .repository
                .ensure_activity(&seed.activity)
                .await
                .map_err(store_error)?;
            activities.push((id, seed.capacity));
        }

        let mut time_slots: Vec<TimeSlotId> = Vec::with_capacity(plan.time_slots.len());
        for starts_at in &plan.time_slots {
            let id = self
                .repository
                .ensure_time_slot(*starts_at)
                .await
                .map_err(store_error)?;
            time_slots.push(id);
        }

        let mut open_days = 0;
        let mut capacity_rows = 0;
        let mut day = Some(start);
        while let Some(date) = day.filter(|date| *date <= end) {
            if self.calendar.is_open(date) {
                let rows: Vec<CapacityRow> = iproduct!(&activities, &time_slots)
                    .map(|(&(activity_id, capacity), &time_slot_id)| CapacityRow {
                        key: ScheduleKey::new(activity_id, time_slot_id, date),
                        capacity,
                    })
                    .collect();
                capacity_rows += self
                    .repository
                    .insert_capacity_rows(&rows)
                    .await
                    .map_err(store_error)?;
                open_days += 1;
            }
            day = date.next_day();
        }

        let report = SeedReport {
            activities: activities.len(),
            time_slots: time_slots.len(),
            open_days,
            capacity_rows,
        };
        tracing::info!(
            %start,
            %end,
            activities = report.activities,
            time_slots = report.time_slots,
            open_days = report.open_days,
            capacity_rows = report.capacity_rows,
            "catalog seeded"
        );

        Ok(report)
    }
}

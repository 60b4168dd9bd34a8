use time::{Date, Time};

use super::{ActivityId, TimeSlotId};

/// A bookable time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub id: TimeSlotId,
    pub starts_at: Time,
}

/// Identifies one capacity row: an activity at a time slot on a concrete date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleKey {
    pub activity_id: ActivityId,
    pub time_slot_id: TimeSlotId,
    pub date: Date,
}

impl ScheduleKey {
    pub fn new(activity_id: ActivityId, time_slot_id: TimeSlotId, date: Date) -> Self {
        Self {
            activity_id,
            time_slot_id,
            date,
        }
    }
}

/// Remaining capacity for an activity at one time slot on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub time_slot: TimeSlot,
    pub date: Date,
    pub remaining_capacity: i32,
}

/// A capacity row to be inserted by the seeding routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityRow {
    pub key: ScheduleKey,
    pub capacity: i32,
}

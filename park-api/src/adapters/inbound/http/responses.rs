//! HTTP response types for the catalog and booking endpoints.
//!
//! These types serialize to the JSON format expected by the frontend.

use serde::Serialize;
use time::{macros::format_description, Time};

use crate::domain::{
    calendar::format_visit_date,
    models::{
        Activity, ActivityDetail, ActivityId, ActivitySummary, BookingId, BookingReceipt,
        ScheduleEntry, TimeSlotId,
    },
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    pub id: ActivityId,
    pub name: String,
    pub requires_size: bool,
    pub description: Option<String>,
    pub terms: Option<String>,
}

impl From<Activity> for ActivityResponse {
    fn from(activity: Activity) -> Self {
        Self {
            id: activity.id,
            name: activity.name,
            requires_size: activity.requires_size,
            description: activity.description,
            terms: activity.terms,
        }
    }
}

/// One entry of the activity listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummaryResponse {
    #[serde(flatten)]
    pub activity: ActivityResponse,
    /// Remaining places summed over every date and time slot.
    pub total_capacity: i64,
    pub schedule_count: i64,
}

impl From<ActivitySummary> for ActivitySummaryResponse {
    fn from(summary: ActivitySummary) -> Self {
        Self {
            activity: summary.activity.into(),
            total_capacity: summary.total_capacity,
            schedule_count: summary.schedule_count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityListResponse {
    pub activities: Vec<ActivitySummaryResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntryResponse {
    pub time_slot_id: TimeSlotId,
    /// Time of day, `HH:MM`.
    pub starts_at: String,
    /// Visit date, `YYYY-MM-DD`.
    pub date: String,
    pub remaining_capacity: i32,
}

impl From<ScheduleEntry> for ScheduleEntryResponse {
    fn from(entry: ScheduleEntry) -> Self {
        Self {
            time_slot_id: entry.time_slot.id,
            starts_at: format_time_of_day(entry.time_slot.starts_at),
            date: format_visit_date(entry.date),
            remaining_capacity: entry.remaining_capacity,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDetailResponse {
    pub activity: ActivityResponse,
    pub schedule: Vec<ScheduleEntryResponse>,
}

impl From<ActivityDetail> for ActivityDetailResponse {
    fn from(detail: ActivityDetail) -> Self {
        Self {
            activity: detail.activity.into(),
            schedule: detail.schedule.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingReceiptResponse {
    pub message: &'static str,
    pub booking_ids: Vec<BookingId>,
    pub remaining_capacity: i32,
}

impl From<BookingReceipt> for BookingReceiptResponse {
    fn from(receipt: BookingReceipt) -> Self {
        Self {
            message: BookingReceipt::CONFIRMATION,
            booking_ids: receipt.booking_ids,
            remaining_capacity: receipt.remaining_capacity,
        }
    }
}

fn format_time_of_day(time: Time) -> String {
    time.format(format_description!("[hour]:[minute]"))
        .unwrap_or_else(|_| time.to_string())
}

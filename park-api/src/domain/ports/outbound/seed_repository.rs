//! Reference data installation port (outbound).

use async_trait::async_trait;
use time::Time;

use crate::domain::models::{ActivityId, CapacityRow, NewActivity, TimeSlotId};

use super::StoreError;

/// Writes the park's fixed catalog and its capacity rows.
///
/// Every operation is idempotent: existing rows are returned or skipped,
/// never overwritten.
#[async_trait]
pub trait SeedRepository: Send + Sync + 'static {
    /// Insert the activity unless one with the same name exists; returns its id.
    async fn ensure_activity(&self, activity: &NewActivity) -> Result<ActivityId, StoreError>;

    /// Insert the time slot unless it exists; returns its id.
    async fn ensure_time_slot(&self, starts_at: Time) -> Result<TimeSlotId, StoreError>;

    /// Insert capacity rows whose key is not present yet.
    ///
    /// Returns the number of rows actually inserted.
    async fn insert_capacity_rows(&self, rows: &[CapacityRow]) -> Result<u64, StoreError>;
}

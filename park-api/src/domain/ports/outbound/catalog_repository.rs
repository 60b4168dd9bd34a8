//! Catalog read port (outbound).

use async_trait::async_trait;

use crate::domain::models::{Activity, ActivityId, ActivitySummary, ScheduleEntry};

use super::StoreError;

/// Read-only access to activities and their capacity rows.
#[async_trait]
pub trait CatalogRepository: Send + Sync + 'static {
    /// Every activity with the sum and count of its capacity rows, ordered by id.
    async fn activity_summaries(&self) -> Result<Vec<ActivitySummary>, StoreError>;

    async fn find_activity(&self, activity_id: ActivityId) -> Result<Option<Activity>, StoreError>;

    /// Capacity rows of one activity, ordered by date then time of day.
    async fn activity_schedule(
        &self,
        activity_id: ActivityId,
    ) -> Result<Vec<ScheduleEntry>, StoreError>;

    /// Cheap round trip to check the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

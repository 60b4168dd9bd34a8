//! PostgreSQL implementation of the catalog and seeding ports.

use std::sync::Arc;

use async_trait::async_trait;
use time::Time;

use crate::domain::{
    models::{
        Activity, ActivityId, ActivitySummary, CapacityRow, NewActivity, ScheduleEntry, TimeSlot,
        TimeSlotId,
    },
    ports::outbound::{CatalogRepository, SeedRepository, StoreError},
};
use crate::repositories::{
    ActivityRepository, ActivityRepositoryImpl, DatabaseActivity, DatabaseActivitySummary,
    DatabaseCapacityRow, DatabaseScheduleEntry, NewDatabaseActivity,
};

/// Adapter that serves the catalog ports from PostgreSQL.
pub struct PostgresCatalogAdapter<R = ActivityRepositoryImpl> {
    repo: Arc<R>,
}

impl<R> PostgresCatalogAdapter<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R: ActivityRepository + Send + Sync + 'static> CatalogRepository
    for PostgresCatalogAdapter<R>
{
    async fn activity_summaries(&self) -> Result<Vec<ActivitySummary>, StoreError> {
        let rows = self.repo.list_with_capacity().await?;
        Ok(rows.into_iter().map(db_summary_to_domain).collect())
    }

    async fn find_activity(&self, activity_id: ActivityId) -> Result<Option<Activity>, StoreError> {
        let activity = self.repo.get_activity(activity_id.as_i32()).await?;
        Ok(activity.map(Activity::from))
    }

    async fn activity_schedule(
        &self,
        activity_id: ActivityId,
    ) -> Result<Vec<ScheduleEntry>, StoreError> {
        let rows = self.repo.get_schedule(activity_id.as_i32()).await?;
        Ok(rows.into_iter().map(db_entry_to_domain).collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.repo.ping().await?;
        Ok(())
    }
}

#[async_trait]
impl<R: ActivityRepository + Send + Sync + 'static> SeedRepository for PostgresCatalogAdapter<R> {
    async fn ensure_activity(&self, activity: &NewActivity) -> Result<ActivityId, StoreError> {
        let new_activity = NewDatabaseActivity {
            name: activity.name.clone(),
            requires_size: activity.requires_size,
            description: activity.description.clone(),
            terms: activity.terms.clone(),
        };

        let id = self.repo.ensure_activity(&new_activity).await?;
        Ok(ActivityId::new(id))
    }

    async fn ensure_time_slot(&self, starts_at: Time) -> Result<TimeSlotId, StoreError> {
        let id = self.repo.ensure_time_slot(&starts_at).await?;
        Ok(TimeSlotId::new(id))
    }

    async fn insert_capacity_rows(&self, rows: &[CapacityRow]) -> Result<u64, StoreError> {
        let rows: Vec<DatabaseCapacityRow> = rows
            .iter()
            .map(|row| DatabaseCapacityRow {
                activity_id: row.key.activity_id.as_i32(),
                time_slot_id: row.key.time_slot_id.as_i32(),
                visit_date: row.key.date,
                capacity: row.capacity,
            })
            .collect();

        Ok(self.repo.insert_capacity_rows(&rows).await?)
    }
}

impl From<DatabaseActivity> for Activity {
    fn from(row: DatabaseActivity) -> Self {
        Activity {
            id: ActivityId::new(row.id),
            name: row.name,
            requires_size: row.requires_size,
            description: row.description,
            terms: row.terms,
        }
    }
}

fn db_summary_to_domain(row: DatabaseActivitySummary) -> ActivitySummary {
    ActivitySummary {
        activity: Activity {
            id: ActivityId::new(row.id),
            name: row.name,
            requires_size: row.requires_size,
            description: row.description,
            terms: row.terms,
        },
        total_capacity: row.total_capacity,
        schedule_count: row.schedule_count,
    }
}

fn db_entry_to_domain(row: DatabaseScheduleEntry) -> ScheduleEntry {
    ScheduleEntry {
        time_slot: TimeSlot {
            id: TimeSlotId::new(row.time_slot_id),
            starts_at: row.starts_at,
        },
        date: row.visit_date,
        remaining_capacity: row.capacity,
    }
}

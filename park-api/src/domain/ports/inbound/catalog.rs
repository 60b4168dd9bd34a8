use async_trait::async_trait;

use crate::domain::{
    models::{ActivityDetail, ActivityId, ActivitySummary},
    CatalogError,
};

/// Inbound port for browsing activities and their availability.
#[async_trait]
pub trait CatalogService: Send + Sync + 'static {
    /// List every activity with its aggregated remaining capacity.
    async fn list_activities(&self) -> Result<Vec<ActivitySummary>, CatalogError>;

    /// Get an activity with its per-date, per-slot availability.
    async fn get_activity(&self, activity_id: ActivityId) -> Result<ActivityDetail, CatalogError>;

    /// Whether the backing store answers.
    async fn is_healthy(&self) -> bool;
}

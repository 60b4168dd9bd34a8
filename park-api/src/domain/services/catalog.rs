use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    models::{ActivityDetail, ActivityId, ActivitySummary},
    ports::{
        inbound::CatalogService,
        outbound::{CatalogRepository, StoreError},
    },
    CatalogError,
};

/// Implementation of the CatalogService inbound port.
///
/// Read-only: it aggregates capacity rows but never changes them.
pub struct CatalogServiceImpl<R> {
    repository: Arc<R>,
}

impl<R> CatalogServiceImpl<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

fn store_error(err: StoreError) -> CatalogError {
    CatalogError::Store(err.to_string())
}

#[async_trait]
impl<R: CatalogRepository> CatalogService for CatalogServiceImpl<R> {
    async fn list_activities(&self) -> Result<Vec<ActivitySummary>, CatalogError> {
        self.repository
            .activity_summaries()
            .await
            .map_err(store_error)
    }

    async fn get_activity(&self, activity_id: ActivityId) -> Result<ActivityDetail, CatalogError> {
        let activity = self
            .repository
            .find_activity(activity_id)
            .await
            .map_err(store_error)?
            .ok_or(CatalogError::ActivityNotFound(activity_id))?;

        let schedule = self
            .repository
            .activity_schedule(activity_id)
            .await
            .map_err(store_error)?;

        Ok(ActivityDetail { activity, schedule })
    }

    async fn is_healthy(&self) -> bool {
        match self.repository.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("store health check failed: {}", e);
                false
            }
        }
    }
}

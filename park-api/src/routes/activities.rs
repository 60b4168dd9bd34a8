use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::ApiError;
use crate::{
    adapters::inbound::http::{ActivityDetailResponse, ActivityListResponse},
    app_state::AppState,
    domain::models::ActivityId,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_activities))
        .route("/:activity_id", get(get_activity))
}

#[instrument(name = "list_activities", skip(app_state))]
async fn list_activities(
    State(app_state): State<AppState>,
) -> Result<Json<ActivityListResponse>, ApiError> {
    let activities = app_state.catalog_service.list_activities().await?;

    Ok(Json(ActivityListResponse {
        activities: activities.into_iter().map(Into::into).collect(),
    }))
}

#[instrument(name = "get_activity", skip(app_state))]
async fn get_activity(
    State(app_state): State<AppState>,
    activity_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<ActivityDetailResponse>, ApiError> {
    let Path(activity_id) = activity_id?;
    let detail = app_state
        .catalog_service
        .get_activity(ActivityId::new(activity_id))
        .await?;

    Ok(Json(detail.into()))
}

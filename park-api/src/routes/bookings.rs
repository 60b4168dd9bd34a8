use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::instrument;

use super::ApiError;
use crate::{
    adapters::inbound::http::BookingReceiptResponse, app_state::AppState,
    domain::models::BookingRequest,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_booking))
}

#[instrument(name = "create_booking", skip(app_state, payload))]
async fn create_booking(
    State(app_state): State<AppState>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookingReceiptResponse>), ApiError> {
    let Json(request) = payload?;
    tracing::debug!(
        activity_id = %request.activity_id,
        time_slot_id = %request.time_slot_id,
        date = %request.date,
        visitors = request.visitors.len(),
        "Booking requested"
    );

    let receipt = app_state.booking_service.book_visitors(&request).await?;

    Ok((StatusCode::CREATED, Json(receipt.into())))
}

use axum::{extract::State, http::StatusCode, Json};

use crate::app_state::AppState;
use crate::db::BookingRequest;
use crate::error::AppResult;

/// Book a doctor for a patient. Responds 201 with an empty body.
pub async fn add_booking(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> AppResult<StatusCode> {
    state.bookings.add_booking(request).await?;
    Ok(StatusCode::CREATED)
}

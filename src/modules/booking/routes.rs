use axum::{routing::post, Router};

use super::handlers::add_booking;
use crate::app_state::AppState;

pub fn booking_routes() -> Router<AppState> {
    Router::new().route("/booking", post(add_booking))
}

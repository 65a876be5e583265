use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::db::DatabaseError;
use crate::modules::booking::BookingError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("{0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Validation(message) => AppError::Validation(message),
            BookingError::Persistence(err) => AppError::Database(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Booking rule failures go back to the caller verbatim.
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            other => {
                error!(error = %other, "request failed");

                let body = Json(json!({
                    "error": {
                        "message": "An internal server error occurred",
                    }
                }));

                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

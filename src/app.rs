use std::any::Any;

use axum::{
    extract::State,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tower_http::catch_panic::CatchPanicLayer;

use crate::{
    app_state::AppState, error::AppError, middleware::tracing::observability_middleware,
    modules::booking::routes::booking_routes,
};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", booking_routes())
        .layer(middleware::from_fn(observability_middleware))
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let store_status = match state.store.ping().await {
        Ok(()) => "healthy",
        Err(e) => {
            tracing::info!("Store health check failed: {}", e);
            "unhealthy"
        }
    };

    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();

    Json(json!({
        "status": "ok",
        "timestamp": timestamp,
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.env.app.environment.as_str(),
        "services": {
            "store": store_status,
        }
    }))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    AppError::InternalServerError(details).into_response()
}

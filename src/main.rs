use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use tracing::{info, warn};

mod app;
mod app_state;
mod config;
mod db;
mod error;
mod middleware;
mod modules;
mod telemetry;

use app_state::AppState;
use db::{BookingRepository, BookingStore, InMemoryBookingStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = config::init().context("Failed to load configuration")?;
    let telemetry = telemetry::init_telemetry(&telemetry::TelemetryConfig::from_config(config))?;

    let store: Arc<dyn BookingStore> = match &config.database {
        Some(database) => {
            let pool = db::init_pool(database)
                .await
                .context("Failed to initialize database")?;
            info!("Connected to PostgreSQL and applied migrations");
            Arc::new(BookingRepository::new(pool))
        }
        None => {
            if config.is_production() {
                warn!("DATABASE_URL is not set; bookings will not survive a restart");
            }
            info!(
                patients = config.seed.patient_ids.len(),
                doctors = config.seed.doctor_ids.len(),
                "Using in-memory booking store"
            );
            Arc::new(InMemoryBookingStore::seeded(
                config.seed.patient_ids.iter().copied(),
                config.seed.doctor_ids.iter().copied(),
            ))
        }
    };

    let app = app::create_router(AppState::new(store, config.clone()));

    let addr = config.server_addr();
    info!("{} listening on {}", config.app.name, addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Failed to serve application")?;

    telemetry.shutdown();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

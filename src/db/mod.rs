mod error;
mod models;
mod repositories;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;

pub use error::DatabaseError;
pub use models::*;
pub use repositories::{BookingRepository, BookingStore, InMemoryBookingStore};

/// Initialize the database connection pool and apply pending migrations
pub async fn init_pool(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect(&config.url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

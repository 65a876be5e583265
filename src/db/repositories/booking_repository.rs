use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::{Booking, DatabaseError};

/// Lookups and writes the booking flow needs from persistence.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn patient_exists(&self, patient_id: i64) -> Result<bool, DatabaseError>;

    async fn doctor_exists(&self, doctor_id: i64) -> Result<bool, DatabaseError>;

    /// True if the doctor has any booking at all, whatever its time window.
    async fn doctor_has_any_booking(&self, doctor_id: i64) -> Result<bool, DatabaseError>;

    async fn insert_booking(&self, booking: &Booking) -> Result<(), DatabaseError>;

    /// Cheap round trip used by the health endpoint.
    async fn ping(&self) -> Result<(), DatabaseError>;
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for BookingRepository {
    async fn patient_exists(&self, patient_id: i64) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM patients WHERE id = $1)",
        )
        .bind(patient_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn doctor_exists(&self, doctor_id: i64) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM doctors WHERE id = $1)",
        )
        .bind(doctor_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn doctor_has_any_booking(&self, doctor_id: i64) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM bookings WHERE doctor_id = $1)",
        )
        .bind(doctor_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert_booking(&self, booking: &Booking) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO bookings (id, start_time, end_time, patient_id, doctor_id, surgery_type)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(booking.id)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(booking.patient_id)
        .bind(booking.doctor_id)
        .bind(booking.surgery_type)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

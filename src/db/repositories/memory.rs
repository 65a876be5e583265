use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::BookingStore;
use crate::db::{Booking, DatabaseError};

#[derive(Debug, Default)]
struct Tables {
    patients: HashSet<i64>,
    doctors: HashSet<i64>,
    bookings: Vec<Booking>,
}

/// Process-local store. Backs the service when no `DATABASE_URL` is set.
#[derive(Debug, Default)]
pub struct InMemoryBookingStore {
    tables: RwLock<Tables>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(
        patients: impl IntoIterator<Item = i64>,
        doctors: impl IntoIterator<Item = i64>,
    ) -> Self {
        let store = Self::new();
        {
            let mut tables = store.tables.write();
            tables.patients.extend(patients);
            tables.doctors.extend(doctors);
        }
        store
    }

    /// Snapshot of stored bookings in insertion order.
    #[allow(unused)]
    pub fn bookings(&self) -> Vec<Booking> {
        self.tables.read().bookings.clone()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn patient_exists(&self, patient_id: i64) -> Result<bool, DatabaseError> {
        Ok(self.tables.read().patients.contains(&patient_id))
    }

    async fn doctor_exists(&self, doctor_id: i64) -> Result<bool, DatabaseError> {
        Ok(self.tables.read().doctors.contains(&doctor_id))
    }

    async fn doctor_has_any_booking(&self, doctor_id: i64) -> Result<bool, DatabaseError> {
        Ok(self
            .tables
            .read()
            .bookings
            .iter()
            .any(|booking| booking.doctor_id == doctor_id))
    }

    async fn insert_booking(&self, booking: &Booking) -> Result<(), DatabaseError> {
        self.tables.write().bookings.push(booking.clone());
        Ok(())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use super::validation::BookingRequestValidator;
use crate::db::{Booking, BookingRequest, BookingStore, DatabaseError, DEFAULT_SURGERY_TYPE};

#[derive(Debug, Error)]
pub enum BookingError {
    /// The request broke a booking rule; carries the first validation error.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Persistence(#[from] DatabaseError),
}

pub struct BookingService {
    store: Arc<dyn BookingStore>,
    validator: BookingRequestValidator,
    surgery_type: i32,
}

impl BookingService {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self {
            validator: BookingRequestValidator::new(store.clone()),
            store,
            surgery_type: DEFAULT_SURGERY_TYPE,
        }
    }

    pub fn with_surgery_type(mut self, surgery_type: i32) -> Self {
        self.surgery_type = surgery_type;
        self
    }

    /// Validates the request and, if it passes, stores exactly one booking.
    pub async fn add_booking(&self, request: BookingRequest) -> Result<Booking, BookingError> {
        let result = self.validator.validate(&request).await?;

        if let Some(error) = result.errors().first().cloned() {
            warn!(
                patient_id = request.patient_id,
                doctor_id = request.doctor_id,
                %error,
                "booking request failed validation"
            );
            return Err(BookingError::Validation(error));
        }

        let booking = Booking::from_request(&request, self.surgery_type);
        self.store.insert_booking(&booking).await?;

        info!(
            booking_id = %booking.id,
            patient_id = booking.patient_id,
            doctor_id = booking.doctor_id,
            "booking created"
        );

        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::db::InMemoryBookingStore;
    use crate::modules::booking::validation::{DOCTOR_BUSY, DOCTOR_NOT_FOUND, START_TIME_IN_PAST};
    use time::{Duration, OffsetDateTime};

    fn store() -> Arc<InMemoryBookingStore> {
        Arc::new(InMemoryBookingStore::seeded([123, 789], [456, 901]))
    }

    fn request(doctor_id: i64) -> BookingRequest {
        let now = OffsetDateTime::now_utc();
        BookingRequest {
            start_time: now + Duration::minutes(15),
            end_time: now + Duration::minutes(30),
            patient_id: 123,
            doctor_id,
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Lookup {
        Patient,
        Doctor,
        DoctorBookings,
    }

    /// Knows every id and has no bookings, but one lookup always errors.
    struct FailingLookupStore {
        failing: Lookup,
        inserted: Mutex<Vec<Booking>>,
    }

    impl FailingLookupStore {
        fn new(failing: Lookup) -> Self {
            Self {
                failing,
                inserted: Mutex::new(Vec::new()),
            }
        }

        fn answer(&self, lookup: Lookup, value: bool) -> Result<bool, DatabaseError> {
            if lookup == self.failing {
                Err(DatabaseError::Unavailable(format!("{:?} lookup failed", lookup)))
            } else {
                Ok(value)
            }
        }
    }

    #[async_trait]
    impl BookingStore for FailingLookupStore {
        async fn patient_exists(&self, _: i64) -> Result<bool, DatabaseError> {
            self.answer(Lookup::Patient, true)
        }

        async fn doctor_exists(&self, _: i64) -> Result<bool, DatabaseError> {
            self.answer(Lookup::Doctor, true)
        }

        async fn doctor_has_any_booking(&self, _: i64) -> Result<bool, DatabaseError> {
            self.answer(Lookup::DoctorBookings, false)
        }

        async fn insert_booking(&self, booking: &Booking) -> Result<(), DatabaseError> {
            self.inserted.lock().push(booking.clone());
            Ok(())
        }

        async fn ping(&self) -> Result<(), DatabaseError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn adds_booking_with_generated_id() {
        let store = store();
        let service = BookingService::new(store.clone());
        let request = request(456);

        let booking = service.add_booking(request.clone()).await.unwrap();

        let stored = store.bookings();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0], booking);
        assert_eq!(booking.start_time, request.start_time);
        assert_eq!(booking.end_time, request.end_time);
        assert_eq!(booking.patient_id, 123);
        assert_eq!(booking.doctor_id, 456);
        assert_eq!(booking.surgery_type, DEFAULT_SURGERY_TYPE);
        assert!(!booking.id.is_nil());
    }

    #[tokio::test]
    async fn bookings_for_different_doctors_get_distinct_ids() {
        let store = store();
        let service = BookingService::new(store.clone());

        let first = service.add_booking(request(456)).await.unwrap();
        let second = service.add_booking(request(901)).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.bookings().len(), 2);
    }

    #[tokio::test]
    async fn unknown_doctor_fails_without_storing() {
        let store = store();
        let service = BookingService::new(store.clone());

        let err = service.add_booking(request(999)).await.unwrap_err();

        assert!(matches!(err, BookingError::Validation(ref message) if message == DOCTOR_NOT_FOUND));
        assert!(store.bookings().is_empty());
    }

    #[tokio::test]
    async fn surfaces_only_the_first_validation_error() {
        let store = store();
        let service = BookingService::new(store.clone());
        let now = OffsetDateTime::now_utc();
        let request = BookingRequest {
            start_time: now - Duration::minutes(10),
            end_time: now - Duration::minutes(20),
            patient_id: 123,
            doctor_id: 456,
        };

        let err = service.add_booking(request).await.unwrap_err();

        assert_eq!(err.to_string(), START_TIME_IN_PAST);
        assert!(store.bookings().is_empty());
    }

    #[tokio::test]
    async fn existing_booking_blocks_doctor_at_any_time() {
        let store = store();
        let service = BookingService::new(store.clone());
        service.add_booking(request(456)).await.unwrap();

        let mut later = request(456);
        later.start_time += Duration::days(2);
        later.end_time += Duration::days(2);
        let err = service.add_booking(later).await.unwrap_err();

        assert_eq!(err.to_string(), DOCTOR_BUSY);
        assert_eq!(store.bookings().len(), 1);
    }

    #[tokio::test]
    async fn uses_configured_surgery_type() {
        let service = BookingService::new(store()).with_surgery_type(42);

        let booking = service.add_booking(request(456)).await.unwrap();

        assert_eq!(booking.surgery_type, 42);
    }

    #[tokio::test]
    async fn lookup_failure_is_a_persistence_error_and_stores_nothing() {
        for failing in [Lookup::Patient, Lookup::Doctor, Lookup::DoctorBookings] {
            let store = Arc::new(FailingLookupStore::new(failing));
            let service = BookingService::new(store.clone());

            let err = service.add_booking(request(456)).await.unwrap_err();

            assert!(
                matches!(err, BookingError::Persistence(DatabaseError::Unavailable(_))),
                "{:?} lookup failure surfaced as {:?}",
                failing,
                err
            );
            assert!(store.inserted.lock().is_empty());
        }
    }
}

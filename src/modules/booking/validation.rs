use std::sync::Arc;

use time::OffsetDateTime;
use tracing::debug;

use crate::db::{BookingRequest, BookingStore, DatabaseError};

pub const START_TIME_IN_PAST: &str = "StartTime must be after UTC now";
pub const END_TIME_IN_PAST: &str = "EndTime must be after UTC now";
pub const END_BEFORE_START: &str = "EndTime must be after StartTime";
pub const PATIENT_NOT_FOUND: &str = "A patient with that ID could not be found";
pub const DOCTOR_NOT_FOUND: &str = "A doctor with that ID could not be found";
pub const DOCTOR_BUSY: &str = "The doctor is busy at that time";

/// Outcome of validating a booking request. Passed exactly when no errors
/// were recorded; errors keep the order their checks ran in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<String>,
}

impl ValidationResult {
    pub fn passed() -> Self {
        Self::default()
    }

    pub fn failed(errors: Vec<String>) -> Self {
        Self { errors }
    }

    pub fn is_passed(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

/// Check categories, in the order they run. Cheap time comparisons go
/// before anything that touches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Check {
    Schedule,
    PatientExists,
    DoctorExists,
    DoctorAvailable,
}

const CHECKS: [Check; 4] = [
    Check::Schedule,
    Check::PatientExists,
    Check::DoctorExists,
    Check::DoctorAvailable,
];

impl Check {
    /// Returns the batch of errors this check raised, if any.
    async fn run(
        self,
        request: &BookingRequest,
        now: OffsetDateTime,
        store: &dyn BookingStore,
    ) -> Result<Option<Vec<String>>, DatabaseError> {
        let errors = match self {
            Check::Schedule => schedule_errors(request, now),
            Check::PatientExists => {
                single_error(!store.patient_exists(request.patient_id).await?, PATIENT_NOT_FOUND)
            }
            Check::DoctorExists => {
                single_error(!store.doctor_exists(request.doctor_id).await?, DOCTOR_NOT_FOUND)
            }
            // Any booking for the doctor blocks, even one in a disjoint window.
            Check::DoctorAvailable => single_error(
                store.doctor_has_any_booking(request.doctor_id).await?,
                DOCTOR_BUSY,
            ),
        };

        Ok((!errors.is_empty()).then_some(errors))
    }
}

fn schedule_errors(request: &BookingRequest, now: OffsetDateTime) -> Vec<String> {
    let mut errors = Vec::new();

    if request.start_time < now {
        errors.push(START_TIME_IN_PAST.to_string());
    }
    if request.end_time < now {
        errors.push(END_TIME_IN_PAST.to_string());
    }
    if request.end_time < request.start_time {
        errors.push(END_BEFORE_START.to_string());
    }

    errors
}

fn single_error(failed: bool, message: &str) -> Vec<String> {
    if failed {
        vec![message.to_string()]
    } else {
        Vec::new()
    }
}

/// Validates booking requests against the schedule and the store.
///
/// Validation outcomes are always returned as a [`ValidationResult`]; the only
/// `Err` is a store failure while looking something up.
#[derive(Clone)]
pub struct BookingRequestValidator {
    store: Arc<dyn BookingStore>,
}

impl BookingRequestValidator {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    pub async fn validate(
        &self,
        request: &BookingRequest,
    ) -> Result<ValidationResult, DatabaseError> {
        self.validate_at(request, OffsetDateTime::now_utc()).await
    }

    /// Runs every check category in order against a fixed `now`, stopping at
    /// the first category that reports errors.
    pub async fn validate_at(
        &self,
        request: &BookingRequest,
        now: OffsetDateTime,
    ) -> Result<ValidationResult, DatabaseError> {
        for check in CHECKS {
            if let Some(errors) = check.run(request, now, self.store.as_ref()).await? {
                debug!(?check, ?errors, "booking request rejected");
                return Ok(ValidationResult::failed(errors));
            }
        }

        Ok(ValidationResult::passed())
    }
}

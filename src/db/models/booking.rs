use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;

/// Surgery type stamped on new bookings until it is derived from clinic data.
pub const DEFAULT_SURGERY_TYPE: i32 = 159;

/// A persisted appointment between one patient and one doctor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub surgery_type: i32,
}

/// Inbound request to book a doctor for a patient. Nothing is checked at
/// construction; see `BookingRequestValidator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub patient_id: i64,
    pub doctor_id: i64,
}

impl Booking {
    /// Builds a booking with a fresh time-ordered id.
    pub fn from_request(request: &BookingRequest, surgery_type: i32) -> Self {
        Self {
            id: Uuid::now_v7(),
            start_time: request.start_time,
            end_time: request.end_time,
            patient_id: request.patient_id,
            doctor_id: request.doctor_id,
            surgery_type,
        }
    }
}

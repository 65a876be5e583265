pub mod handlers;
pub mod routes;
pub mod service;
pub mod validation;

pub use service::{BookingError, BookingService};

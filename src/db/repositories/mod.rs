mod booking_repository;
mod memory;

pub use booking_repository::{BookingRepository, BookingStore};
pub use memory::InMemoryBookingStore;

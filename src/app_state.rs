use std::sync::Arc;

use crate::config;
use crate::db::BookingStore;
use crate::modules::booking::BookingService;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BookingStore>,
    pub bookings: Arc<BookingService>,
    pub env: config::Config,
}

impl AppState {
    pub fn new(store: Arc<dyn BookingStore>, env: config::Config) -> Self {
        let bookings = BookingService::new(store.clone())
            .with_surgery_type(env.booking.surgery_type);

        Self {
            store,
            bookings: Arc::new(bookings),
            env,
        }
    }
}

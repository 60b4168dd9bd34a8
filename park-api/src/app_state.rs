use std::sync::Arc;

use crate::domain::ports::inbound::{BookingService, CatalogService};

#[derive(Clone)]
pub struct AppState {
    pub catalog_service: Arc<dyn CatalogService>,
    pub booking_service: Arc<dyn BookingService>,
}

impl AppState {
    pub fn new(
        catalog_service: Arc<dyn CatalogService>,
        booking_service: Arc<dyn BookingService>,
    ) -> Self {
        Self {
            catalog_service,
            booking_service,
        }
    }
}

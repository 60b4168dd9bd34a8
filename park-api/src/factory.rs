//! Composition root: wires concrete store adapters into the domain services.
//!
//! This is the only place that imports concrete outbound adapters.

use std::sync::Arc;

use sqlx::PgPool;
use time::Date;

use crate::{
    adapters::outbound::{
        memory::InMemoryParkStore,
        postgres::{PostgresBookingStore, PostgresCatalogAdapter},
    },
    app_state::AppState,
    domain::{
        calendar::ParkCalendar,
        ports::outbound::SeedRepository,
        services::{BookingServiceImpl, CatalogSeeder, CatalogServiceImpl, SeedPlan, SeedReport},
        SeedError,
    },
    repositories::ActivityRepositoryImpl,
};

/// Booking and calendar options shared by every backend.
#[derive(Debug, Clone, Copy)]
pub struct ServiceOptions {
    pub calendar: ParkCalendar,
    pub max_attempts: u32,
}

/// Services backed by PostgreSQL; returns the seed repository alongside.
pub fn postgres_state(
    pool: PgPool,
    options: ServiceOptions,
) -> (AppState, Arc<PostgresCatalogAdapter>) {
    let catalog = Arc::new(PostgresCatalogAdapter::new(Arc::new(
        ActivityRepositoryImpl::new(pool.clone()),
    )));
    let store = Arc::new(PostgresBookingStore::new(pool));

    let state = AppState::new(
        Arc::new(CatalogServiceImpl::new(catalog.clone())),
        Arc::new(
            BookingServiceImpl::new(store, options.calendar)
                .with_max_attempts(options.max_attempts),
        ),
    );

    (state, catalog)
}

/// Services backed by a process-local store.
pub fn memory_state(store: InMemoryParkStore, options: ServiceOptions) -> AppState {
    let store = Arc::new(store);

    AppState::new(
        Arc::new(CatalogServiceImpl::new(store.clone())),
        Arc::new(
            BookingServiceImpl::new(store, options.calendar)
                .with_max_attempts(options.max_attempts),
        ),
    )
}

/// Install the park's default catalog and capacity rows.
pub async fn seed_default_catalog<R: SeedRepository>(
    repository: Arc<R>,
    calendar: ParkCalendar,
    start: Date,
    end: Date,
) -> Result<SeedReport, SeedError> {
    CatalogSeeder::new(repository, calendar)
        .seed(&SeedPlan::park_default(), start, end)
        .await
}

use std::net::SocketAddr;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use time::OffsetDateTime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::outbound::memory::InMemoryParkStore,
    config::{Settings, StorageBackend},
    factory::ServiceOptions,
};

mod adapters;
mod app_state;
mod config;
mod domain;
mod factory;
mod repositories;
mod router;
mod routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "park_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = config::read_config().context("Failed to read configuration")?;
    let options = ServiceOptions {
        calendar: settings.park.calendar(),
        max_attempts: settings.booking.max_attempts,
    };
    tracing::info!(
        "Park closed on {}s, bookings retried up to {} times",
        options.calendar.closed_weekday(),
        options.max_attempts
    );

    let app_state = match settings.application.storage {
        StorageBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .connect_with(settings.database.with_db())
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Database connection pool created");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");

            let (state, catalog) = factory::postgres_state(pool, options);
            seed_if_enabled(&settings, catalog, options).await?;
            state
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; bookings are lost on restart");
            let store = InMemoryParkStore::new();
            seed_if_enabled(&settings, std::sync::Arc::new(store.clone()), options).await?;
            factory::memory_state(store, options)
        }
    };

    let app = router::create(app_state, &settings.application.allowed_origins);

    let addr = SocketAddr::new(
        settings
            .application
            .host
            .parse()
            .context("Invalid application host")?,
        settings.application.port,
    );
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn seed_if_enabled<R: domain::ports::outbound::SeedRepository>(
    settings: &Settings,
    repository: std::sync::Arc<R>,
    options: ServiceOptions,
) -> anyhow::Result<()> {
    if !settings.seed.enabled {
        return Ok(());
    }

    let today = OffsetDateTime::now_utc().date();
    let (start, end) = settings.seed.date_range(today)?;
    let report = factory::seed_default_catalog(repository, options.calendar, start, end).await?;
    tracing::info!(
        "Seeded {} activities over {} open days ({} new capacity rows)",
        report.activities,
        report.open_days,
        report.capacity_rows
    );

    Ok(())
}

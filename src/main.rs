//! Examdesk server entry point.

use std::collections::HashMap;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use examdesk::adapters::email::{ResendNotifier, SenderProfile};
use examdesk::adapters::http::tenancy::TenancyTable;
use examdesk::adapters::http::{
    api_router, AvailabilityHandlers, BookingHandlers, SettingsHandlers,
};
use examdesk::adapters::postgres::{
    PostgresDirectoryReader, PostgresProfileSync, PostgresSessionStore, PostgresSettingsStore,
};
use examdesk::application::handlers::availability::{
    GetBookingContextHandler, ListAvailabilityHandler,
};
use examdesk::application::handlers::booking::BookSlotHandler;
use examdesk::application::handlers::settings::{GetSettingsHandler, UpdateSettingsHandler};
use examdesk::application::{
    BusyIntervalAggregator, CalendarConfigStore, CalendarContext, CalendarRegistry,
};
use examdesk::config::AppConfig;
use examdesk::domain::CalendarKey;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();

    tracing::info!("Starting examdesk");

    let primary_pool = connect(&config.calendars.primary.database_url).await?;
    let partner_pool = connect(&config.calendars.partner.database_url).await?;

    sqlx::migrate!().run(&primary_pool).await?;
    sqlx::migrate!().run(&partner_pool).await?;

    let registry = Arc::new(CalendarRegistry::new(
        calendar_context(
            CalendarKey::Primary,
            &config.calendars.primary.label,
            &primary_pool,
        ),
        calendar_context(
            CalendarKey::Partner,
            &config.calendars.partner.label,
            &partner_pool,
        ),
    ));

    let config_store = Arc::new(CalendarConfigStore::new(Arc::new(
        PostgresSettingsStore::new(primary_pool.clone(), partner_pool.clone()),
    )));
    let aggregator = Arc::new(BusyIntervalAggregator::new(registry.session_stores()));

    let senders: HashMap<CalendarKey, SenderProfile> = CalendarKey::ALL
        .iter()
        .map(|key| {
            let section = config.calendars.section(*key);
            (
                *key,
                SenderProfile {
                    from: section.from_header(),
                    subject: config.email.confirmation_subject.clone(),
                },
            )
        })
        .collect();
    let notifier = Arc::new(ResendNotifier::new(
        config.email.resend_api_key.clone(),
        senders,
    ));

    let tenancy = Arc::new(TenancyTable::new(
        config.calendars.primary.hosts_list(),
        config.calendars.partner.hosts_list(),
    ));

    let availability = AvailabilityHandlers::new(
        Arc::new(ListAvailabilityHandler::new(
            Arc::clone(&config_store),
            Arc::clone(&aggregator),
        )),
        Arc::new(GetBookingContextHandler::new(Arc::clone(&registry))),
        Arc::clone(&tenancy),
    );
    let booking = BookingHandlers::new(
        Arc::new(BookSlotHandler::new(
            Arc::clone(&registry),
            Arc::clone(&config_store),
            Arc::clone(&aggregator),
            notifier,
        )),
        Arc::clone(&tenancy),
    );
    let settings = SettingsHandlers::new(
        Arc::new(GetSettingsHandler::new(Arc::clone(&config_store))),
        Arc::new(UpdateSettingsHandler::new(config_store)),
    );

    let app = api_router(availability, booking, settings)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config));

    let addr = config.server.socket_addr();
    tracing::info!(%addr, "Listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

fn calendar_context(key: CalendarKey, label: &str, pool: &PgPool) -> CalendarContext {
    CalendarContext::new(
        key,
        label,
        Arc::new(PostgresSessionStore::new(pool.clone())),
        Arc::new(PostgresDirectoryReader::new(pool.clone())),
        Arc::new(PostgresProfileSync::new(pool.clone())),
    )
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins = config.server.cors_origins_list();
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<axum::http::HeaderValue> =
        origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}

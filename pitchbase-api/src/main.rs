use pitchbase_api::{app, AppState, AuthConfig};
use pitchbase_booking::{BookingLedger, BookingRepository};
use pitchbase_catalog::{CatalogService, TurfRepository};
use pitchbase_core::{MockProcessor, PaymentProcessor};
use pitchbase_payment::{PaymentLedger, PaymentRepository};
use pitchbase_reporting::ReportingEngine;
use pitchbase_store::app_config::StorageBackend;
use pitchbase_store::{
    Config, DbClient, MemoryStore, PgBookingRepository, PgPaymentRepository, PgTurfRepository,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pitchbase_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!("Starting Pitchbase API on port {}", config.server.port);

    let (turfs, bookings, payments): (
        Arc<dyn TurfRepository>,
        Arc<dyn BookingRepository>,
        Arc<dyn PaymentRepository>,
    ) = match config.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory storage backend");
            let store = Arc::new(MemoryStore::new());
            (store.clone(), store.clone(), store)
        }
        StorageBackend::Postgres => {
            tracing::info!("Using Postgres storage backend");
            let db = DbClient::new(&config.database.url, config.database.max_connections).await?;
            db.migrate().await?;
            (
                Arc::new(PgTurfRepository::new(db.pool.clone())),
                Arc::new(PgBookingRepository::new(db.pool.clone())),
                Arc::new(PgPaymentRepository::new(db.pool)),
            )
        }
    };

    let (sse_tx, _) = tokio::sync::broadcast::channel(100);

    let payment_ledger = Arc::new(PaymentLedger::new(payments.clone()));
    let booking_ledger = Arc::new(BookingLedger::new(
        bookings.clone(),
        turfs.clone(),
        payment_ledger.clone(),
        config.policy.clone(),
        sse_tx.clone(),
    ));
    let catalog = Arc::new(CatalogService::new(turfs.clone()));
    let reports = Arc::new(ReportingEngine::new(turfs, bookings, payments));
    let processor: Arc<dyn PaymentProcessor> = Arc::new(MockProcessor);

    let app_state = AppState {
        catalog,
        bookings: booking_ledger,
        payments: payment_ledger,
        reports,
        processor,
        sse_tx,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

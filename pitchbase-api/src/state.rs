use pitchbase_booking::BookingLedger;
use pitchbase_catalog::CatalogService;
use pitchbase_core::PaymentProcessor;
use pitchbase_payment::PaymentLedger;
use pitchbase_reporting::ReportingEngine;
use pitchbase_shared::events::BookingEvent;
use std::sync::Arc;
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub bookings: Arc<BookingLedger>,
    pub payments: Arc<PaymentLedger>,
    pub reports: Arc<ReportingEngine>,
    pub processor: Arc<dyn PaymentProcessor>,
    pub sse_tx: broadcast::Sender<BookingEvent>,
    pub auth: AuthConfig,
}

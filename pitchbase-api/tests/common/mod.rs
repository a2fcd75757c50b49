#![allow(dead_code)]

use chrono::NaiveDate;
use jsonwebtoken::{encode, EncodingKey, Header};
use pitchbase_api::{app, AppState, AuthConfig};
use pitchbase_booking::{BookingDraft, BookingLedger, BookingRepository, SlotRequest};
use pitchbase_catalog::{CatalogService, Turf, TurfDraft, TurfFormat, TurfRepository, TurfStatus};
use pitchbase_core::{AuthContext, BookingPolicy, MockProcessor, PaymentProcessor, Role};
use pitchbase_payment::{PaymentLedger, PaymentRepository};
use pitchbase_reporting::ReportingEngine;
use pitchbase_shared::events::BookingEvent;
use pitchbase_shared::TimeRange;
use pitchbase_store::MemoryStore;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret";

pub struct TestEnv {
    pub catalog: Arc<CatalogService>,
    pub bookings: Arc<BookingLedger>,
    pub payments: Arc<PaymentLedger>,
    pub reports: Arc<ReportingEngine>,
    pub sse_tx: broadcast::Sender<BookingEvent>,
}

pub fn build_env(policy: BookingPolicy) -> TestEnv {
    let store = Arc::new(MemoryStore::new());
    let turfs: Arc<dyn TurfRepository> = store.clone();
    let bookings_repo: Arc<dyn BookingRepository> = store.clone();
    let payments_repo: Arc<dyn PaymentRepository> = store;

    let (sse_tx, _) = broadcast::channel(64);
    let payments = Arc::new(PaymentLedger::new(payments_repo.clone()));
    let bookings = Arc::new(BookingLedger::new(
        bookings_repo.clone(),
        turfs.clone(),
        payments.clone(),
        policy,
        sse_tx.clone(),
    ));
    let catalog = Arc::new(CatalogService::new(turfs.clone()));
    let reports = Arc::new(ReportingEngine::new(turfs, bookings_repo, payments_repo));

    TestEnv {
        catalog,
        bookings,
        payments,
        reports,
        sse_tx,
    }
}

pub fn env() -> TestEnv {
    build_env(BookingPolicy::default())
}

pub fn app_state(env: &TestEnv) -> AppState {
    AppState {
        catalog: env.catalog.clone(),
        bookings: env.bookings.clone(),
        payments: env.payments.clone(),
        reports: env.reports.clone(),
        processor: Arc::new(MockProcessor) as Arc<dyn PaymentProcessor>,
        sse_tx: env.sse_tx.clone(),
        auth: AuthConfig {
            secret: TEST_SECRET.to_string(),
            expiration: 3600,
        },
    }
}

pub fn test_app(env: &TestEnv) -> axum::Router {
    app(app_state(env))
}

pub fn admin() -> AuthContext {
    AuthContext::new("admin-1", Role::Admin)
}

pub fn owner() -> AuthContext {
    AuthContext::new("owner-1", Role::Owner)
}

pub fn player(id: &str) -> AuthContext {
    AuthContext::new(id, Role::Player)
}

#[derive(Serialize)]
struct Claims {
    sub: String,
    role: String,
    exp: usize,
}

pub fn token(sub: &str, role: Role) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        role: role.as_str().to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

/// Owner-created turf pushed through admin approval so it is bookable.
pub async fn active_turf(env: &TestEnv, hourly_price: i64) -> Turf {
    let turf = env
        .catalog
        .create_turf(
            &owner(),
            TurfDraft {
                name: "Champions Arena".to_string(),
                location: "Riverside".to_string(),
                format: TurfFormat::FiveASide,
                hourly_price,
                description: None,
                amenities: Default::default(),
            },
        )
        .await
        .unwrap();
    env.catalog
        .set_turf_status(&admin(), turf.id, TurfStatus::Active)
        .await
        .unwrap()
}

pub fn range(start: &str, end: &str) -> TimeRange {
    TimeRange::parse(start, end).unwrap()
}

pub fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, 12).unwrap()
}

pub fn draft_for(turf_id: Uuid, request: SlotRequest, duration_hours: u32) -> BookingDraft {
    BookingDraft {
        turf_id,
        date: date(),
        request,
        duration_hours,
        player_name: "Asha Rao".to_string(),
        player_email: "asha@example.com".to_string(),
        player_phone: "+91-9000000001".to_string(),
    }
}

pub mod app_config;
pub mod booking_repo;
pub mod database;
pub mod memory;
pub mod payment_repo;
pub mod turf_repo;

pub use app_config::Config;
pub use booking_repo::PgBookingRepository;
pub use database::DbClient;
pub use memory::MemoryStore;
pub use payment_repo::PgPaymentRepository;
pub use turf_repo::PgTurfRepository;

pub(crate) fn db_err(e: sqlx::Error) -> pitchbase_core::CoreError {
    pitchbase_core::CoreError::Internal(e.to_string())
}

pub mod ledger;
pub mod model;
pub mod repository;

pub use ledger::PaymentLedger;
pub use model::{Payment, PaymentMethod, PaymentState};
pub use repository::PaymentRepository;

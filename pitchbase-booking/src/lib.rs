pub mod ledger;
pub mod model;
pub mod repository;

pub use ledger::BookingLedger;
pub use model::{Booking, BookingDraft, BookingStatus, PaymentProgress, SlotRequest};
pub use repository::{BookingFilter, BookingRepository};

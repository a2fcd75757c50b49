pub mod error;
pub mod identity;
pub mod policy;
pub mod processor;

pub use error::{CoreError, CoreResult};
pub use identity::{AuthContext, Role};
pub use policy::BookingPolicy;
pub use processor::{MockProcessor, PaymentProcessor};

pub mod events;
pub mod pii;
pub mod timerange;

pub use timerange::{TimeRange, TimeRangeError};

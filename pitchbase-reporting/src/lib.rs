pub mod engine;

pub use engine::{CustomerRollup, DateRange, ReportingEngine};

pub mod repository;
pub mod service;
pub mod slot;
pub mod turf;

pub use repository::{TurfFilter, TurfRepository};
pub use service::CatalogService;
pub use slot::{SlotStatus, TimeSlot};
pub use turf::{Turf, TurfDraft, TurfFormat, TurfPatch, TurfStatus};

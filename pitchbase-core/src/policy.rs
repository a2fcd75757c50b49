use serde::Deserialize;

/// Platform policy knobs for the booking lifecycle.
///
/// Both flags exist because the behavior is a deployment decision, not a
/// fixed rule: whether full payment alone confirms a booking, and whether
/// unattended pending bookings ever expire. Nothing in the ledger acts on
/// `pending_expiry_hours`; it is surfaced for an external sweeper to read.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingPolicy {
    #[serde(default)]
    pub auto_confirm_on_full_payment: bool,

    #[serde(default)]
    pub pending_expiry_hours: Option<u32>,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            auto_confirm_on_full_payment: false,
            pending_expiry_hours: None,
        }
    }
}

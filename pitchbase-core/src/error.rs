use pitchbase_shared::TimeRangeError;

/// The single error type all ledger operations return.
///
/// Every variant except `Internal` is client-facing: the API layer maps it to
/// a 4xx status and a structured body so the UI can show a specific message.
/// `SlotUnavailable` is deliberately distinct from `Validation` - the UI
/// reacts to them differently (pick another slot vs. fix the form).
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Slot unavailable: {0}")]
    SlotUnavailable(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidState { from: String, to: String },

    #[error("Overpayment: amount {amount} exceeds remaining balance {remaining}")]
    Overpayment { amount: i64, remaining: i64 },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Stable machine-readable kind, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::Validation(_) => "VALIDATION",
            CoreError::NotFound(_) => "NOT_FOUND",
            CoreError::Forbidden(_) => "FORBIDDEN",
            CoreError::Conflict(_) => "CONFLICT",
            CoreError::SlotUnavailable(_) => "SLOT_UNAVAILABLE",
            CoreError::InvalidState { .. } => "INVALID_STATE",
            CoreError::Overpayment { .. } => "OVERPAYMENT",
            CoreError::Internal(_) => "INTERNAL",
        }
    }
}

impl From<TimeRangeError> for CoreError {
    fn from(err: TimeRangeError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pitchbase_core::CoreError;
use serde_json::json;

/// HTTP surface for domain errors. The body always carries the machine
/// readable kind alongside the message, so clients can branch without
/// parsing prose.
#[derive(Debug)]
pub enum AppError {
    Core(CoreError),
    Unauthorized(String),
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            AppError::Core(err) => {
                let status = match &err {
                    CoreError::Validation(_) => StatusCode::BAD_REQUEST,
                    CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
                    CoreError::NotFound(_) => StatusCode::NOT_FOUND,
                    CoreError::Conflict(_) | CoreError::SlotUnavailable(_) => StatusCode::CONFLICT,
                    CoreError::InvalidState { .. } | CoreError::Overpayment { .. } => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                    CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    tracing::error!("Internal error: {}", err);
                    (status, "INTERNAL", "Internal Server Error".to_string())
                } else {
                    (status, err.kind(), err.to_string())
                }
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
            AppError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": { "kind": kind, "message": message },
        }));
        (status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        AppError::Core(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

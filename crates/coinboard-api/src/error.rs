use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use coinboard_core::SyncError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

const INTERNAL_ERROR: &str = "Internal server error";

/// Boundary error of the HTTP surface.
///
/// Rendering a response is the single place a failed request gets logged:
/// server errors at `error!`, client errors at `warn!`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{message}")]
    Client { status: StatusCode, message: String },

    #[error("Server error: {0}")]
    Server(String),

    #[error("Timed out after {0}s")]
    Timeout(u64),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Client { status, .. } => *status,
            ApiError::Server(_) | ApiError::Timeout(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::UnknownCoin(_) => ApiError::Client {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            e if e.is_client_error() => ApiError::Client {
                status: StatusCode::BAD_REQUEST,
                message: e.to_string(),
            },
            e => ApiError::Server(e.to_string()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Client {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Unauthorized => status.into_response(),
            ApiError::Client { message, .. } => {
                warn!(status = status.as_u16(), error = %message, "Request rejected");
                (status, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Server(detail) => {
                error!(error = %detail, "Sync request failed");
                (status, Json(json!({ "error": INTERNAL_ERROR }))).into_response()
            }
            ApiError::Timeout(secs) => {
                error!(budget_secs = secs, "Sync request exceeded its time budget");
                (status, Json(json!({ "error": INTERNAL_ERROR }))).into_response()
            }
        }
    }
}

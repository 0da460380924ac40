use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::services::booking::BookingError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("{0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),
}

impl From<BookingError> for AppError {
    fn from(e: BookingError) -> Self {
        match e {
            BookingError::InvalidStay
            | BookingError::HotelMismatch { .. }
            | BookingError::RoomOutOfService(_)
            | BookingError::InvalidTransition { .. } => AppError::BadRequest(e.to_string()),
            BookingError::RoomNotFound(_)
            | BookingError::GuestNotFound(_)
            | BookingError::NotFound(_) => AppError::NotFound(e.to_string()),
            BookingError::Conflict { .. } => AppError::Conflict(e.to_string()),
            BookingError::Store(inner) => AppError::Internal(inner),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

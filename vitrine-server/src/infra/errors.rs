use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use tracing::{error, warn};

use vitrine_core::CatalogError;

pub const PRODUCT_NOT_FOUND: &str = "Produto não encontrado";

pub type AppResult<T> = Result<T, AppError>;

/// Error returned by handlers, rendered as `{"message": ..., "error": ...}`.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    /// Underlying error text, only set for unexpected failures.
    pub detail: Option<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            detail: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(StatusCode::PAYLOAD_TOO_LARGE, message)
    }

    pub fn product_not_found() -> Self {
        Self::not_found(PRODUCT_NOT_FOUND)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Map a catalog failure for the operation described by `context`.
    /// Not-found becomes 404; everything else is a 500 carrying the error text.
    pub fn from_catalog(context: &str, err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => Self::product_not_found(),
            other => {
                error!(error = %other, "{context}");
                Self::internal(context).with_detail(other.to_string())
            }
        }
    }
}

impl AppError {
    /// Bodies the JSON extractor refuses count as failures of the operation,
    /// not as a separate client-error class.
    pub fn from_json_rejection(context: &str, rejection: JsonRejection) -> Self {
        warn!(error = %rejection.body_text(), "{context}");
        Self::internal(context).with_detail(rejection.body_text())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.message, detail),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match self.detail {
            Some(detail) => json!({ "message": self.message, "error": detail }),
            None => json!({ "message": self.message }),
        };

        (self.status, Json(body)).into_response()
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ludo_catalog::CatalogError;
use ludo_core::ValidationError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),
    #[error("{0} not found")]
    NotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CatalogError> for AppError {
    fn from(error: CatalogError) -> Self {
        match error {
            CatalogError::Validation(source) => AppError::Validation(source),
            CatalogError::NotFound(what) => AppError::NotFound(what),
            CatalogError::Transaction(source) | CatalogError::Storage(source) => {
                AppError::Internal(source.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(source) => (StatusCode::FORBIDDEN, Json(source)).into_response(),
            AppError::NotFound(_) => StatusCode::NO_CONTENT.into_response(),
            AppError::Internal(message) => {
                error!(error = %message, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

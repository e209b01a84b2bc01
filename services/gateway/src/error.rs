use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use types::errors::{ParamError, QueryError};

/// Central error type for the Gateway application
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();

        let (status, code, max_page) = match &self {
            AppError::Param(ParamError::UnsupportedInterval(_)) => {
                (StatusCode::BAD_REQUEST, "UNSUPPORTED_INTERVAL", None)
            }
            AppError::Param(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", None),
            AppError::Query(QueryError::InvalidPagination { .. }) => {
                (StatusCode::BAD_REQUEST, "INVALID_PAGINATION", None)
            }
            AppError::Query(QueryError::PageOutOfRange { max_page, .. }) => {
                (StatusCode::BAD_REQUEST, "PAGE_OUT_OF_RANGE", Some(*max_page))
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", None),
            AppError::InternalError(err) => {
                tracing::error!("Unhandled error: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", None)
            }
        };

        if status.is_client_error() {
            tracing::warn!(status = status.as_u16(), code, "{}", message);
        }

        let body = match max_page {
            Some(max_page) => json!({
                "error": code,
                "message": message,
                "maxPage": max_page
            }),
            None => json!({
                "error": code,
                "message": message
            }),
        };

        (status, Json(body)).into_response()
    }
}

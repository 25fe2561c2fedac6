//! Mapping of failures to HTTP responses

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::reports::html::render_error;

/// Errors returned by the JSON and PNG routes
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Game not found")]
    GameNotFound,

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal(context: &str, err: anyhow::Error) -> Self {
        ApiError::Internal(format!("{}: {:#}", context, err))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::GameNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

/// Report failure rendered as an inline HTML error block
#[derive(Debug, Error)]
#[error("{0}")]
pub struct HtmlError(pub String);

impl IntoResponse for HtmlError {
    fn into_response(self) -> Response {
        log::error!("Report failed: {}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, Html(render_error(&self.0))).into_response()
    }
}

/// Attach a route-specific context to a failed operation
pub trait ResultExt<T> {
    fn or_internal(self, context: &str) -> Result<T, ApiError>;
}

impl<T> ResultExt<T> for anyhow::Result<T> {
    fn or_internal(self, context: &str) -> Result<T, ApiError> {
        self.map_err(|err| ApiError::internal(context, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::GameNotFound.status(), StatusCode::NOT_FOUND);
        let err: anyhow::Result<()> = Err(anyhow!("disk full"));
        let api = err.or_internal("Error creating game").unwrap_err();
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.to_string(), "Error creating game: disk full");
    }

    #[test]
    fn test_html_error_status() {
        let response = HtmlError("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

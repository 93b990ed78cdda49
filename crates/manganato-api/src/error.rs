//! Mapping of scraper errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use manganato_core::MangaError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub exception_code: &'static str,
}

/// Error returned by API handlers.
#[derive(Debug)]
pub struct ApiError(pub MangaError);

impl From<MangaError> for ApiError {
    fn from(err: MangaError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// Status code, exception code, and client-facing message.
    pub fn parts(&self) -> (StatusCode, &'static str, String) {
        match &self.0 {
            e if e.is_not_found() => (
                StatusCode::NOT_FOUND,
                "MANGA_NOT_FOUND",
                "Manga not found.".to_string(),
            ),
            MangaError::InvalidPage(_) => (
                StatusCode::BAD_REQUEST,
                "INVALID_PAGE",
                self.0.to_string(),
            ),
            MangaError::UpstreamTimeout(_) => (
                StatusCode::GATEWAY_TIMEOUT,
                "UPSTREAM_TIMEOUT",
                "Upstream site did not respond in time.".to_string(),
            ),
            MangaError::UpstreamUnreachable(_)
            | MangaError::UpstreamStatus { .. }
            | MangaError::RateLimited => (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_UNAVAILABLE",
                "Upstream site is unavailable.".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "UPSTREAM_MARKUP_CHANGED",
                "Upstream page could not be parsed.".to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, exception_code, message) = self.parts();

        if status.is_server_error() {
            tracing::error!(error = %self.0, %status, "request failed");
        } else {
            tracing::debug!(error = %self.0, %status, "request rejected");
        }

        let body = ErrorBody {
            message,
            exception_code,
        };

        (status, Json(body)).into_response()
    }
}

//! Error types for the Manganato scraper
//!
//! This module defines all error types used throughout the library.
//! MangaError implements Serialize so it can be embedded in JSON payloads.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for Manganato scraper operations
#[derive(Error, Debug)]
pub enum MangaError {
    /// Network-level failure reaching the upstream site
    #[error("Upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    /// Fetch exceeded the configured timeout
    #[error("Upstream timed out: {0}")]
    UpstreamTimeout(String),

    /// Upstream answered with an unexpected HTTP status
    #[error("Upstream returned HTTP {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    /// Rate limited by the upstream (HTTP 429)
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Listing page lacks the pagination control
    #[error("Pagination not found: {0}")]
    PaginationNotFound(String),

    /// Failed to parse HTML content or compile a selector
    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    /// Identifier prefix is not in the resolver table
    #[error("Unknown source prefix: {0}")]
    UnknownSourcePrefix(String),

    /// Identifier is not of the form `prefix-slug`
    #[error("Invalid manga identifier: {0}")]
    InvalidIdentifier(String),

    /// Page number outside `1..=u32::MAX`, as requested
    #[error("Invalid page number: {0}")]
    InvalidPage(String),

    /// Requested title does not exist upstream
    #[error("Manga not found: {0}")]
    NotFound(String),
}

impl MangaError {
    /// Whether the API layer should report this as a missing resource.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            MangaError::NotFound(_)
                | MangaError::UnknownSourcePrefix(_)
                | MangaError::InvalidIdentifier(_)
        )
    }
}

impl From<reqwest::Error> for MangaError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());

        if err.is_timeout() {
            MangaError::UpstreamTimeout(url)
        } else if let Some(status) = err.status() {
            MangaError::UpstreamStatus {
                status: status.as_u16(),
                url,
            }
        } else {
            MangaError::UpstreamUnreachable(format!("{}: {}", url, err))
        }
    }
}

/// Serialize MangaError as its display string
impl Serialize for MangaError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for Manganato scraper operations
pub type Result<T> = std::result::Result<T, MangaError>;

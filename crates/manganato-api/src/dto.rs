//! Request parameters and response envelope.

use serde::{Deserialize, Serialize};

use manganato_core::MangaError;

/// Standard success envelope shared by all endpoints.
///
/// `ttps` is the total page count of the listing, 0 where paging does not apply.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub message: String,
    pub payload: T,
    pub ttps: u32,
    pub current_page: u32,
}

impl<T> Envelope<T> {
    pub fn new(message: impl Into<String>, payload: T, ttps: u32, current_page: u32) -> Self {
        Self {
            message: message.into(),
            payload,
            ttps,
            current_page,
        }
    }
}

/// Query parameters of `GET /v1/mangas`.
///
/// Both fields are kept as raw strings so a non-numeric `page` falls back to
/// the first page instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatesQuery {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
}

impl UpdatesQuery {
    /// Requested page; 1 when absent, non-numeric, or zero.
    ///
    /// # Errors
    /// `MangaError::InvalidPage` for a number too large for a page index.
    pub fn page(&self) -> Result<u32, MangaError> {
        let raw = match self.page.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) => raw,
            _ => return Ok(1),
        };

        match raw.parse::<u32>() {
            Ok(0) => Ok(1),
            Ok(page) => Ok(page),
            Err(_) => Err(MangaError::InvalidPage(raw.to_string())),
        }
    }

    /// Search term, `None` when absent or blank.
    pub fn search(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

//! Data types for the Manganato scraper
//!
//! This module contains all the core data structures used throughout the library.
//! All types implement Serialize and Deserialize for JSON responses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MangaError;

/// Two-part key identifying a title: a source prefix selecting the
/// upstream host and the slug that follows it.
///
/// The textual form is `prefix-slug`, split on the first `-`.
///
/// # Examples
/// ```
/// use manganato_core::SourceIdentifier;
///
/// let id: SourceIdentifier = "cu-manga-aa951409".parse().unwrap();
/// assert_eq!(id.prefix(), "cu");
/// assert_eq!(id.slug(), "manga-aa951409");
/// assert_eq!(id.to_string(), "cu-manga-aa951409");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceIdentifier {
    prefix: String,
    slug: String,
}

impl SourceIdentifier {
    /// Build an identifier from its parts.
    ///
    /// # Errors
    /// `MangaError::InvalidIdentifier` if either part is empty or the
    /// prefix contains the delimiter.
    pub fn new(prefix: impl Into<String>, slug: impl Into<String>) -> Result<Self, MangaError> {
        let prefix = prefix.into();
        let slug = slug.into();

        if prefix.is_empty() || slug.is_empty() || prefix.contains('-') {
            return Err(MangaError::InvalidIdentifier(format!("{}-{}", prefix, slug)));
        }

        Ok(Self { prefix, slug })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }
}

impl FromStr for SourceIdentifier {
    type Err = MangaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, slug) = s
            .split_once('-')
            .ok_or_else(|| MangaError::InvalidIdentifier(s.to_string()))?;
        Self::new(prefix, slug)
    }
}

impl fmt::Display for SourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prefix, self.slug)
    }
}

impl Serialize for SourceIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SourceIdentifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A chapter link as shown on listing cards and detail pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    /// Visible label (e.g., "Chapter 123")
    pub label: String,
    /// Absolute URL of the chapter reader
    pub url: String,
    /// View counter as displayed upstream (e.g., "12.3K")
    pub views: Option<String>,
    /// Upload time as displayed upstream
    pub uploaded: Option<String>,
}

/// One entry of the latest-updates feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateItem {
    /// Source identifier in `prefix-slug` form
    pub id: SourceIdentifier,
    /// Display title
    pub title: String,
    /// Absolute URL of the title page
    pub url: String,
    /// Thumbnail image URL
    pub thumbnail: Option<String>,
    /// Most recent chapter links shown on the card
    pub latest_chapters: Vec<Chapter>,
    /// Last update time as displayed upstream
    pub updated: Option<String>,
    /// Average user rating (0.0 - 5.0)
    pub rating: Option<f32>,
    /// View counter as displayed upstream
    pub views: Option<String>,
    pub authors: Vec<String>,
    /// Short synopsis shown on the card
    pub description: Option<String>,
}

/// Search results share the listing card shape.
pub type SearchResult = UpdateItem;

/// Full record of a single title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MangaDetail {
    /// Source identifier in `prefix-slug` form
    pub id: SourceIdentifier,
    pub title: String,
    pub alternative_titles: Vec<String>,
    pub authors: Vec<String>,
    /// Publication status (e.g., "Ongoing", "Completed")
    pub status: Option<String>,
    pub genres: Vec<String>,
    pub description: Option<String>,
    /// Chapters in upstream order (newest first)
    pub chapters: Vec<Chapter>,
    /// Cover image URL
    pub cover: Option<String>,
    /// Last update time as displayed upstream
    pub updated: Option<String>,
    /// View counter as displayed upstream
    pub views: Option<String>,
    /// Rating summary as displayed upstream
    pub rating: Option<String>,
}

/// Pagination metadata for a listing page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    /// Current page number (1-based)
    pub current_page: u32,
    /// Total number of listing pages
    pub total_pages: u32,
}

/// Paginated result wrapper for listing pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    /// Items on the current page
    pub items: Vec<T>,
    #[serde(flatten)]
    pub page: PageMetadata,
}

impl<T> PaginatedResult<T> {
    /// Create a new paginated result
    pub fn new(items: Vec<T>, current_page: u32, total_pages: u32) -> Self {
        Self {
            items,
            page: PageMetadata {
                current_page,
                total_pages,
            },
        }
    }

    /// Whether a page after the current one exists
    pub fn has_next_page(&self) -> bool {
        self.page.current_page < self.page.total_pages
    }
}

//! Manganato Scraper Core Library
//!
//! This crate provides the scrape-and-normalize pipeline behind the
//! Manganato API: fetch an upstream HTML page, query it with selectors, and
//! map the results into typed records.
//!
//! # Features
//! - Latest-updates feed with total page count
//! - Title search over a feed page
//! - Title details including chapter list
//! - Source prefix resolution (`cu-…`, `mu-…`)
//! - Rate-limited, time-bounded HTTP client with retry

pub mod client;
pub mod error;
pub mod parser;
pub mod resolver;
pub mod scraper;
pub mod types;

// Re-export main types for convenience
pub use client::{ClientConfig, MangaClient, RateLimiter};
pub use error::{MangaError, Result};
pub use resolver::SourceResolver;
pub use crate::scraper::{MangaScraper, SiteConfig};
pub use types::{
    Chapter, MangaDetail, PageMetadata, PaginatedResult, SearchResult, SourceIdentifier,
    UpdateItem,
};

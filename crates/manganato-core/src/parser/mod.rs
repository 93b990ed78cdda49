//! HTML parsers for Manganato pages
//!
//! This module contains the selector engine and the page parsers built on it:
//! - `selector`: Compile and evaluate selector queries
//! - `listing`: Parse the latest-updates feed page
//! - `detail`: Parse a title detail page

pub mod detail;
pub mod listing;
pub mod selector;

// Re-export main parsing functions
pub use detail::parse_manga_detail;
pub use listing::{extract_page_count, parse_total_pages, parse_update_items};
pub use selector::Query;

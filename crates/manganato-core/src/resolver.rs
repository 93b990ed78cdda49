//! Source prefix to upstream host mapping
//!
//! Titles live on one of several Manganato hosts. A two-letter prefix in the
//! identifier selects the host; this module maps prefixes to base URLs and
//! back.

use std::collections::BTreeMap;

use crate::error::{MangaError, Result};
use crate::types::SourceIdentifier;

/// Default prefix table: legacy chapter subdomain and the main domain.
pub const DEFAULT_SOURCES: [(&str, &str); 2] = [
    ("cu", "https://chapmanganato.to"),
    ("mu", "https://manganato.com"),
];

/// Read-only table of source prefixes and their base URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceResolver {
    sources: BTreeMap<String, String>,
}

impl Default for SourceResolver {
    fn default() -> Self {
        Self::with_sources(DEFAULT_SOURCES)
    }
}

impl SourceResolver {
    /// Build a resolver from `(prefix, base_url)` pairs.
    ///
    /// Trailing slashes on base URLs are dropped so that composition always
    /// yields exactly one separator.
    pub fn with_sources<I, K, V>(sources: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let sources = sources
            .into_iter()
            .map(|(prefix, base)| {
                let base: String = base.into();
                (prefix.into(), base.trim_end_matches('/').to_string())
            })
            .collect();
        Self { sources }
    }

    /// Look up the base URL for a prefix.
    ///
    /// # Errors
    /// `MangaError::UnknownSourcePrefix` when the prefix is not in the table.
    pub fn resolve_base(&self, prefix: &str) -> Result<&str> {
        self.sources
            .get(prefix)
            .map(String::as_str)
            .ok_or_else(|| MangaError::UnknownSourcePrefix(prefix.to_string()))
    }

    /// Compose the detail page URL for an identifier.
    pub fn title_url(&self, id: &SourceIdentifier) -> Result<String> {
        let base = self.resolve_base(id.prefix())?;
        Ok(format!("{}/{}", base, id.slug()))
    }

    /// Map an absolute title or chapter URL back to its identifier.
    ///
    /// The longest matching base wins, and the slug is the first path
    /// segment after it.
    ///
    /// # Examples
    /// ```
    /// use manganato_core::SourceResolver;
    ///
    /// let resolver = SourceResolver::default();
    /// let id = resolver
    ///     .identify("https://chapmanganato.to/manga-aa951409/chapter-12")
    ///     .unwrap();
    /// assert_eq!(id.to_string(), "cu-manga-aa951409");
    /// assert!(resolver.identify("https://example.com/manga-1").is_none());
    /// ```
    pub fn identify(&self, url: &str) -> Option<SourceIdentifier> {
        let (prefix, rest) = self
            .sources
            .iter()
            .filter_map(|(prefix, base)| {
                let rest = url.strip_prefix(base.as_str())?.strip_prefix('/')?;
                Some((prefix, base.len(), rest))
            })
            .max_by_key(|(_, len, _)| *len)
            .map(|(prefix, _, rest)| (prefix, rest))?;

        let slug = rest.split(['/', '?', '#']).next()?;
        SourceIdentifier::new(prefix.as_str(), slug).ok()
    }
}

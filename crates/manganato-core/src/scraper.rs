//! Main Manganato scraper API
//!
//! This module provides the high-level API for scraping Manganato.
//! It combines the HTTP client with the parsers to serve the latest-updates
//! feed, title search over that feed, and per-title details.

use scraper::Html;

use crate::client::MangaClient;
use crate::error::{MangaError, Result};
use crate::parser::{parse_manga_detail, parse_total_pages, parse_update_items};
use crate::resolver::SourceResolver;
use crate::types::{MangaDetail, PaginatedResult, SearchResult, SourceIdentifier, UpdateItem};

/// Default latest-updates listing URL
pub const DEFAULT_UPDATES_URL: &str = "https://manganato.com/genre-all";

/// Upstream URL layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Listing page URL; page `n > 1` lives at `{updates_url}/{n}`
    pub updates_url: String,
    /// Prefix table for title pages
    pub resolver: SourceResolver,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            updates_url: DEFAULT_UPDATES_URL.to_string(),
            resolver: SourceResolver::default(),
        }
    }
}

impl SiteConfig {
    /// URL of a listing page. Page 1 is the bare listing URL.
    ///
    /// # Example
    /// ```
    /// use manganato_core::SiteConfig;
    ///
    /// let site = SiteConfig::default();
    /// assert_eq!(site.updates_page_url(1), "https://manganato.com/genre-all");
    /// assert_eq!(site.updates_page_url(3), "https://manganato.com/genre-all/3");
    /// ```
    pub fn updates_page_url(&self, page: u32) -> String {
        let base = self.updates_url.trim_end_matches('/');
        if page > 1 {
            format!("{}/{}", base, page)
        } else {
            base.to_string()
        }
    }
}

/// Main scraper API for Manganato
///
/// Stateless apart from its configuration, so one instance can be shared
/// across concurrent requests.
///
/// # Example
/// ```no_run
/// use manganato_core::MangaScraper;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let scraper = MangaScraper::new()?;
///
///     let updates = scraper.updates(1).await?;
///     println!("{} titles, {} pages", updates.items.len(), updates.page.total_pages);
///
///     Ok(())
/// }
/// ```
pub struct MangaScraper {
    client: MangaClient,
    site: SiteConfig,
}

impl MangaScraper {
    /// Create a new scraper with default configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        let client = MangaClient::new()?;
        Ok(Self::with_client(client))
    }

    /// Create a new scraper with a custom client and the default site layout.
    pub fn with_client(client: MangaClient) -> Self {
        Self::with_site(client, SiteConfig::default())
    }

    /// Create a new scraper with a custom client and site layout.
    ///
    /// This is useful for testing against a local mock server.
    pub fn with_site(client: MangaClient, site: SiteConfig) -> Self {
        Self { client, site }
    }

    /// Fetch one page of the latest-updates feed.
    ///
    /// # Arguments
    /// * `page` - Page number (1-based)
    ///
    /// # Returns
    /// * `Ok(PaginatedResult<UpdateItem>)` with the items and total page count
    /// * `Err(MangaError::InvalidPage)` if page is 0
    /// * `Err(MangaError::UpstreamStatus)` if the listing page is missing upstream
    /// * `Err(MangaError::PaginationNotFound)` if the page has no pagination control
    ///
    /// # Example
    /// ```no_run
    /// use manganato_core::MangaScraper;
    ///
    /// # async fn example() -> Result<(), manganato_core::MangaError> {
    /// let scraper = MangaScraper::new()?;
    /// let page2 = scraper.updates(2).await?;
    /// for item in page2.items {
    ///     println!("{} ({})", item.title, item.id);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn updates(&self, page: u32) -> Result<PaginatedResult<UpdateItem>> {
        let document = self.fetch_listing(page).await?;

        let total_pages = parse_total_pages(&document)?;
        let items = parse_update_items(&document, &self.site.resolver)?;

        Ok(PaginatedResult::new(items, page, total_pages))
    }

    /// Search one listing page for titles containing `query`.
    ///
    /// Matching is a case-insensitive substring test on the title. An empty
    /// query matches every item on the page.
    ///
    /// # Returns
    /// * `Ok(Vec<SearchResult>)`, empty when nothing matches
    /// * `Err(MangaError::InvalidPage)` if page is 0
    pub async fn search(&self, query: &str, page: u32) -> Result<Vec<SearchResult>> {
        let document = self.fetch_listing(page).await?;
        let items = parse_update_items(&document, &self.site.resolver)?;
        Ok(filter_by_title(items, query))
    }

    /// Search one listing page and keep its pagination metadata.
    ///
    /// Same as [`MangaScraper::search`] but also parses the total page count
    /// from the same fetch.
    pub async fn search_page(&self, query: &str, page: u32) -> Result<PaginatedResult<SearchResult>> {
        let document = self.fetch_listing(page).await?;

        let total_pages = parse_total_pages(&document)?;
        let items = parse_update_items(&document, &self.site.resolver)?;

        Ok(PaginatedResult::new(
            filter_by_title(items, query),
            page,
            total_pages,
        ))
    }

    /// Get detailed information about a title.
    ///
    /// # Returns
    /// * `Ok(MangaDetail)` with title information and chapters
    /// * `Err(MangaError::UnknownSourcePrefix)` if the prefix is not known
    /// * `Err(MangaError::NotFound)` if the title page is missing (HTTP 404 or no title markup)
    ///
    /// # Example
    /// ```no_run
    /// use manganato_core::{MangaScraper, SourceIdentifier};
    ///
    /// # async fn example() -> Result<(), manganato_core::MangaError> {
    /// let scraper = MangaScraper::new()?;
    /// let id: SourceIdentifier = "cu-manga-aa951409".parse()?;
    /// let manga = scraper.info(&id).await?;
    /// println!("{} has {} chapters", manga.title, manga.chapters.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn info(&self, id: &SourceIdentifier) -> Result<MangaDetail> {
        let url = self.site.resolver.title_url(id)?;

        let html = self.client.fetch(&url).await.map_err(|e| match e {
            MangaError::UpstreamStatus { status: 404, .. } => MangaError::NotFound(id.to_string()),
            other => other,
        })?;

        parse_manga_detail(&html, id)
    }

    async fn fetch_listing(&self, page: u32) -> Result<Html> {
        if page == 0 {
            return Err(MangaError::InvalidPage(page.to_string()));
        }

        let url = self.site.updates_page_url(page);
        let html = self.client.fetch(&url).await?;

        Ok(Html::parse_document(&html))
    }
}

/// Keep items whose title contains `query`, ignoring case.
fn filter_by_title(items: Vec<UpdateItem>, query: &str) -> Vec<UpdateItem> {
    let needle = query.trim().to_lowercase();
    items
        .into_iter()
        .filter(|item| item.title.to_lowercase().contains(&needle))
        .collect()
}

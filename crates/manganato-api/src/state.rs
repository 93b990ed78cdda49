use std::sync::Arc;

use manganato_core::MangaScraper;

/// Shared handler state, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub scraper: Arc<MangaScraper>,
}

impl AppState {
    pub fn new(scraper: MangaScraper) -> Self {
        Self {
            scraper: Arc::new(scraper),
        }
    }
}

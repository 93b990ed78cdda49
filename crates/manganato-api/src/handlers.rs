//! Route handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use manganato_core::{MangaDetail, SourceIdentifier, UpdateItem};

use crate::dto::{Envelope, UpdatesQuery};
use crate::error::ApiError;
use crate::state::AppState;

const UPDATES_MESSAGE: &str = "Latest manga updates fetched successful.";
const INFO_MESSAGE: &str = "Latest manga info fetched successful.";

/// Latest updates, or a title search over one listing page.
///
/// # Endpoint
///
/// `GET /v1/mangas?page={n}&q={term}`
///
/// # Response Codes
///
/// - **200 OK**: Page fetched
/// - **400 Bad Request**: `page` is a number too large for a page index
/// - **502 / 504**: Upstream unavailable or timed out
/// - **500**: Listing markup could not be parsed (e.g., pagination missing)
pub async fn updates_handler(
    State(state): State<AppState>,
    Query(query): Query<UpdatesQuery>,
) -> Result<Json<Envelope<Vec<UpdateItem>>>, ApiError> {
    let page = query.page()?;

    let result = match query.search() {
        Some(term) => {
            tracing::debug!(page, term, "searching listing");
            state.scraper.search_page(term, page).await?
        }
        None => state.scraper.updates(page).await?,
    };

    Ok(Json(Envelope::new(
        UPDATES_MESSAGE,
        result.items,
        result.page.total_pages,
        result.page.current_page,
    )))
}

/// Details of one title.
///
/// # Endpoint
///
/// `GET /v1/mangas/{prefix-slug}`
///
/// # Response Codes
///
/// - **200 OK**: Title found
/// - **404 Not Found**: Malformed identifier, unknown prefix, or missing title
pub async fn info_handler(
    State(state): State<AppState>,
    Path(manga): Path<String>,
) -> Result<Json<Envelope<MangaDetail>>, ApiError> {
    let id: SourceIdentifier = manga.parse()?;
    let detail = state.scraper.info(&id).await?;

    Ok(Json(Envelope::new(INFO_MESSAGE, detail, 0, 0)))
}

/// Liveness probe.
///
/// `GET /health`
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

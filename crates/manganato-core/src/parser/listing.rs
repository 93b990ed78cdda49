//! Latest-updates listing parser
//!
//! Parses the `genre-all` feed page: the grid of update cards and the
//! pagination control that carries the total page count.

use scraper::{ElementRef, Html};

use crate::error::{MangaError, Result};
use crate::resolver::SourceResolver;
use crate::types::{Chapter, UpdateItem};

use super::selector::{self, Query};

/// Selector for the "last page" pagination control.
const LAST_PAGE_SELECTOR: &str = "div.group-page > a.page-blue.page-last";

/// Parse update cards from a listing page.
///
/// Cards whose title link does not point at a known source host are
/// skipped.
///
/// # Arguments
/// * `document` - Parsed listing page
/// * `resolver` - Source table used to turn card links into identifiers
pub fn parse_update_items(document: &Html, resolver: &SourceResolver) -> Result<Vec<UpdateItem>> {
    let cards = Query::parse("div.content-genres-item")?;
    let fields = CardQueries::new()?;

    let mut items = Vec::new();
    for card in selector::select(document, &cards) {
        match parse_card(card, &fields, resolver) {
            Some(item) => items.push(item),
            None => tracing::debug!("skipping listing card without a resolvable title link"),
        }
    }

    Ok(items)
}

/// Compiled per-card queries, built once per page.
struct CardQueries {
    title: Query,
    thumbnail: Query,
    rating: Query,
    chapter: Query,
    views: Query,
    updated: Query,
    author: Query,
    description: Query,
}

impl CardQueries {
    fn new() -> Result<Self> {
        Ok(Self {
            title: Query::parse("a.genres-item-name")?,
            thumbnail: Query::parse("a.genres-item-img img")?,
            rating: Query::parse("em.genres-item-rate")?,
            chapter: Query::parse("a.genres-item-chap")?,
            views: Query::parse("span.genres-item-view")?,
            updated: Query::parse("span.genres-item-time")?,
            author: Query::parse("span.genres-item-author")?,
            description: Query::parse("div.genres-item-description")?,
        })
    }
}

fn parse_card(
    card: ElementRef<'_>,
    q: &CardQueries,
    resolver: &SourceResolver,
) -> Option<UpdateItem> {
    let link = selector::select(card, &q.title).next()?;
    let url = link.value().attr("href")?.trim().to_string();
    let id = resolver.identify(&url)?;
    let title = selector::element_text(&link)
        .or_else(|| link.value().attr("title").map(selector::normalize_text))
        .filter(|t| !t.is_empty())?;

    let thumbnail = selector::first_attr(card, &q.thumbnail, "src");

    let rating = selector::first_text(card, &q.rating).and_then(|r| r.parse::<f32>().ok());

    let latest_chapters = selector::select(card, &q.chapter)
        .filter_map(|a| {
            Some(Chapter {
                label: selector::element_text(&a)?,
                url: a.value().attr("href")?.trim().to_string(),
                views: None,
                uploaded: None,
            })
        })
        .collect();

    let authors = selector::first_text(card, &q.author)
        .map(|a| split_list(&a, ','))
        .unwrap_or_default();

    Some(UpdateItem {
        id,
        title,
        url,
        thumbnail,
        latest_chapters,
        updated: selector::first_text(card, &q.updated),
        rating,
        views: selector::first_text(card, &q.views),
        authors,
        description: selector::first_text(card, &q.description),
    })
}

/// Split a delimited label into trimmed, non-empty parts.
pub(crate) fn split_list(text: &str, delimiter: char) -> Vec<String> {
    text.split(delimiter)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse the total page count from the listing's last-page control.
///
/// # Errors
/// `MangaError::PaginationNotFound` when the control is missing, its label
/// has no number, or the number is zero.
pub fn parse_total_pages(document: &Html) -> Result<u32> {
    let query = Query::parse(LAST_PAGE_SELECTOR)?;
    let label = selector::last_text(document, &query)
        .ok_or_else(|| MangaError::PaginationNotFound(LAST_PAGE_SELECTOR.to_string()))?;

    match extract_page_count(&label) {
        Some(count) if count > 0 => Ok(count),
        _ => Err(MangaError::PaginationNotFound(format!(
            "no page count in label {:?}",
            label
        ))),
    }
}

/// Extract the page count from a pagination label.
///
/// Takes the first numeric run (optionally with a decimal part) and keeps
/// its integer part.
///
/// # Examples
/// ```
/// use manganato_core::parser::extract_page_count;
///
/// assert_eq!(extract_page_count("LAST(1654)"), Some(1654));
/// assert_eq!(extract_page_count("123.0"), Some(123));
/// assert_eq!(extract_page_count("Page 1 of 123"), Some(1));
/// assert_eq!(extract_page_count("LAST"), None);
/// ```
pub fn extract_page_count(label: &str) -> Option<u32> {
    let re = regex_lite::Regex::new(r"\d+\.\d+|\d+").ok()?;
    let number = re.find(label)?.as_str();
    let integer_part = number.split('.').next()?;
    integer_part.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(cards: &str, pagination: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><body>
                 <div class="panel-content-genres">{}</div>
                 <div class="panel-page-number">{}</div>
               </body></html>"#,
            cards, pagination
        ))
    }

    const CARD: &str = r#"
        <div class="content-genres-item">
          <a class="genres-item-img bookmark_check" href="https://chapmanganato.to/manga-aa951409" title="Solo Leveling">
            <img class="img-loading" src="https://avt.example.com/thumb/aa951409.jpg" alt="Solo Leveling" />
            <em class="genres-item-rate">4.8</em>
          </a>
          <div class="genres-item-info">
            <h3><a class="genres-item-name text-nowrap a-h" href="https://chapmanganato.to/manga-aa951409">Solo Leveling</a></h3>
            <a class="genres-item-chap text-nowrap a-h" href="https://chapmanganato.to/manga-aa951409/chapter-200">Chapter 200</a>
            <p class="genres-item-view-time text-nowrap">
              <span class="genres-item-view">12.3M</span>
              <span class="genres-item-time">Oct 17,24</span>
              <span class="genres-item-author">Chugong, Dubu</span>
            </p>
            <div class="genres-item-description">  A weak hunter
              grows stronger. </div>
          </div>
        </div>"#;

    #[test]
    fn test_parse_card_fields() {
        let doc = listing(CARD, "");
        let items = parse_update_items(&doc, &SourceResolver::default()).unwrap();
        assert_eq!(items.len(), 1);

        let item = &items[0];
        assert_eq!(item.id.to_string(), "cu-manga-aa951409");
        assert_eq!(item.title, "Solo Leveling");
        assert_eq!(item.url, "https://chapmanganato.to/manga-aa951409");
        assert_eq!(
            item.thumbnail.as_deref(),
            Some("https://avt.example.com/thumb/aa951409.jpg")
        );
        assert_eq!(item.rating, Some(4.8));
        assert_eq!(item.latest_chapters.len(), 1);
        assert_eq!(item.latest_chapters[0].label, "Chapter 200");
        assert_eq!(item.views.as_deref(), Some("12.3M"));
        assert_eq!(item.updated.as_deref(), Some("Oct 17,24"));
        assert_eq!(item.authors, vec!["Chugong", "Dubu"]);
        assert_eq!(item.description.as_deref(), Some("A weak hunter grows stronger."));
    }

    #[test]
    fn test_card_on_unknown_host_is_skipped() {
        let foreign = CARD.replace("https://chapmanganato.to", "https://elsewhere.example");
        let doc = listing(&foreign, "");
        let items = parse_update_items(&doc, &SourceResolver::default()).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_empty_listing_has_no_items() {
        let doc = listing("", "");
        assert!(parse_update_items(&doc, &SourceResolver::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_total_pages_from_last_control() {
        let doc = listing(
            "",
            r#"<div class="group-page">
                 <a class="page-blue" href="/genre-all">FIRST(1)</a>
                 <a class="page-select">1</a>
                 <a href="/genre-all/2">2</a>
                 <a class="page-blue page-last" href="/genre-all/1654">LAST(1654)</a>
               </div>"#,
        );
        assert_eq!(parse_total_pages(&doc).unwrap(), 1654);
    }

    #[test]
    fn test_total_pages_decimal_label() {
        let doc = listing(
            "",
            r#"<div class="group-page"><a class="page-blue page-last">123.0</a></div>"#,
        );
        assert_eq!(parse_total_pages(&doc).unwrap(), 123);
    }

    #[test]
    fn test_missing_pagination_is_error() {
        let doc = listing(CARD, "");
        assert!(matches!(
            parse_total_pages(&doc),
            Err(MangaError::PaginationNotFound(_))
        ));
    }

    #[test]
    fn test_label_without_digits_is_error() {
        let doc = listing(
            "",
            r#"<div class="group-page"><a class="page-blue page-last">LAST</a></div>"#,
        );
        assert!(matches!(
            parse_total_pages(&doc),
            Err(MangaError::PaginationNotFound(_))
        ));
    }

    #[test]
    fn test_zero_page_count_is_error() {
        let doc = listing(
            "",
            r#"<div class="group-page"><a class="page-blue page-last">LAST(0)</a></div>"#,
        );
        assert!(parse_total_pages(&doc).is_err());
    }

    #[test]
    fn test_extract_page_count_takes_first_number() {
        assert_eq!(extract_page_count("Page 1 of 123"), Some(1));
        assert_eq!(extract_page_count("LAST(12.5)"), Some(12));
        assert_eq!(extract_page_count(""), None);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" a , b ,, c ", ','), vec!["a", "b", "c"]);
        assert!(split_list("  ", ',').is_empty());
    }
}

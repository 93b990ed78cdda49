//! Title detail page parser
//!
//! Parses a title page (`{host}/{slug}`) into a `MangaDetail`.

use scraper::{ElementRef, Html};

use crate::error::{MangaError, Result};
use crate::types::{Chapter, MangaDetail, SourceIdentifier};

use super::listing::split_list;
use super::selector::{self, Query};

/// Parse a title detail page.
///
/// # Arguments
/// * `html` - Raw HTML content of the detail page
/// * `id` - Identifier the page was fetched for (copied into the result)
///
/// # Returns
/// * `Ok(MangaDetail)` with parsed title information
/// * `Err(MangaError::NotFound)` if the page has no title heading
pub fn parse_manga_detail(html: &str, id: &SourceIdentifier) -> Result<MangaDetail> {
    let document = Html::parse_document(html);

    let title_query = Query::parse("div.story-info-right h1")?;
    let title = selector::first_text(&document, &title_query)
        .ok_or_else(|| MangaError::NotFound(id.to_string()))?;

    let info = parse_info_table(&document)?;
    let extent = parse_extent(&document)?;

    let cover_query = Query::parse("div.story-info-left span.info-image img")?;
    let cover = selector::first_attr(&document, &cover_query, "src");

    let rating_query = Query::parse("em#rate_row_cmd")?;
    let rating = selector::first_text(&document, &rating_query);

    Ok(MangaDetail {
        id: id.clone(),
        title,
        alternative_titles: info.alternative_titles,
        authors: info.authors,
        status: info.status,
        genres: info.genres,
        description: extract_description(&document)?,
        chapters: parse_chapters(&document)?,
        cover,
        updated: extent.updated,
        views: extent.views,
        rating,
    })
}

#[derive(Default)]
struct InfoTable {
    alternative_titles: Vec<String>,
    authors: Vec<String>,
    status: Option<String>,
    genres: Vec<String>,
}

/// Read the label/value rows of the info table.
fn parse_info_table(document: &Html) -> Result<InfoTable> {
    let rows = Query::parse("table.variations-tableInfo tr")?;
    let label = Query::parse("td.table-label")?;
    let value = Query::parse("td.table-value")?;
    let links = Query::parse("a")?;

    let mut info = InfoTable::default();

    for row in selector::select(document, &rows) {
        let Some(key) = selector::first_text(row, &label) else {
            continue;
        };
        let Some(cell) = selector::select(row, &value).next() else {
            continue;
        };
        let key = key.to_lowercase();

        if key.starts_with("alternative") {
            info.alternative_titles = selector::element_text(&cell)
                .map(|t| split_list(&t, ';'))
                .unwrap_or_default();
        } else if key.starts_with("author") {
            info.authors = linked_values(cell, &links);
        } else if key.starts_with("status") {
            info.status = selector::element_text(&cell);
        } else if key.starts_with("genre") {
            info.genres = linked_values(cell, &links);
        }
    }

    Ok(info)
}

/// Link texts of a cell, falling back to its `-` separated text.
fn linked_values(cell: ElementRef<'_>, links: &Query) -> Vec<String> {
    let values: Vec<String> = selector::texts(cell, links).collect();
    if !values.is_empty() {
        return values;
    }
    selector::element_text(&cell)
        .map(|t| split_list(&t, '-'))
        .unwrap_or_default()
}

#[derive(Default)]
struct Extent {
    updated: Option<String>,
    views: Option<String>,
}

/// Read the "Updated" / "View" lines beside the info table.
fn parse_extent(document: &Html) -> Result<Extent> {
    let rows = Query::parse("div.story-info-right-extent p")?;
    let label = Query::parse("span.stre-label")?;
    let value = Query::parse("span.stre-value")?;

    let mut extent = Extent::default();

    for row in selector::select(document, &rows) {
        let key = selector::first_text(row, &label)
            .unwrap_or_default()
            .to_lowercase();
        let text = selector::first_text(row, &value);

        if key.starts_with("updated") {
            extent.updated = text;
        } else if key.starts_with("view") {
            extent.views = text;
        }
    }

    Ok(extent)
}

/// Synopsis text without its "Description :" heading.
fn extract_description(document: &Html) -> Result<Option<String>> {
    let query = Query::parse("div#panel-story-info-description, div.panel-story-info-description")?;

    let description = selector::first_text(document, &query).map(|text| {
        text.strip_prefix("Description :")
            .or_else(|| text.strip_prefix("Description:"))
            .unwrap_or(&text)
            .trim()
            .to_string()
    });

    Ok(description.filter(|d| !d.is_empty()))
}

/// Parse the chapter list in upstream order.
fn parse_chapters(document: &Html) -> Result<Vec<Chapter>> {
    let rows = Query::parse("ul.row-content-chapter li")?;
    let name = Query::parse("a.chapter-name")?;
    let views = Query::parse("span.chapter-view")?;
    let time = Query::parse("span.chapter-time")?;

    let chapters = selector::select(document, &rows)
        .filter_map(|row| {
            let link = selector::select(row, &name).next()?;
            Some(Chapter {
                label: selector::element_text(&link)?,
                url: link.value().attr("href")?.trim().to_string(),
                views: selector::first_text(row, &views),
                uploaded: selector::first_attr(row, &time, "title")
                    .or_else(|| selector::first_text(row, &time)),
            })
        })
        .collect();

    Ok(chapters)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL: &str = r##"
        <html><body>
          <div class="panel-story-info">
            <div class="story-info-left">
              <span class="info-image"><img class="img-loading" src="https://avt.example.com/cover/aa951409.jpg" alt="Solo Leveling" /></span>
            </div>
            <div class="story-info-right">
              <h1>Solo Leveling</h1>
              <table class="variations-tableInfo"><tbody>
                <tr><td class="table-label"><i class="info-alternative"></i>Alternative :</td>
                    <td class="table-value"><h2>나 혼자만 레벨업 ; Only I Level Up</h2></td></tr>
                <tr><td class="table-label"><i class="info-author"></i>Author(s) :</td>
                    <td class="table-value"><a class="a-h" href="#">Chugong</a> - <a class="a-h" href="#">Dubu</a></td></tr>
                <tr><td class="table-label"><i class="info-status"></i>Status :</td>
                    <td class="table-value">Completed</td></tr>
                <tr><td class="table-label"><i class="info-genres"></i>Genres :</td>
                    <td class="table-value"><a class="a-h">Action</a> - <a class="a-h">Fantasy</a></td></tr>
              </tbody></table>
              <div class="story-info-right-extent">
                <p><span class="stre-label">Updated :</span><span class="stre-value">Oct 17,2024 - 10:12 AM</span></p>
                <p><span class="stre-label">View :</span><span class="stre-value">120.5M</span></p>
                <p><em id="rate_row_cmd">rate : 4.8 / 5 - 99,001 votes</em></p>
              </div>
            </div>
          </div>
          <div class="panel-story-info-description" id="panel-story-info-description">
            <h3>Description :</h3>
            10 years ago, after "the Gate" opened...
          </div>
          <div class="panel-story-chapter-list">
            <ul class="row-content-chapter">
              <li class="a-h">
                <a class="chapter-name text-nowrap" href="https://chapmanganato.to/manga-aa951409/chapter-200">Chapter 200</a>
                <span class="chapter-view text-nowrap">1.2M</span>
                <span class="chapter-time text-nowrap" title="Dec 29,2021 12:00">Dec 29,21</span>
              </li>
              <li class="a-h">
                <a class="chapter-name text-nowrap" href="https://chapmanganato.to/manga-aa951409/chapter-199">Chapter 199</a>
                <span class="chapter-view text-nowrap">1.1M</span>
                <span class="chapter-time text-nowrap">Dec 20,21</span>
              </li>
            </ul>
          </div>
        </body></html>
    "##;

    fn id() -> SourceIdentifier {
        SourceIdentifier::new("cu", "manga-aa951409").unwrap()
    }

    #[test]
    fn test_parse_detail_fields() {
        let detail = parse_manga_detail(DETAIL, &id()).unwrap();

        assert_eq!(detail.id, id());
        assert_eq!(detail.title, "Solo Leveling");
        assert_eq!(detail.alternative_titles, vec!["나 혼자만 레벨업", "Only I Level Up"]);
        assert_eq!(detail.authors, vec!["Chugong", "Dubu"]);
        assert_eq!(detail.status.as_deref(), Some("Completed"));
        assert_eq!(detail.genres, vec!["Action", "Fantasy"]);
        assert_eq!(
            detail.cover.as_deref(),
            Some("https://avt.example.com/cover/aa951409.jpg")
        );
        assert_eq!(detail.updated.as_deref(), Some("Oct 17,2024 - 10:12 AM"));
        assert_eq!(detail.views.as_deref(), Some("120.5M"));
        assert_eq!(detail.rating.as_deref(), Some("rate : 4.8 / 5 - 99,001 votes"));
        assert_eq!(
            detail.description.as_deref(),
            Some("10 years ago, after \"the Gate\" opened...")
        );
    }

    #[test]
    fn test_parse_chapters() {
        let detail = parse_manga_detail(DETAIL, &id()).unwrap();
        assert_eq!(detail.chapters.len(), 2);

        let newest = &detail.chapters[0];
        assert_eq!(newest.label, "Chapter 200");
        assert_eq!(
            newest.url,
            "https://chapmanganato.to/manga-aa951409/chapter-200"
        );
        assert_eq!(newest.views.as_deref(), Some("1.2M"));
        assert_eq!(newest.uploaded.as_deref(), Some("Dec 29,2021 12:00"));

        // Falls back to visible text when the title attribute is absent
        assert_eq!(detail.chapters[1].uploaded.as_deref(), Some("Dec 20,21"));
    }

    #[test]
    fn test_missing_title_is_not_found() {
        let html = r#"<html><body><div class="panel-not-found"><p>404 - PAGE NOT FOUND</p></div></body></html>"#;
        match parse_manga_detail(html, &id()) {
            Err(MangaError::NotFound(what)) => assert_eq!(what, "cu-manga-aa951409"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_authors_without_links() {
        let html = r#"<div class="story-info-right"><h1>T</h1>
            <table class="variations-tableInfo"><tr>
              <td class="table-label">Author(s) :</td>
              <td class="table-value">Alice - Bob</td>
            </tr></table></div>"#;
        let detail = parse_manga_detail(html, &id()).unwrap();
        assert_eq!(detail.authors, vec!["Alice", "Bob"]);
        assert!(detail.chapters.is_empty());
        assert!(detail.description.is_none());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let first = parse_manga_detail(DETAIL, &id()).unwrap();
        let second = parse_manga_detail(DETAIL, &id()).unwrap();
        assert_eq!(first, second);
    }
}

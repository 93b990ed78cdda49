//! Selector engine over parsed HTML
//!
//! Thin query layer on top of `scraper`: compile a CSS selector once, then
//! evaluate it against a document or element to get elements, normalized
//! text, or attribute values. A query that matches nothing yields `None` or
//! an empty iterator, never an error.

use scraper::{ElementRef, Html, Selector};

use crate::error::{MangaError, Result};

/// A compiled selector query
#[derive(Debug, Clone)]
pub struct Query {
    selector: Selector,
}

impl Query {
    /// Compile a CSS selector.
    ///
    /// # Errors
    /// `MangaError::ParseError` if the selector is malformed.
    pub fn parse(css: &str) -> Result<Self> {
        let selector = Selector::parse(css)
            .map_err(|e| MangaError::ParseError(format!("Invalid selector {:?}: {:?}", css, e)))?;
        Ok(Self { selector })
    }
}

/// Anything a query can be evaluated against.
pub trait Scope<'a> {
    fn root(&self) -> ElementRef<'a>;
}

impl<'a> Scope<'a> for &'a Html {
    fn root(&self) -> ElementRef<'a> {
        let html: &'a Html = *self;
        html.root_element()
    }
}

impl<'a> Scope<'a> for ElementRef<'a> {
    fn root(&self) -> ElementRef<'a> {
        *self
    }
}

/// Lazily iterate over matching elements in document order.
pub fn select<'a, 'q, S: Scope<'a>>(
    scope: S,
    query: &'q Query,
) -> impl Iterator<Item = ElementRef<'a>> + 'q
where
    'a: 'q,
{
    scope.root().select(&query.selector)
}

/// Collapse runs of whitespace and trim.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized inner text of an element, `None` when blank.
pub fn element_text(element: &ElementRef<'_>) -> Option<String> {
    let text = normalize_text(&element.text().collect::<String>());
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Lazily iterate over the non-blank texts of matching elements.
pub fn texts<'a, 'q, S: Scope<'a>>(
    scope: S,
    query: &'q Query,
) -> impl Iterator<Item = String> + use<'a, 'q, S>
where
    'a: 'q,
{
    select(scope, query).filter_map(|el| element_text(&el))
}

/// Text of the first match that has any.
pub fn first_text<'a, S: Scope<'a>>(scope: S, query: &Query) -> Option<String> {
    texts(scope, query).next()
}

/// Text of the last match that has any.
pub fn last_text<'a, S: Scope<'a>>(scope: S, query: &Query) -> Option<String> {
    texts(scope, query).last()
}

/// Lazily iterate over a non-blank attribute of matching elements.
pub fn attrs<'a, 'q, S: Scope<'a>>(
    scope: S,
    query: &'q Query,
    attr: &'q str,
) -> impl Iterator<Item = String> + use<'a, 'q, S>
where
    'a: 'q,
{
    select(scope, query).filter_map(move |el| {
        el.value()
            .attr(attr)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    })
}

/// Attribute of the first match that carries it.
pub fn first_attr<'a, S: Scope<'a>>(scope: S, query: &Query, attr: &str) -> Option<String> {
    attrs(scope, query, attr).next()
}

//! HTML extraction helpers: selector-fallback chains and text cleanup.
//!
//! Scraped providers change their markup often, so every lookup is an
//! ordered list of alternatives. The first alternative that produces
//! something wins; running out of alternatives is never an error.

use scraper::{ElementRef, Html, Selector};

use crate::error::{EngineError, Result};

/// Parse a single CSS selector.
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| EngineError::Parse(format!("invalid selector {css:?}: {e:?}")))
}

/// An ordered list of CSS selectors tried in sequence.
#[derive(Debug)]
pub struct SelectorChain {
    selectors: Vec<Selector>,
}

impl SelectorChain {
    /// Compile every selector in `css`, most specific first.
    pub fn parse(css: &[&str]) -> Result<Self> {
        let selectors = css.iter().map(|s| selector(s)).collect::<Result<Vec<_>>>()?;
        Ok(Self { selectors })
    }

    /// All matches of the first selector that matches anything in `document`.
    pub fn select_document<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        self.selectors
            .iter()
            .map(|sel| document.select(sel).collect::<Vec<_>>())
            .find(|matches| !matches.is_empty())
            .unwrap_or_default()
    }

    /// First element under `scope` matched by the earliest matching selector.
    pub fn first_element<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.selectors
            .iter()
            .find_map(|sel| scope.select(sel).next())
    }

    /// Text of the first element, across the whole chain, whose text is
    /// non-empty.
    pub fn first_text(&self, scope: ElementRef<'_>) -> Option<String> {
        self.selectors.iter().find_map(|sel| {
            scope
                .select(sel)
                .next()
                .map(extract_text)
                .filter(|text| !text.is_empty())
        })
    }
}

/// Text content of `element` with whitespace runs collapsed to one space.
pub fn extract_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Text content of `element`, skipping any subtree matched by `excluded`.
pub fn extract_text_excluding(element: ElementRef<'_>, excluded: &Selector) -> String {
    let root = element.id();
    let mut raw = String::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .take_while(|ancestor| ancestor.id() != root)
            .filter_map(ElementRef::wrap)
            .any(|ancestor| excluded.matches(&ancestor));
        if !hidden {
            raw.push_str(text);
        }
    }
    collapse_whitespace(&raw)
}

/// Collapse runs of whitespace and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The parent element of `element`, if any.
pub fn parent_element<'a>(element: ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.parent().and_then(ElementRef::wrap)
}

/// Child elements of `element` in document order.
pub fn child_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

/// Element siblings following `element` in document order.
pub fn following_sibling_elements<'a>(
    element: ElementRef<'a>,
) -> impl Iterator<Item = ElementRef<'a>> {
    element.next_siblings().filter_map(ElementRef::wrap)
}

/// Whether the `class` attribute of `element` contains `needle` as a substring.
pub fn class_contains(element: ElementRef<'_>, needle: &str) -> bool {
    element
        .value()
        .attr("class")
        .is_some_and(|class| class.contains(needle))
}

/// `Some(text)` unless `text` is empty.
pub fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

//! Bing Shopping: scraped HTML from `www.bing.com/shop`.
//!
//! Bing wraps outbound links in `https://www.bing.com/ck/a?...&u=a1<base64>`
//! redirects, which are decoded back to the merchant URL. When Bing rate
//! limits it quietly serves page one instead of the requested page; the
//! result-count banner is used to tell that apart from running off the end.

use std::sync::LazyLock;

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use chrono::Utc;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::engine::{About, EngineAdapter, EngineInfo, ResultFormat};
use crate::error::{EngineError, Result};
use crate::extract::{
    child_elements, class_contains, extract_text, extract_text_excluding,
    following_sibling_elements, parent_element, selector, SelectorChain,
};
use crate::types::{Category, EngineResult, QueryParams, RawResponse, RequestSpec, ResultRecord};
use crate::url_encode::{query_param, urlencode};

const BASE_URL: &str = "https://www.bing.com/shop";
const REDIRECT_PREFIX: &str = "https://www.bing.com/ck/a?";
const PAGE_SIZE: u32 = 10;
const MAX_RESULTS: usize = 20;
const MAX_FALLBACK_RESULTS: usize = 10;

/// Result link candidates, most specific first.
const LINK_SELECTORS: &[&str] = &[
    r#"div[class*="iusc"] a"#,
    r#"li[class*="b_algo"] h2 a"#,
    r#"a[href*="/shop/"]"#,
    r#"a[href*="bing.com/shop"]"#,
];

/// "11-20" range prefix of the `sb_count` banner.
static COUNT_RANGE: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"([\d.,]+)\s*-\s*[\d.,]+"));

/// Organic web results, used when no shopping link produced a result.
const FALLBACK_SELECTOR: &str = r#"ol#b_results > li[class*="b_algo"]"#;

static INFO: EngineInfo = EngineInfo {
    name: "bing_shopping",
    categories: &[Category::Shopping],
    paging: true,
    max_page: Some(200),
    time_range_support: true,
    safesearch: true,
    results_per_page: Some(PAGE_SIZE),
    about: About {
        website: "https://www.bing.com",
        wikidata_id: "Q182496",
        official_api_documentation: Some(
            "https://www.microsoft.com/en-us/bing/apis/bing-web-search-api",
        ),
        use_official_api: false,
        require_api_key: false,
        results: ResultFormat::Html,
        language: None,
    },
};

/// Bing Shopping HTML scraper.
pub struct BingShoppingEngine;

impl EngineAdapter for BingShoppingEngine {
    fn info(&self) -> &'static EngineInfo {
        &INFO
    }

    fn request(&self, query: &str, params: &QueryParams, spec: &mut RequestSpec) -> Result<()> {
        tracing::trace!(query, "Bing shopping request");
        spec.url = build_url(query, params, Utc::now().timestamp())?;
        Ok(())
    }

    fn response(&self, resp: &RawResponse) -> Result<Vec<EngineResult>> {
        tracing::trace!(bytes = resp.text.len(), "Bing shopping response received");
        parse_bing_shopping_html(&resp.text, resp.params.pageno)
    }
}

/// 1-based index of the first result on `pageno`.
fn page_offset(pageno: u32) -> u64 {
    u64::from(pageno.saturating_sub(1)) * u64::from(PAGE_SIZE) + 1
}

/// Bing's `ez` filter code for a time range, relative to `unix_day`.
fn time_range_code(range: &str, unix_day: i64) -> Option<String> {
    match range {
        "day" => Some("1".into()),
        "week" => Some("2".into()),
        "month" => Some("3".into()),
        "year" => Some(format!("5_{}_{unix_day}", unix_day - 365)),
        _ => None,
    }
}

/// Search URL for `query`, with time buckets relative to `now` (Unix seconds).
///
/// Unlike the other engines, an unrecognised time range is an error here.
fn build_url(query: &str, params: &QueryParams, now: i64) -> Result<String> {
    let mut pairs = vec![("q", query.to_string())];
    if params.pageno > 1 {
        pairs.push(("first", page_offset(params.pageno).to_string()));
    }

    let mut url = format!("{BASE_URL}?{}", urlencode(&pairs));

    if let Some(range) = params.time_range.as_deref().filter(|r| !r.is_empty()) {
        let code = time_range_code(range, now / 86_400)
            .ok_or_else(|| EngineError::UnknownTimeRange(range.to_string()))?;
        url.push_str(&format!("&filters=ex1:\"ez{code}\""));
    }

    Ok(url)
}

/// Resolve a Bing `ck/a` tracking link to its target; other links pass through.
///
/// # Errors
///
/// Returns [`EngineError::Protocol`] when the wrapper cannot be decoded.
pub(crate) fn unwrap_redirect(href: &str) -> Result<String> {
    if !href.starts_with(REDIRECT_PREFIX) {
        return Ok(href.to_string());
    }

    let param = query_param(href, "u")
        .ok_or_else(|| EngineError::Protocol("Bing redirect without u parameter".into()))?;

    // The payload is base64url behind a two-character marker ("a1") with
    // its padding stripped.
    let encoded = param
        .get(2..)
        .ok_or_else(|| EngineError::Protocol("Bing redirect parameter too short".into()))?;
    let mut padded = encoded.to_string();
    padded.extend(std::iter::repeat('=').take((4 - encoded.len() % 4) % 4));

    let bytes = URL_SAFE.decode(padded.as_bytes()).map_err(|e| {
        tracing::debug!(error = %e, "Bing redirect decode failed");
        EngineError::Protocol(format!("undecodable Bing redirect: {e}"))
    })?;

    String::from_utf8(bytes)
        .map_err(|e| EngineError::Protocol(format!("Bing redirect is not UTF-8: {e}")))
}

/// Selectors used by the per-link content lookups.
struct ContentSelectors {
    iusc: Selector,
    paragraph: Selector,
}

/// A content lookup relative to a result link.
type ContentLookup = fn(ElementRef<'_>, &ContentSelectors) -> Option<String>;

/// Content lookups, tried in order until one yields text.
const CONTENT_LOOKUPS: &[ContentLookup] = &[nested_tile_text, caption_text, sibling_text];

/// `div.iusc` nested inside a `div.iusc` next to the link.
fn nested_tile_text(link: ElementRef<'_>, sel: &ContentSelectors) -> Option<String> {
    let parent = parent_element(link)?;
    child_elements(parent)
        .filter(|div| div.value().name() == "div" && div.value().attr("class") == Some("iusc"))
        .find_map(|div| div.select(&sel.iusc).next())
        .map(extract_text)
}

/// First paragraph of the `b_caption` block belonging to the link's heading.
fn caption_text(link: ElementRef<'_>, sel: &ContentSelectors) -> Option<String> {
    let grandparent = parent_element(link).and_then(parent_element)?;
    child_elements(grandparent)
        .filter(|div| div.value().name() == "div" && class_contains(*div, "b_caption"))
        .find_map(|div| div.select(&sel.paragraph).next())
        .map(extract_text)
}

/// First paragraph in a `div` following the link's container.
fn sibling_text(link: ElementRef<'_>, sel: &ContentSelectors) -> Option<String> {
    let parent = parent_element(link)?;
    following_sibling_elements(parent)
        .filter(|div| div.value().name() == "div")
        .find_map(|div| div.select(&sel.paragraph).next())
        .map(extract_text)
}

/// Parse a Bing Shopping page into results plus the sideband hit count.
///
/// Extracted as a separate function for testability with mock HTML.
pub(crate) fn parse_bing_shopping_html(html: &str, pageno: u32) -> Result<Vec<EngineResult>> {
    let document = Html::parse_document(html);

    let mut records = parse_shopping_links(&document)?;
    if records.is_empty() {
        records = parse_organic_results(&document)?;
        tracing::debug!(count = records.len(), "Bing shopping fell back to organic results");
    }

    let mut number_of_results = 0;

    if !records.is_empty() {
        let (start, total) = parse_result_count(&count_banner(&document)?)?;
        number_of_results = total;

        let expected_start = page_offset(pageno);
        if expected_start != start {
            if expected_start > total {
                tracing::debug!(expected_start, total, "Bing page past the last result");
                return Ok(Vec::new());
            }
            // Bing answers rate-limited clients with page one instead of
            // the page they asked for.
            tracing::warn!(expected_start, start, "Bing served an unexpected page");
            return Err(EngineError::Protocol(format!(
                "expected results to start at {expected_start}, but got results starting at {start}"
            )));
        }
    }

    tracing::debug!(count = records.len(), "Bing shopping results parsed");

    let mut results: Vec<EngineResult> = records.into_iter().map(EngineResult::from).collect();
    results.push(EngineResult::NumberOfResults { number_of_results });
    Ok(results)
}

/// Results from shopping tiles and product links.
fn parse_shopping_links(document: &Html) -> Result<Vec<ResultRecord>> {
    let links = SelectorChain::parse(LINK_SELECTORS)?;
    let content_sel = ContentSelectors {
        iusc: selector(r#"div[class="iusc"]"#)?,
        paragraph: selector("p")?,
    };

    let mut records = Vec::new();

    for link in links.select_document(document) {
        let href = match link.value().attr("href") {
            Some(h) if !h.is_empty() => h,
            _ => continue,
        };

        let title = extract_text(link);
        if title.is_empty() {
            continue;
        }

        let url = unwrap_redirect(href)?;

        let content = CONTENT_LOOKUPS
            .iter()
            .find_map(|lookup| lookup(link, &content_sel).filter(|text| !text.is_empty()))
            .unwrap_or_default();

        records.push(ResultRecord {
            content: Some(content),
            ..ResultRecord::new(title, url)
        });

        if records.len() >= MAX_RESULTS {
            break;
        }
    }

    Ok(records)
}

/// Results from the generic organic result list.
fn parse_organic_results(document: &Html) -> Result<Vec<ResultRecord>> {
    let result_sel = selector(FALLBACK_SELECTOR)?;
    let link_sel = selector("h2 > a")?;
    let paragraph_sel = selector("p")?;
    let slug_icon_sel = selector(r#"span[class="algoSlug_icon"]"#)?;

    let mut records = Vec::new();

    for element in document.select(&result_sel) {
        let link = match element.select(&link_sel).next() {
            Some(el) => el,
            None => continue,
        };

        let href = match link.value().attr("href") {
            Some(h) if !h.is_empty() => h,
            _ => continue,
        };

        let title = extract_text(link);
        if title.is_empty() {
            continue;
        }

        let url = unwrap_redirect(href)?;

        let content = element
            .select(&paragraph_sel)
            .map(|p| extract_text_excluding(p, &slug_icon_sel))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        records.push(ResultRecord {
            content: Some(content),
            ..ResultRecord::new(title, url)
        });

        if records.len() >= MAX_FALLBACK_RESULTS {
            break;
        }
    }

    Ok(records)
}

/// Raw text of the `sb_count` banner ("11-20 of 1,230 results").
fn count_banner(document: &Html) -> Result<String> {
    let count_sel = selector(r#"span[class="sb_count"]"#)?;
    Ok(document
        .select(&count_sel)
        .map(|el| el.text().collect::<String>())
        .collect())
}

/// Parse the banner into `(first result index, total results)`.
///
/// A banner without a range starts at 1; a missing total counts as 0.
fn parse_result_count(banner: &str) -> Result<(u64, u64)> {
    let range = COUNT_RANGE
        .as_ref()
        .map_err(|e| EngineError::Parse(format!("invalid count pattern: {e}")))?;

    let (start, rest) = match range.captures(banner) {
        Some(caps) => {
            let whole = caps.get(0).map_or(banner.len(), |m| m.end());
            let start = digits(&caps[1]).ok_or_else(|| {
                EngineError::Protocol(format!("unreadable result range in {banner:?}"))
            })?;
            (start, &banner[whole..])
        }
        None => (1, banner),
    };

    Ok((start, digits(rest).unwrap_or(0)))
}

/// The decimal digits of `text` as a number, ignoring everything else.
fn digits(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

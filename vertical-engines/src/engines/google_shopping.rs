//! Google Shopping: the shopping tab (`tbm=shop`) of `www.google.com/search`.
//!
//! Google's shopping markup uses obfuscated class names that change
//! without notice, so every field is looked up through a fallback chain.
//! Requests carry browser-like headers and consent cookies; without them
//! Google answers with a consent wall instead of results.

use scraper::{ElementRef, Html};

use crate::engine::{About, EngineAdapter, EngineInfo, ResultFormat};
use crate::error::Result;
use crate::extract::{extract_text, non_empty, selector, SelectorChain};
use crate::types::{
    Category, EngineResult, QueryParams, RawResponse, RequestSpec, ResultRecord, Template,
};
use crate::url_encode::{query_param, urlencode};

const BASE_URL: &str = "https://www.google.com/search";
const PAGE_SIZE: u32 = 10;
const MAX_RESULTS: usize = 20;
const MAX_FALLBACK_RESULTS: usize = 10;
const DEFAULT_LOCALE: &str = "en-US";
const DEFAULT_TITLE: &str = "Product";

/// Time-range key to Google's `qdr:` code. Unknown keys are ignored.
const TIME_RANGES: &[(&str, &str)] = &[("day", "d"), ("week", "w"), ("month", "m"), ("year", "y")];

const HEADERS: &[(&str, &str)] = &[
    ("User-Agent", "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"),
    ("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7"),
    ("Accept-Language", "en-US,en;q=0.9"),
    ("Accept-Encoding", "gzip, deflate, br"),
    ("DNT", "1"),
    ("Connection", "keep-alive"),
    ("Upgrade-Insecure-Requests", "1"),
    ("Sec-Fetch-Dest", "document"),
    ("Sec-Fetch-Mode", "navigate"),
    ("Sec-Fetch-Site", "none"),
    ("Sec-Fetch-User", "?1"),
    ("Cache-Control", "max-age=0"),
];

/// Consent cookies that skip Google's cookie wall.
const COOKIES: &[(&str, &str)] = &[
    ("CONSENT", "YES+"),
    ("SOCS", "CAESHAgBEhJnd3NfMjAyMzA4MTAtMF9SQzIaAmVuIAEaBgiA2NixBg"),
];

/// Product containers, most specific first; the last entry is the
/// general web-result block.
const CONTAINER_SELECTORS: &[&str] = &[
    r#"div[class*="sh-dgr__grid-result"]"#,
    r#"div[class*="sh-dlr__list-result"]"#,
    "div[data-docid]",
    r#"div[class*="u30d4"]"#,
    r#"div[class*="g"] div[class*="rc"]"#,
];
const LINK_SELECTORS: &[&str] = &[r#"a[href*="/shopping/product/"]"#, r#"a[href*="/url?"]"#];
const TITLE_SELECTORS: &[&str] = &[
    r#"h3[class*="tAxDx"]"#,
    r#"span[class*="translate-content"]"#,
    "a span",
];
const PRICE_SELECTORS: &[&str] = &[
    r#"span[class*="a8Pemb"]"#,
    r#"span[class*="OFFNJ"]"#,
    r#"span[class*="price"]"#,
];
const MERCHANT_SELECTORS: &[&str] = &[r#"div[class*="aULzUe"]"#, "cite"];
const RATING_SELECTORS: &[&str] = &[r#"span[class*="Rsc"]"#];
const REVIEWS_SELECTORS: &[&str] = &[r#"span[class*="Rsc"] ~ span"#];

const FALLBACK_SELECTOR: &str = r#"div[class*="g"] div[class*="rc"]"#;

static INFO: EngineInfo = EngineInfo {
    name: "google_shopping",
    categories: &[Category::Shopping],
    paging: true,
    max_page: Some(50),
    time_range_support: true,
    safesearch: true,
    results_per_page: Some(PAGE_SIZE),
    about: About {
        website: "https://shopping.google.com",
        wikidata_id: "Q9366",
        official_api_documentation: Some("https://developers.google.com/custom-search/"),
        use_official_api: false,
        require_api_key: false,
        results: ResultFormat::Html,
        language: None,
    },
};

/// Google Shopping HTML scraper.
pub struct GoogleShoppingEngine;

impl EngineAdapter for GoogleShoppingEngine {
    fn info(&self) -> &'static EngineInfo {
        &INFO
    }

    fn request(&self, query: &str, params: &QueryParams, spec: &mut RequestSpec) -> Result<()> {
        tracing::trace!(query, "Google shopping request");

        spec.url = build_url(query, params);
        for (name, value) in HEADERS {
            spec.headers.insert((*name).to_string(), (*value).to_string());
        }
        for (name, value) in COOKIES {
            spec.cookies.insert((*name).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn response(&self, resp: &RawResponse) -> Result<Vec<EngineResult>> {
        tracing::trace!(bytes = resp.text.len(), "Google shopping response received");
        parse_google_shopping_html(&resp.text)
    }
}

fn build_url(query: &str, params: &QueryParams) -> String {
    let mut pairs = vec![
        ("q", query.to_string()),
        ("tbm", "shop".to_string()),
        ("start", params.result_offset(PAGE_SIZE).to_string()),
    ];

    let locale = params.locale.as_deref().unwrap_or(DEFAULT_LOCALE);
    if locale != "all" {
        let language = locale.split('-').next().unwrap_or(locale);
        pairs.push(("hl", language.to_string()));
    }

    let qdr = params
        .time_range
        .as_deref()
        .and_then(|range| TIME_RANGES.iter().find(|(key, _)| *key == range));
    if let Some((_, code)) = qdr {
        pairs.push(("tbs", format!("qdr:{code}")));
    }

    format!("{BASE_URL}?{}", urlencode(&pairs))
}

/// Parse a Google Shopping page into results.
///
/// Extracted as a separate function for testability with mock HTML.
pub(crate) fn parse_google_shopping_html(html: &str) -> Result<Vec<EngineResult>> {
    let document = Html::parse_document(html);

    let mut records = parse_product_containers(&document)?;
    if records.is_empty() {
        records = parse_general_results(&document)?;
        tracing::debug!(count = records.len(), "Google shopping fell back to general results");
    }
    records.truncate(MAX_RESULTS);

    tracing::debug!(count = records.len(), "Google shopping results parsed");
    Ok(records.into_iter().map(EngineResult::from).collect())
}

/// Unwrap Google's `/url?url=...` redirect; other links pass through.
fn resolve_link(href: &str) -> String {
    if href.starts_with("/url?") {
        if let Some(target) = query_param(href, "url") {
            return target;
        }
    }
    href.to_string()
}

/// First non-blank text node under `element`.
fn first_text_node(element: ElementRef<'_>) -> Option<String> {
    element
        .text()
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

/// `Price: P | Seller: M | Rating: R (V)`, from whichever parts are present.
fn shopping_summary(price: &str, merchant: &str, rating: &str, reviews: &str) -> String {
    let mut parts = Vec::new();
    if !price.is_empty() {
        parts.push(format!("Price: {price}"));
    }
    if !merchant.is_empty() {
        parts.push(format!("Seller: {merchant}"));
    }
    match (rating.is_empty(), reviews.is_empty()) {
        (false, false) => parts.push(format!("Rating: {rating} ({reviews})")),
        (false, true) => parts.push(format!("Rating: {rating}")),
        _ => {}
    }
    parts.join(" | ")
}

fn parse_product_containers(document: &Html) -> Result<Vec<ResultRecord>> {
    let containers = SelectorChain::parse(CONTAINER_SELECTORS)?;
    let links = SelectorChain::parse(LINK_SELECTORS)?;
    let titles = SelectorChain::parse(TITLE_SELECTORS)?;
    let prices = SelectorChain::parse(PRICE_SELECTORS)?;
    let merchants = SelectorChain::parse(MERCHANT_SELECTORS)?;
    let ratings = SelectorChain::parse(RATING_SELECTORS)?;
    let reviews_chain = SelectorChain::parse(REVIEWS_SELECTORS)?;
    let img_sel = selector("img")?;

    let mut records = Vec::new();

    for container in containers.select_document(document) {
        let link = match links.first_element(container) {
            Some(el) => el,
            None => continue,
        };

        let url = match link.value().attr("href") {
            Some(h) if !h.is_empty() => resolve_link(h),
            _ => continue,
        };
        if !url.starts_with("http") {
            continue;
        }

        let title = titles
            .first_text(container)
            .or_else(|| first_text_node(link))
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        let thumbnail = container
            .select(&img_sel)
            .next()
            .and_then(|img| img.value().attr("src"))
            .filter(|src| src.starts_with("http") || src.starts_with("data:"))
            .map(str::to_string);

        let price = prices.first_text(container).unwrap_or_default();
        let merchant = merchants.first_text(container).unwrap_or_default();
        let rating = ratings.first_text(container).unwrap_or_default();
        let reviews = reviews_chain.first_text(container).unwrap_or_default();

        let content = shopping_summary(&price, &merchant, &rating, &reviews);

        records.push(ResultRecord {
            content: Some(content),
            thumbnail,
            price: non_empty(price),
            merchant: non_empty(merchant),
            rating: non_empty(rating),
            reviews: non_empty(reviews),
            template: Some(Template::Shopping),
            ..ResultRecord::new(title, url)
        });

        if records.len() >= MAX_RESULTS {
            break;
        }
    }

    Ok(records)
}

fn parse_general_results(document: &Html) -> Result<Vec<ResultRecord>> {
    let result_sel = selector(FALLBACK_SELECTOR)?;
    let link_sel = selector("a")?;
    let heading_sel = selector("h3")?;
    let snippet_sel = selector(r#"span[class*="aCOpRe"]"#)?;

    let mut records = Vec::new();

    for element in document.select(&result_sel) {
        let link = match element.select(&link_sel).next() {
            Some(el) => el,
            None => continue,
        };

        let url = match link.value().attr("href") {
            Some(h) if h.starts_with("http") => h.to_string(),
            _ => continue,
        };

        let title = element
            .select(&heading_sel)
            .next()
            .map(extract_text)
            .unwrap_or_else(|| extract_text(link));
        if title.is_empty() {
            continue;
        }

        let snippet = element
            .select(&snippet_sel)
            .next()
            .map(extract_text)
            .unwrap_or_default();

        records.push(ResultRecord {
            content: Some(snippet),
            template: Some(Template::Shopping),
            ..ResultRecord::new(title, url)
        });

        if records.len() >= MAX_FALLBACK_RESULTS {
            break;
        }
    }

    Ok(records)
}

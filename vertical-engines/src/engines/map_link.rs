//! Shared pieces of the deep-link map adapters.
//!
//! Map providers render their results client-side, so there is nothing to
//! scrape. These adapters answer with a single placeholder result pointing
//! at the provider's own search page for the query.

use crate::engine::{About, EngineInfo};
use crate::types::{Address, Category, EngineResult, ResultRecord, Template};
use crate::url_encode::quote;

/// Metadata common to every deep-link map adapter.
pub(crate) const fn info(name: &'static str, about: About) -> EngineInfo {
    EngineInfo {
        name,
        categories: &[Category::Map],
        paging: false,
        max_page: None,
        time_range_support: false,
        safesearch: false,
        results_per_page: None,
        about,
    }
}

/// Substitute the quoted query into a `{query}` URL template.
pub(crate) fn search_url(template: &str, query: &str) -> String {
    template.replace("{query}", &quote(query))
}

/// The single deep-link result for `query`, or nothing for an empty query.
pub(crate) fn deep_link(label: &str, template: &str, query: &str) -> Vec<EngineResult> {
    if query.is_empty() {
        return Vec::new();
    }

    let record = ResultRecord {
        template: Some(Template::Map),
        address: Some(Address {
            name: query.to_string(),
        }),
        ..ResultRecord::new(format!("{label}: {query}"), search_url(template, query))
    };

    tracing::debug!(label, "map deep link built");
    vec![record.into()]
}

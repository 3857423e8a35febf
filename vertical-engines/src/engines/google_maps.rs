//! Google Maps: deep link into `google.com/maps`.
//!
//! Google Maps is rendered client-side and guarded by aggressive bot
//! detection, so the adapter only links to Google's own search page.

use super::map_link;
use crate::engine::{About, EngineAdapter, EngineInfo, ResultFormat};
use crate::error::Result;
use crate::types::{EngineResult, QueryParams, RawResponse, RequestSpec};

const SEARCH_URL: &str = "https://www.google.com/maps/search/{query}";

static INFO: EngineInfo = map_link::info(
    "google_maps",
    About {
        website: "https://maps.google.com/",
        wikidata_id: "Q3269157",
        official_api_documentation: Some("https://developers.google.com/maps"),
        use_official_api: false,
        require_api_key: false,
        results: ResultFormat::Html,
        language: None,
    },
);

/// Google Maps deep-link adapter.
pub struct GoogleMapsEngine;

impl EngineAdapter for GoogleMapsEngine {
    fn info(&self) -> &'static EngineInfo {
        &INFO
    }

    fn request(&self, query: &str, _params: &QueryParams, spec: &mut RequestSpec) -> Result<()> {
        tracing::trace!(query, "Google Maps request");
        spec.url = map_link::search_url(SEARCH_URL, query);
        Ok(())
    }

    fn response(&self, resp: &RawResponse) -> Result<Vec<EngineResult>> {
        Ok(map_link::deep_link("Google Maps", SEARCH_URL, &resp.query))
    }
}

//! Bing Maps: deep link into `bing.com/maps`.

use super::map_link;
use crate::engine::{About, EngineAdapter, EngineInfo, ResultFormat};
use crate::error::Result;
use crate::types::{EngineResult, QueryParams, RawResponse, RequestSpec};

const SEARCH_URL: &str = "https://www.bing.com/maps?q={query}";

static INFO: EngineInfo = map_link::info(
    "bing_maps",
    About {
        website: "https://www.bing.com/maps/",
        wikidata_id: "Q181565",
        official_api_documentation: Some("https://docs.microsoft.com/en-us/bingmaps/"),
        use_official_api: false,
        require_api_key: false,
        results: ResultFormat::Html,
        language: None,
    },
);

/// Bing Maps deep-link adapter.
pub struct BingMapsEngine;

impl EngineAdapter for BingMapsEngine {
    fn info(&self) -> &'static EngineInfo {
        &INFO
    }

    fn request(&self, query: &str, _params: &QueryParams, spec: &mut RequestSpec) -> Result<()> {
        tracing::trace!(query, "Bing Maps request");
        spec.url = map_link::search_url(SEARCH_URL, query);
        Ok(())
    }

    fn response(&self, resp: &RawResponse) -> Result<Vec<EngineResult>> {
        Ok(map_link::deep_link("Bing Maps", SEARCH_URL, &resp.query))
    }
}

//! HERE WeGo: deep link into `wego.here.com`.

use super::map_link;
use crate::engine::{About, EngineAdapter, EngineInfo, ResultFormat};
use crate::error::Result;
use crate::types::{EngineResult, QueryParams, RawResponse, RequestSpec};

const SEARCH_URL: &str = "https://wego.here.com/search/{query}";

static INFO: EngineInfo = map_link::info(
    "here_maps",
    About {
        website: "https://wego.here.com/",
        wikidata_id: "Q571087",
        official_api_documentation: Some("https://developer.here.com/"),
        use_official_api: false,
        require_api_key: false,
        results: ResultFormat::Html,
        language: None,
    },
);

/// HERE Maps deep-link adapter.
pub struct HereMapsEngine;

impl EngineAdapter for HereMapsEngine {
    fn info(&self) -> &'static EngineInfo {
        &INFO
    }

    fn request(&self, query: &str, _params: &QueryParams, spec: &mut RequestSpec) -> Result<()> {
        tracing::trace!(query, "HERE Maps request");
        spec.url = map_link::search_url(SEARCH_URL, query);
        Ok(())
    }

    fn response(&self, resp: &RawResponse) -> Result<Vec<EngineResult>> {
        Ok(map_link::deep_link("HERE Maps", SEARCH_URL, &resp.query))
    }
}

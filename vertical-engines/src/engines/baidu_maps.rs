//! Baidu Maps: deep link into `map.baidu.com`.
//!
//! Baidu renders map results with JavaScript, so the adapter does not
//! scrape anything and links to Baidu's own search page instead.

use super::map_link;
use crate::engine::{About, EngineAdapter, EngineInfo, ResultFormat};
use crate::error::Result;
use crate::types::{EngineResult, QueryParams, RawResponse, RequestSpec};

const SEARCH_URL: &str = "https://map.baidu.com/search/{query}";

static INFO: EngineInfo = map_link::info(
    "baidu_maps",
    About {
        website: "https://map.baidu.com/",
        wikidata_id: "Q327143",
        official_api_documentation: Some("https://lbsyun.baidu.com/"),
        use_official_api: false,
        require_api_key: false,
        results: ResultFormat::Html,
        language: None,
    },
);

/// Baidu Maps deep-link adapter.
pub struct BaiduMapsEngine;

impl EngineAdapter for BaiduMapsEngine {
    fn info(&self) -> &'static EngineInfo {
        &INFO
    }

    fn request(&self, query: &str, _params: &QueryParams, spec: &mut RequestSpec) -> Result<()> {
        tracing::trace!(query, "Baidu Maps request");
        spec.url = map_link::search_url(SEARCH_URL, query);
        Ok(())
    }

    fn response(&self, resp: &RawResponse) -> Result<Vec<EngineResult>> {
        Ok(map_link::deep_link("Baidu Maps", SEARCH_URL, &resp.query))
    }
}

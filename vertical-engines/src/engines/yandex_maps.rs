//! Yandex Maps: deep link into `yandex.com/maps`.

use super::map_link;
use crate::engine::{About, EngineAdapter, EngineInfo, ResultFormat};
use crate::error::Result;
use crate::types::{EngineResult, QueryParams, RawResponse, RequestSpec};

const SEARCH_URL: &str = "https://yandex.com/maps/?text={query}";

static INFO: EngineInfo = map_link::info(
    "yandex_maps",
    About {
        website: "https://yandex.com/maps/",
        wikidata_id: "Q1755674",
        official_api_documentation: Some("https://yandex.com/dev/maps/"),
        use_official_api: false,
        require_api_key: false,
        results: ResultFormat::Html,
        language: None,
    },
);

/// Yandex Maps deep-link adapter.
pub struct YandexMapsEngine;

impl EngineAdapter for YandexMapsEngine {
    fn info(&self) -> &'static EngineInfo {
        &INFO
    }

    fn request(&self, query: &str, _params: &QueryParams, spec: &mut RequestSpec) -> Result<()> {
        tracing::trace!(query, "Yandex Maps request");
        spec.url = map_link::search_url(SEARCH_URL, query);
        Ok(())
    }

    fn response(&self, resp: &RawResponse) -> Result<Vec<EngineResult>> {
        Ok(map_link::deep_link("Yandex Maps", SEARCH_URL, &resp.query))
    }
}

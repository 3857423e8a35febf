//! Trait definition for provider adapters.
//!
//! Each provider (Baidu, Bing, Google, HERE, Yandex in their maps and
//! shopping verticals) implements [`EngineAdapter`] to provide a uniform
//! build-request / parse-response pair. Adapters never perform I/O.

use serde::Serialize;

use crate::error::Result;
use crate::types::{Category, EngineResult, QueryParams, RawResponse, RequestSpec};

/// Payload format a provider answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResultFormat {
    Html,
    Json,
}

/// Provenance metadata read by the host registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct About {
    pub website: &'static str,
    pub wikidata_id: &'static str,
    pub official_api_documentation: Option<&'static str>,
    pub use_official_api: bool,
    pub require_api_key: bool,
    pub results: ResultFormat,
    pub language: Option<&'static str>,
}

/// Declared capabilities of an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineInfo {
    /// Registry name, e.g. `bing_shopping`.
    pub name: &'static str,
    pub categories: &'static [Category],
    pub paging: bool,
    /// Highest page the provider will serve, if bounded.
    pub max_page: Option<u32>,
    pub time_range_support: bool,
    pub safesearch: bool,
    /// Results per page for paging engines.
    pub results_per_page: Option<u32>,
    pub about: About,
}

impl EngineInfo {
    /// Whether the host may ask this engine for `pageno`.
    pub fn accepts_page(&self, pageno: u32) -> bool {
        if !self.paging {
            return pageno <= 1;
        }
        self.max_page.map_or(true, |max| pageno <= max)
    }
}

/// A stateless provider adapter.
///
/// Implementors turn a query into a [`RequestSpec`] and a [`RawResponse`]
/// into normalised [`EngineResult`] items. Both operations are pure apart
/// from reading the wall clock for time-range buckets, so a single adapter
/// may be used from many threads at once.
pub trait EngineAdapter: Send + Sync {
    /// Declared metadata for this adapter.
    fn info(&self) -> &'static EngineInfo;

    /// Populate `spec` for `query`.
    ///
    /// Existing headers and cookies in `spec` are extended, not replaced.
    ///
    /// # Errors
    ///
    /// Only engines with a strict time-range table fail here, with
    /// [`crate::EngineError::UnknownTimeRange`].
    fn request(&self, query: &str, params: &QueryParams, spec: &mut RequestSpec) -> Result<()>;

    /// Parse a provider response into results.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EngineError::CaptchaDetected`] when the provider
    /// blocked the request and [`crate::EngineError::Protocol`] when the
    /// response does not look like what was asked for.
    fn response(&self, resp: &RawResponse) -> Result<Vec<EngineResult>>;

    /// Build a fresh [`RequestSpec`] for `query`.
    fn build_request(&self, query: &str, params: &QueryParams) -> Result<RequestSpec> {
        let mut spec = RequestSpec::default();
        self.request(query, params, &mut spec)?;
        Ok(spec)
    }

    /// Registry name of this adapter.
    fn name(&self) -> &'static str {
        self.info().name
    }
}

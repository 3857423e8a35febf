//! # vertical-engines
//!
//! Maps and shopping provider adapters for a metasearch aggregator.
//!
//! Every adapter is a stateless unit struct implementing
//! [`EngineAdapter`]: it turns a query into a [`RequestSpec`] and a provider
//! [`RawResponse`] into normalised [`EngineResult`] items. Adapters do no
//! I/O, so the host decides how and when requests go out.
//!
//! ## Adapters
//!
//! - Maps deep links: Baidu, Bing, Google, HERE, Yandex
//! - Shopping: Baidu (JSON), Bing and Google (scraped HTML)
//!
//! ## Security
//!
//! - No API keys or secrets to leak
//! - Search queries are logged only at trace level
//! - A CAPTCHA interstitial is reported as [`EngineError::CaptchaDetected`],
//!   never parsed as results

pub mod config;
pub mod engine;
pub mod engines;
pub mod error;
pub mod extract;
pub mod http;
pub mod types;
pub mod url_encode;

pub use config::FetchConfig;
pub use engine::{About, EngineAdapter, EngineInfo, ResultFormat};
pub use engines::adapter;
pub use error::{EngineError, Result};
pub use types::{
    Address, Category, Engine, EngineResult, QueryParams, RawResponse, RequestSpec, ResultRecord,
    SafeSearch, Template,
};

/// Run one build → fetch → parse cycle for `engine`.
///
/// Performs a single HTTP request with no retries. Pages beyond what the
/// engine serves yield no results without touching the network.
///
/// # Errors
///
/// Returns [`EngineError::Config`] for an invalid `config`,
/// [`EngineError::Http`] when the request fails, and whatever the adapter
/// reports while building the request or parsing the response.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> vertical_engines::Result<()> {
/// use vertical_engines::{Engine, FetchConfig, QueryParams};
///
/// let results = vertical_engines::search(
///     Engine::BingShopping,
///     "usb c hub",
///     &QueryParams::default(),
///     &FetchConfig::default(),
/// )
/// .await?;
/// for record in results.iter().filter_map(|r| r.as_record()) {
///     println!("{}: {}", record.title, record.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(
    engine: Engine,
    query: &str,
    params: &QueryParams,
    config: &FetchConfig,
) -> Result<Vec<EngineResult>> {
    config.validate()?;

    let adapter = engines::adapter(engine);
    if !adapter.info().accepts_page(params.pageno) {
        tracing::debug!(engine = %engine, pageno = params.pageno, "page out of range");
        return Ok(Vec::new());
    }

    let spec = adapter.build_request(query, params)?;
    tracing::trace!(engine = %engine, url = %spec.url, "fetching");

    let resp = http::fetch(&spec, query, params, config).await?;
    let results = adapter.response(&resp)?;

    tracing::debug!(engine = %engine, count = results.len(), "search complete");
    Ok(results)
}

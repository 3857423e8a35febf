//! HTTP execution for the optional fetch path.
//!
//! Turns a [`RequestSpec`] into a [`RawResponse`] with a [`reqwest::Client`]
//! configured from [`FetchConfig`]. One request per call: no retries and no
//! caching, those belong to the host.

use crate::config::FetchConfig;
use crate::error::EngineError;
use crate::types::{QueryParams, RawResponse, RequestSpec};
use rand::seq::SliceRandom;
use std::time::Duration;

/// Realistic browser User-Agent strings, rotated per request.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:133.0) Gecko/20100101 Firefox/133.0",
];

/// Build a [`reqwest::Client`] for one provider request.
///
/// The client has:
/// - Timeout from config
/// - Random User-Agent from built-in rotation list (or custom if configured)
/// - Redirects disabled when the adapter asked for that, so the response
///   stage can inspect the `Location` header
/// - A cookie jar, so cookies set along a redirect chain are replayed
/// - Brotli and gzip decompression
///
/// # Errors
///
/// Returns [`EngineError::Http`] if the client cannot be constructed.
pub fn build_client(
    config: &FetchConfig,
    allow_redirects: bool,
) -> Result<reqwest::Client, EngineError> {
    let ua = match config.user_agent {
        Some(ref custom) => custom.clone(),
        None => random_user_agent().to_owned(),
    };

    let redirect = if allow_redirects {
        reqwest::redirect::Policy::limited(config.max_redirects)
    } else {
        reqwest::redirect::Policy::none()
    };

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(ua)
        .redirect(redirect)
        .cookie_store(true)
        .build()
        .map_err(|e| EngineError::Http(format!("failed to build HTTP client: {e}")))
}

/// Select a random User-Agent string from the rotation list.
pub fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS
        .choose(&mut rng)
        .copied()
        // SAFETY: USER_AGENTS is a non-empty const array, choose only returns None on empty slices
        .unwrap_or(USER_AGENTS[0])
}

/// Execute `spec` and capture the response for an adapter to parse.
///
/// Redirect responses (3xx) are returned as-is when redirects are
/// disabled; only 4xx/5xx statuses are treated as failures.
///
/// # Errors
///
/// Returns [`EngineError::Http`] on transport failures and error statuses.
pub async fn fetch(
    spec: &RequestSpec,
    query: &str,
    params: &QueryParams,
    config: &FetchConfig,
) -> Result<RawResponse, EngineError> {
    let client = build_client(config, spec.allow_redirects)?;

    let mut request = client.get(&spec.url);
    for (name, value) in &spec.headers {
        // reqwest only decompresses bodies when it negotiates the encoding itself.
        if name.eq_ignore_ascii_case("accept-encoding") {
            continue;
        }
        request = request.header(name.as_str(), value.as_str());
    }
    if let Some(cookie) = spec.cookie_header() {
        request = request.header(reqwest::header::COOKIE, cookie);
    }

    let response = request
        .send()
        .await
        .map_err(|e| EngineError::Http(format!("request failed: {e}")))?;

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(EngineError::Http(format!("provider returned {status}")));
    }

    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    let text = response
        .text()
        .await
        .map_err(|e| EngineError::Http(format!("response read failed: {e}")))?;

    tracing::trace!(bytes = text.len(), status = status.as_u16(), "provider response received");

    Ok(RawResponse {
        status: status.as_u16(),
        headers,
        text,
        query: query.to_string(),
        params: params.clone(),
    })
}

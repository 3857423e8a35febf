//! Core types shared by every adapter: engine identification, the query
//! parameter bag, the outbound request description, the raw provider
//! response, and normalised result records.

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// Adapters shipped by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Engine {
    /// Baidu Maps deep link.
    BaiduMaps,
    /// Bing Maps deep link.
    BingMaps,
    /// Google Maps deep link.
    GoogleMaps,
    /// HERE WeGo deep link.
    HereMaps,
    /// Yandex Maps deep link.
    YandexMaps,
    /// Baidu shopping, JSON endpoint.
    BaiduShopping,
    /// Bing Shopping, scraped HTML.
    BingShopping,
    /// Google Shopping tab, scraped HTML.
    GoogleShopping,
}

impl Engine {
    /// Returns the registry name of this engine.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BaiduMaps => "baidu_maps",
            Self::BingMaps => "bing_maps",
            Self::GoogleMaps => "google_maps",
            Self::HereMaps => "here_maps",
            Self::YandexMaps => "yandex_maps",
            Self::BaiduShopping => "baidu_shopping",
            Self::BingShopping => "bing_shopping",
            Self::GoogleShopping => "google_shopping",
        }
    }

    /// Returns all available engine variants.
    pub fn all() -> &'static [Engine] {
        &[
            Self::BaiduMaps,
            Self::BingMaps,
            Self::GoogleMaps,
            Self::HereMaps,
            Self::YandexMaps,
            Self::BaiduShopping,
            Self::BingShopping,
            Self::GoogleShopping,
        ]
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Engine {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|engine| engine.name() == s)
            .ok_or_else(|| EngineError::UnknownEngine(s.to_string()))
    }
}

/// Result category an engine contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Map,
    Shopping,
}

/// Rendering hint telling the host which result template to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Template {
    #[serde(rename = "map.html")]
    Map,
    #[serde(rename = "shopping.html")]
    Shopping,
}

/// Safe-search level requested by the user.
///
/// Serializes as `off`/`moderate`/`strict`. Deserializes from those names,
/// from the host's numeric levels `0`/`1`/`2`, or from a boolean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SafeSearch {
    #[default]
    Off,
    Moderate,
    Strict,
}

impl SafeSearch {
    fn from_level(level: u64) -> Option<Self> {
        match level {
            0 => Some(Self::Off),
            1 => Some(Self::Moderate),
            2 => Some(Self::Strict),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for SafeSearch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LevelVisitor;

        impl Visitor<'_> for LevelVisitor {
            type Value = SafeSearch;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a safe-search level: 0, 1, 2, a boolean, or off/moderate/strict")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<SafeSearch, E> {
                Ok(if v { SafeSearch::Moderate } else { SafeSearch::Off })
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<SafeSearch, E> {
                SafeSearch::from_level(v)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(v), &self))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<SafeSearch, E> {
                u64::try_from(v)
                    .ok()
                    .and_then(SafeSearch::from_level)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Signed(v), &self))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<SafeSearch, E> {
                match v {
                    "off" | "0" => Ok(SafeSearch::Off),
                    "moderate" | "1" => Ok(SafeSearch::Moderate),
                    "strict" | "2" => Ok(SafeSearch::Strict),
                    _ => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
                }
            }
        }

        deserializer.deserialize_any(LevelVisitor)
    }
}

/// Per-query parameters supplied by the host.
///
/// `time_range` stays a raw string: engines differ in how they treat values
/// they do not recognise, and that difference is part of their contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    /// 1-based page number. Zero is treated as the first page.
    pub pageno: u32,
    /// Requested time window (`day`, `week`, `month`, `year`), if any.
    pub time_range: Option<String>,
    /// Locale tag such as `en-US`, or the sentinel `all`.
    #[serde(rename = "searxng_locale")]
    pub locale: Option<String>,
    /// Safe-search level.
    pub safesearch: SafeSearch,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            pageno: 1,
            time_range: None,
            locale: None,
            safesearch: SafeSearch::Off,
        }
    }
}

impl QueryParams {
    /// Zero-based page index, tolerant of a zero `pageno`.
    pub fn page_index(&self) -> u32 {
        self.pageno.saturating_sub(1)
    }

    /// Zero-based index of the first result on this page, for `page_size`
    /// results per page. Computed in `u64`, so no `pageno` can overflow it.
    pub fn result_offset(&self, page_size: u32) -> u64 {
        u64::from(self.page_index()) * u64::from(page_size)
    }
}

/// An outbound HTTP request, described but not executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// Fully formed target URL.
    pub url: String,
    /// Extra request headers.
    pub headers: BTreeMap<String, String>,
    /// Cookies to send with the request.
    pub cookies: BTreeMap<String, String>,
    /// Whether the HTTP layer should follow redirects.
    pub allow_redirects: bool,
}

impl Default for RequestSpec {
    fn default() -> Self {
        Self {
            url: String::new(),
            headers: BTreeMap::new(),
            cookies: BTreeMap::new(),
            allow_redirects: true,
        }
    }
}

impl RequestSpec {
    /// Render the cookie map as a `Cookie` header value, if non-empty.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// A provider response as handed back by the HTTP layer.
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers. Lookup through [`RawResponse::header`] is
    /// case-insensitive.
    pub headers: BTreeMap<String, String>,
    /// Response body.
    pub text: String,
    /// The query that produced this response.
    pub query: String,
    /// The parameters that produced this response.
    pub params: QueryParams,
}

impl RawResponse {
    /// A `200 OK` response carrying `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            status: 200,
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_pageno(mut self, pageno: u32) -> Self {
        self.params.pageno = pageno;
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Postal address attached to map results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub name: String,
}

/// A single normalised search result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(
        default,
        rename = "publishedDate",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<Template>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl ResultRecord {
    /// A record with only the required fields set.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            ..Default::default()
        }
    }
}

/// One item of an adapter's output: either a result or the provider's
/// declared total hit count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EngineResult {
    Record(ResultRecord),
    NumberOfResults { number_of_results: u64 },
}

impl EngineResult {
    /// The result record, if this item is one.
    pub fn as_record(&self) -> Option<&ResultRecord> {
        match self {
            Self::Record(record) => Some(record),
            Self::NumberOfResults { .. } => None,
        }
    }

    /// The declared total hit count, if this item is the sideband count.
    pub fn number_of_results(&self) -> Option<u64> {
        match self {
            Self::Record(_) => None,
            Self::NumberOfResults { number_of_results } => Some(*number_of_results),
        }
    }
}

impl From<ResultRecord> for EngineResult {
    fn from(record: ResultRecord) -> Self {
        Self::Record(record)
    }
}

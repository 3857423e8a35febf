//! Baidu shopping: JSON endpoint of `www.baidu.com/s`.
//!
//! Baidu answers `tn=json` searches with a `feed.entry` array. When it
//! suspects automation it redirects to a captcha page on `wappass.baidu.com`
//! instead, which is why redirects are not followed for this engine.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::engine::{About, EngineAdapter, EngineInfo, ResultFormat};
use crate::error::{EngineError, Result};
use crate::types::{Category, EngineResult, QueryParams, RawResponse, RequestSpec, ResultRecord};
use crate::url_encode::urlencode;

const ENDPOINT: &str = "https://www.baidu.com/s";
const RESULTS_PER_PAGE: u32 = 10;

/// Substring of the `Location` header Baidu sends when it wants a captcha.
const CAPTCHA_MARKER: &str = "wappass.baidu.com/static/captcha";

/// Time-range key to window length in seconds. Unknown keys are ignored.
const TIME_RANGES: &[(&str, i64)] = &[
    ("day", 86_400),
    ("week", 604_800),
    ("month", 2_592_000),
    ("year", 31_536_000),
];

static INFO: EngineInfo = EngineInfo {
    name: "baidu_shopping",
    categories: &[Category::Shopping],
    paging: true,
    max_page: None,
    time_range_support: true,
    safesearch: false,
    results_per_page: Some(RESULTS_PER_PAGE),
    about: About {
        website: "https://www.baidu.com",
        wikidata_id: "Q14772",
        official_api_documentation: None,
        use_official_api: false,
        require_api_key: false,
        results: ResultFormat::Json,
        language: Some("zh"),
    },
};

#[derive(Debug, Deserialize)]
struct Payload {
    #[serde(default)]
    feed: Option<Feed>,
}

#[derive(Debug, Deserialize)]
struct Feed {
    /// Kept untyped so one malformed entry only drops itself.
    #[serde(default)]
    entry: Vec<Value>,
}

/// The fields of one `feed.entry` item this adapter reads.
#[derive(Debug)]
struct Entry<'a> {
    title: Option<&'a str>,
    url: Option<&'a str>,
    abs: Option<&'a str>,
    time: Option<&'a Value>,
}

impl<'a> Entry<'a> {
    /// Borrow the known fields of `value`. Non-string fields count as absent.
    fn from_value(value: &'a Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Self {
            title: object.get("title").and_then(Value::as_str),
            url: object.get("url").and_then(Value::as_str),
            abs: object.get("abs").and_then(Value::as_str),
            time: object.get("time"),
        })
    }
}

/// Baidu shopping JSON adapter.
pub struct BaiduShoppingEngine;

impl EngineAdapter for BaiduShoppingEngine {
    fn info(&self) -> &'static EngineInfo {
        &INFO
    }

    fn request(&self, query: &str, params: &QueryParams, spec: &mut RequestSpec) -> Result<()> {
        tracing::trace!(query, "Baidu shopping request");
        spec.url = build_url(query, params, Utc::now().timestamp());
        spec.allow_redirects = false;
        Ok(())
    }

    fn response(&self, resp: &RawResponse) -> Result<Vec<EngineResult>> {
        if resp
            .header("Location")
            .is_some_and(|location| location.contains(CAPTCHA_MARKER))
        {
            tracing::warn!("Baidu redirected to captcha");
            return Err(EngineError::CaptchaDetected(INFO.name.into()));
        }
        parse_baidu_json(&resp.text)
    }
}

/// Search URL for `query` with the time window ending at `now` (Unix seconds).
fn build_url(query: &str, params: &QueryParams, now: i64) -> String {
    let offset = params.result_offset(RESULTS_PER_PAGE);

    let mut pairs: Vec<(&str, String)> = vec![
        ("wd", query.to_string()),
        ("rn", RESULTS_PER_PAGE.to_string()),
        ("pn", offset.to_string()),
        ("tn", "json".into()),
        ("rsv_spt", "1".into()),
        ("rsv_dl", "0_right_recom_21102_1".into()),
    ];

    let window = params.time_range.as_deref().and_then(|range| {
        TIME_RANGES
            .iter()
            .find(|(key, _)| *key == range)
            .map(|(_, secs)| *secs)
    });
    if let Some(window) = window {
        pairs.push(("gpc", format!("stf={},{now}|stftype=1", now - window)));
    }

    format!("{ENDPOINT}?{}", urlencode(&pairs))
}

/// Parse a Baidu JSON payload into results.
///
/// Extracted as a separate function for testability with fixture payloads.
pub(crate) fn parse_baidu_json(text: &str) -> Result<Vec<EngineResult>> {
    let payload: Payload = serde_json::from_str(&escape_control_chars(text))
        .map_err(|e| EngineError::Protocol(format!("invalid Baidu JSON: {e}")))?;

    let entries = payload
        .feed
        .map(|feed| feed.entry)
        .filter(|entries| !entries.is_empty())
        .ok_or_else(|| EngineError::Protocol("Baidu response has no feed.entry".into()))?;

    let mut results = Vec::new();

    for value in &entries {
        let Some(entry) = Entry::from_value(value) else {
            tracing::debug!("skipping non-object Baidu entry");
            continue;
        };
        let (Some(title), Some(url)) = (entry.title, entry.url) else {
            continue;
        };
        if title.is_empty() || url.is_empty() {
            continue;
        }

        let content = entry.abs.unwrap_or_default();

        results.push(
            ResultRecord {
                content: Some(html_escape::decode_html_entities(content).into_owned()),
                published_date: entry.time.and_then(published_date),
                ..ResultRecord::new(html_escape::decode_html_entities(title), url)
            }
            .into(),
        );
    }

    tracing::debug!(count = results.len(), "Baidu shopping results parsed");
    Ok(results)
}

/// Epoch-seconds timestamp to a UTC date. Zero, non-numeric, or out of
/// range values yield `None`.
fn published_date(value: &Value) -> Option<DateTime<Utc>> {
    let secs = value.as_f64().filter(|secs| *secs != 0.0)?;
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}

/// Escape raw control characters that appear inside JSON strings.
///
/// Baidu occasionally emits literal tabs and newlines in string values,
/// which strict JSON parsers reject.
fn escape_control_chars(text: &str) -> Cow<'_, str> {
    if !text.chars().any(char::is_control) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            } else if u32::from(c) < 0x20 {
                out.push_str(&format!("\\u{:04x}", u32::from(c)));
                continue;
            }
        } else if c == '"' {
            in_string = true;
        }
        out.push(c);
    }

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    const MOCK_BAIDU_JSON: &str = r#"{"feed": {"entry": [
        {"title": "Tea &amp; Cups", "url": "https://item.example.cn/1", "abs": "Fine &quot;porcelain&quot;", "time": 1700000000},
        {"title": "No URL here", "abs": "dropped"},
        {"title": "", "url": "https://item.example.cn/2"},
        {"title": "Bad time", "url": "https://item.example.cn/3", "time": "yesterday"}
    ]}}"#;

    fn params(pageno: u32, time_range: Option<&str>) -> QueryParams {
        QueryParams {
            pageno,
            time_range: time_range.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn url_first_page() {
        let url = build_url("teapot", &params(1, None), NOW);
        assert_eq!(
            url,
            "https://www.baidu.com/s?wd=teapot&rn=10&pn=0&tn=json&rsv_spt=1&rsv_dl=0_right_recom_21102_1"
        );
    }

    #[test]
    fn url_offset_for_third_page() {
        let url = build_url("green tea", &params(3, None), NOW);
        assert!(url.contains("wd=green+tea"));
        assert!(url.contains("&pn=20&"));
    }

    #[test]
    fn url_largest_page_does_not_overflow() {
        let url = build_url("teapot", &params(u32::MAX, None), NOW);
        assert!(url.contains("&pn=42949672940&"));
    }

    #[test]
    fn url_time_range_week() {
        let url = build_url("teapot", &params(1, Some("week")), NOW);
        assert!(url.ends_with("&gpc=stf%3D1699395200%2C1700000000%7Cstftype%3D1"));
    }

    #[test]
    fn unknown_time_range_is_ignored() {
        let url = build_url("teapot", &params(1, Some("decade")), NOW);
        assert!(!url.contains("gpc="));
    }

    #[test]
    fn request_disables_redirects() {
        let spec = BaiduShoppingEngine
            .build_request("teapot", &QueryParams::default())
            .expect("should build");
        assert!(!spec.allow_redirects);
        assert!(spec.url.starts_with("https://www.baidu.com/s?wd=teapot"));
    }

    #[test]
    fn parse_mock_json_returns_valid_entries() {
        let results = parse_baidu_json(MOCK_BAIDU_JSON).expect("should parse");
        assert_eq!(results.len(), 2);

        let first = results[0].as_record().expect("record");
        assert_eq!(first.title, "Tea & Cups");
        assert_eq!(first.url, "https://item.example.cn/1");
        assert_eq!(first.content.as_deref(), Some("Fine \"porcelain\""));
        assert_eq!(
            first.published_date,
            DateTime::from_timestamp(1_700_000_000, 0)
        );

        let second = results[1].as_record().expect("record");
        assert_eq!(second.title, "Bad time");
        assert!(second.published_date.is_none());
    }

    #[test]
    fn malformed_entry_does_not_sink_its_neighbours() {
        let json = r#"{"feed": {"entry": [
            {"title": "Good", "url": "https://item.example.cn/ok", "abs": "fine"},
            {"title": 12345, "url": "https://item.example.cn/numeric-title"},
            {"title": "Array url", "url": ["https://item.example.cn/x"]},
            "not an object",
            null,
            {"title": "Also good", "url": "https://item.example.cn/ok2", "abs": 7}
        ]}}"#;
        let results = parse_baidu_json(json).expect("bad entries are dropped, not fatal");
        let titles: Vec<_> = results
            .iter()
            .filter_map(EngineResult::as_record)
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(titles, ["Good", "Also good"]);
        assert_eq!(results[1].as_record().and_then(|r| r.content.as_deref()), Some(""));
    }

    #[test]
    fn entry_without_url_is_skipped_silently() {
        let json = r#"{"feed": {"entry": [{"title": "Only title", "abs": "x"}]}}"#;
        let results = parse_baidu_json(json).expect("should not raise");
        assert!(results.is_empty());
    }

    #[test]
    fn missing_feed_entry_is_protocol_error() {
        for json in [r#"{}"#, r#"{"feed": {}}"#, r#"{"feed": {"entry": []}}"#] {
            let err = parse_baidu_json(json).unwrap_err();
            assert!(matches!(err, EngineError::Protocol(_)), "{json}: {err}");
        }
    }

    #[test]
    fn malformed_json_is_protocol_error() {
        let err = parse_baidu_json("<html>not json</html>").unwrap_err();
        assert!(matches!(err, EngineError::Protocol(_)));
    }

    #[test]
    fn raw_control_characters_are_tolerated() {
        let json = "{\"feed\": {\"entry\": [{\"title\": \"Line\tone\", \"url\": \"https://x.cn/\", \"abs\": \"a\nb\"}]}}";
        let results = parse_baidu_json(json).expect("should parse");
        let record = results[0].as_record().expect("record");
        assert_eq!(record.title, "Line\tone");
        assert_eq!(record.content.as_deref(), Some("a\nb"));
    }

    #[test]
    fn escape_leaves_structural_whitespace_alone() {
        let json = "{\n\t\"a\": \"x\\\"\ty\"\n}";
        assert_eq!(escape_control_chars(json), "{\n\t\"a\": \"x\\\"\\u0009y\"\n}");
    }

    #[test]
    fn captcha_redirect_detected_before_parsing() {
        let resp = RawResponse::new("this is not json")
            .with_status(302)
            .with_header(
                "Location",
                "https://wappass.baidu.com/static/captcha/tuxing.html?ak=abc",
            );
        let err = BaiduShoppingEngine.response(&resp).unwrap_err();
        assert!(matches!(err, EngineError::CaptchaDetected(_)));
    }

    #[test]
    fn unrelated_redirect_is_not_captcha() {
        let resp = RawResponse::new(MOCK_BAIDU_JSON)
            .with_header("Location", "https://www.baidu.com/other");
        let results = BaiduShoppingEngine.response(&resp).expect("should parse");
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn published_date_handles_fractional_and_zero() {
        let date = published_date(&serde_json::json!(1.5)).expect("valid");
        assert_eq!(date.timestamp(), 1);
        assert_eq!(date.timestamp_subsec_millis(), 500);
        assert!(published_date(&serde_json::json!(0)).is_none());
        assert!(published_date(&serde_json::json!(null)).is_none());
    }

    // ── Fixture-based parser tests ──────────────────────────────────────

    const FIXTURE_BAIDU_JSON: &str = include_str!("../../test-data/baidu_shopping.json");

    #[test]
    fn fixture_parses_all_complete_entries() {
        let results = parse_baidu_json(FIXTURE_BAIDU_JSON).expect("fixture should parse");
        assert_eq!(results.len(), 3);
        for (i, item) in results.iter().enumerate() {
            let record = item.as_record().expect("record");
            assert!(!record.title.is_empty(), "result {i} has empty title");
            assert!(record.url.starts_with("https://"), "result {i} URL: {}", record.url);
        }
    }

    #[test]
    fn fixture_decodes_entities() {
        let results = parse_baidu_json(FIXTURE_BAIDU_JSON).expect("fixture should parse");
        assert!(results
            .iter()
            .filter_map(EngineResult::as_record)
            .all(|r| !r.title.contains("&amp;") && !r.title.contains("&#39;")));
    }
}

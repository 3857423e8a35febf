//! Query-string encoding helpers shared by the adapters.
//!
//! Providers expect the classic web encodings: path-style quoting for
//! deep links (space becomes `%20`, `/` is kept) and form encoding for
//! query strings (space becomes `+`).

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left untouched by form encoding.
const FORM: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~');

/// Characters left untouched by path quoting.
const PATH: &AsciiSet = &FORM.remove(b'/');

/// Percent-encode `input` for use in a URL path or a pre-built query
/// template. Unreserved characters and `/` pass through.
pub fn quote(input: &str) -> String {
    utf8_percent_encode(input, PATH).to_string()
}

/// Form-encode a single value (space becomes `+`).
pub fn quote_plus(input: &str) -> String {
    // '%' is itself escaped, so every "%20" here came from a space.
    utf8_percent_encode(input, FORM)
        .to_string()
        .replace("%20", "+")
}

/// Form-encode key/value pairs into a query string, preserving order.
pub fn urlencode<K, V>(pairs: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", quote_plus(key.as_ref()), quote_plus(value.as_ref())))
        .collect::<Vec<_>>()
        .join("&")
}

/// First non-empty value of query parameter `name` in `href`.
///
/// Works on absolute and relative references alike; the fragment is ignored.
pub fn query_param(href: &str, name: &str) -> Option<String> {
    let (_, query) = href.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, value)| key == name && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}

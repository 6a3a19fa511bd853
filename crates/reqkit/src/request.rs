//! Request options and descriptor resolution.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use url::{form_urlencoded, Url};

use crate::client::TlsConfig;
use crate::error::HttpError;

/// Common HTTP headers.
pub mod headers {
    pub const CONTENT_TYPE_JSON: &str = "application/json";
    pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";
}

/// Parameter mapping sent as query string, JSON body or form body.
pub type Params = BTreeMap<String, Value>;

/// Pre-encoded query values: each key maps to one or more strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Values(BTreeMap<String, Vec<String>>);

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to `key`.
    pub fn add(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.entry(key.into()).or_default().push(value.into());
        self
    }

    /// Replace all values of `key` with `value`.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), vec![value.into()]);
        self
    }

    /// First value stored for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.first()).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Key/value pairs in key order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    /// `application/x-www-form-urlencoded` encoding, sorted by key.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs())
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Values {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter().fold(Values::new(), |values, (k, v)| values.add(k, v))
    }
}

impl From<&Params> for Values {
    fn from(params: &Params) -> Self {
        params
            .iter()
            .map(|(k, v)| (k.as_str(), form_value(v)))
            .collect()
    }
}

/// Render a parameter for query/form encoding.
fn form_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Options for a single request.
///
/// Every setter consumes and returns the value, so options are built fresh
/// per call and never shared mutably. Headers merge by name; any other
/// option keeps the last value set.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    headers: BTreeMap<String, String>,
    params: Option<Params>,
    query: Option<Values>,
    body: Option<Bytes>,
    timeout: Option<Duration>,
    tls: Option<TlsConfig>,
    expected_status: Option<StatusCode>,
    retries: Option<u32>,
    debug: Option<bool>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header. Names are case-insensitive.
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Merge several headers.
    pub fn headers<I, K, V>(self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        headers
            .into_iter()
            .fold(self, |options, (k, v)| options.header(k, v))
    }

    /// Add bearer token authorization.
    pub fn bearer_auth(self, token: impl AsRef<str>) -> Self {
        self.header(AUTHORIZATION, format!("Bearer {}", token.as_ref()))
    }

    /// Set content type to JSON.
    pub fn json_content(self) -> Self {
        self.header(CONTENT_TYPE, headers::CONTENT_TYPE_JSON)
    }

    /// Set content type to form encoding, so parameters are form-encoded.
    pub fn form_content(self) -> Self {
        self.header(CONTENT_TYPE, headers::CONTENT_TYPE_FORM)
    }

    /// Insert a single parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params
            .get_or_insert_with(Params::new)
            .insert(key.into(), value.into());
        self
    }

    /// Replace the parameter mapping.
    pub fn params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }

    /// Set pre-encoded query values.
    pub fn query(mut self, values: Values) -> Self {
        self.query = Some(values);
        self
    }

    /// Send raw bytes as the body of a non-GET request.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Bound the whole call, connect included. Zero means no timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn tls(mut self, tls: TlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    /// Treat any other status as a failed attempt.
    pub fn expect_status(mut self, status: StatusCode) -> Self {
        self.expected_status = Some(status);
        self
    }

    /// Total number of attempts. Zero is treated as one.
    pub fn retries(mut self, attempts: u32) -> Self {
        self.retries = Some(attempts);
        self
    }

    /// Log request and response dumps at info level.
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = Some(enabled);
        self
    }

    /// Layer `overrides` on top of `self`.
    pub fn merge(mut self, overrides: RequestOptions) -> Self {
        self.headers.extend(overrides.headers);
        Self {
            headers: self.headers,
            params: overrides.params.or(self.params),
            query: overrides.query.or(self.query),
            body: overrides.body.or(self.body),
            timeout: overrides.timeout.or(self.timeout),
            tls: overrides.tls.or(self.tls),
            expected_status: overrides.expected_status.or(self.expected_status),
            retries: overrides.retries.or(self.retries),
            debug: overrides.debug.or(self.debug),
        }
    }

    /// Value of a header, looked up case-insensitively.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn expected_status(&self) -> Option<StatusCode> {
        self.expected_status
    }

    pub fn retry_count(&self) -> Option<u32> {
        self.retries
    }

    pub fn is_debug(&self) -> bool {
        self.debug.unwrap_or(false)
    }

    fn is_form_encoded(&self) -> bool {
        self.header_value(CONTENT_TYPE.as_str())
            .map(|v| {
                v.trim()
                    .to_ascii_lowercase()
                    .starts_with(headers::CONTENT_TYPE_FORM)
            })
            .unwrap_or(false)
    }

    fn header_map(&self) -> Result<HeaderMap, HttpError> {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let header_name =
                HeaderName::try_from(name.as_str()).map_err(|e| HttpError::InvalidHeader {
                    name: name.clone(),
                    message: e.to_string(),
                })?;
            let header_value =
                HeaderValue::try_from(value.as_str()).map_err(|e| HttpError::InvalidHeader {
                    name: name.clone(),
                    message: e.to_string(),
                })?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }
}

/// Resolved request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Empty,
    Json(Bytes),
    Form(String),
    Raw(Bytes),
}

impl Body {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Body::Empty => &[],
            Body::Json(bytes) | Body::Raw(bytes) => bytes.as_ref(),
            Body::Form(form) => form.as_bytes(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }

    pub(crate) fn preview(&self) -> String {
        String::from_utf8_lossy(self.as_bytes()).into_owned()
    }
}

/// A fully resolved request, ready for transport.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Body,
    pub timeout: Duration,
    pub tls: TlsConfig,
}

impl RequestDescriptor {
    /// Fold `options` into a request for `method` and `url`.
    ///
    /// GET sends pre-encoded query values if present, otherwise the
    /// parameter mapping, appended to the URL's query. Other methods send a
    /// raw body if present, otherwise the mapping (form-encoded when the
    /// form content type is set, JSON otherwise), otherwise the query values
    /// form-encoded.
    pub fn resolve(
        method: Method,
        url: &str,
        options: &RequestOptions,
        default_timeout: Duration,
    ) -> Result<Self, HttpError> {
        let mut parsed = Url::parse(url).map_err(|source| HttpError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        let headers = options.header_map()?;

        let body = if method == Method::GET {
            let values = match (&options.query, &options.params) {
                (Some(values), _) => Some(values.clone()),
                (None, Some(params)) => Some(Values::from(params)),
                (None, None) => None,
            };
            if let Some(values) = values.filter(|v| !v.is_empty()) {
                parsed.query_pairs_mut().extend_pairs(values.pairs());
            }
            Body::Empty
        } else if let Some(raw) = &options.body {
            Body::Raw(raw.clone())
        } else if let Some(params) = &options.params {
            if options.is_form_encoded() {
                Body::Form(Values::from(params).encode())
            } else {
                let data = serde_json::to_vec(params).map_err(HttpError::Encode)?;
                Body::Json(Bytes::from(data))
            }
        } else if let Some(values) = &options.query {
            Body::Form(values.encode())
        } else {
            Body::Empty
        };

        Ok(Self {
            method,
            url: parsed,
            headers,
            body,
            timeout: options.timeout.unwrap_or(default_timeout),
            tls: options.tls.clone().unwrap_or_default(),
        })
    }

    /// Build the `reqwest` request for one attempt.
    pub(crate) fn to_request(&self, client: &Client) -> reqwest::RequestBuilder {
        let builder = client
            .request(self.method.clone(), self.url.clone())
            .headers(self.headers.clone());

        match &self.body {
            Body::Empty => builder,
            Body::Json(bytes) | Body::Raw(bytes) => builder.body(bytes.clone()),
            Body::Form(form) => builder.body(form.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    const DEFAULT: Duration = Duration::from_secs(10);

    fn resolve(method: Method, url: &str, options: RequestOptions) -> RequestDescriptor {
        RequestDescriptor::resolve(method, url, &options, DEFAULT).unwrap()
    }

    #[test]
    fn test_get_without_options_is_bodyless() {
        let desc = resolve(
            Method::GET,
            "https://x.test/api?mode=extended",
            RequestOptions::new(),
        );
        assert_eq!(desc.method, Method::GET);
        assert_eq!(desc.url.as_str(), "https://x.test/api?mode=extended");
        assert!(desc.headers.is_empty());
        assert!(desc.body.is_empty());
        assert_eq!(desc.timeout, DEFAULT);
    }

    #[test]
    fn test_get_encodes_params_as_query() {
        let desc = resolve(
            Method::GET,
            "https://x.test/search",
            RequestOptions::new()
                .param("q", "rust lang")
                .param("page", 2)
                .param("exact", true),
        );
        assert_eq!(desc.url.query(), Some("exact=true&page=2&q=rust+lang"));
        assert!(desc.body.is_empty());
    }

    #[test]
    fn test_get_appends_to_existing_query() {
        let desc = resolve(
            Method::GET,
            "https://x.test/api?mode=extended",
            RequestOptions::new().param("id", 7),
        );
        assert_eq!(desc.url.query(), Some("mode=extended&id=7"));
    }

    #[test]
    fn test_get_prefers_query_values_over_params() {
        let desc = resolve(
            Method::GET,
            "https://x.test/api",
            RequestOptions::new()
                .param("from", "params")
                .query(Values::new().add("from", "values").add("tag", "a").add("tag", "b")),
        );
        assert_eq!(desc.url.query(), Some("from=values&tag=a&tag=b"));
    }

    #[test]
    fn test_get_never_carries_a_body() {
        let desc = resolve(
            Method::GET,
            "https://x.test/api",
            RequestOptions::new().body("ignored"),
        );
        assert!(desc.body.is_empty());
    }

    #[test]
    fn test_post_params_are_json_without_content_type() {
        let desc = resolve(
            Method::POST,
            "https://x.test/rpc",
            RequestOptions::new().param("id", 1).param("method", "foo"),
        );
        assert_eq!(desc.body, Body::Json(Bytes::from_static(br#"{"id":1,"method":"foo"}"#)));
        assert!(desc.headers.get(CONTENT_TYPE).is_none());
        assert_eq!(desc.url.as_str(), "https://x.test/rpc");
    }

    #[test]
    fn test_post_nested_params_round_trip() {
        let params: Params = serde_json::from_value(json!({
            "id": 1,
            "jsonrpc": "2.0",
            "params": ["f021961"],
            "method": "filscan.ActorById"
        }))
        .unwrap();
        let desc = resolve(
            Method::POST,
            "https://x.test/rpc",
            RequestOptions::new().params(params.clone()),
        );
        let sent: Params = serde_json::from_slice(desc.body.as_bytes()).unwrap();
        assert_eq!(sent, params);
    }

    #[test_case("application/x-www-form-urlencoded" ; "exact")]
    #[test_case("application/x-www-form-urlencoded; charset=utf-8" ; "with charset")]
    #[test_case("Application/X-WWW-Form-Urlencoded" ; "mixed case")]
    fn test_post_form_content_type_form_encodes_params(content_type: &str) {
        let desc = resolve(
            Method::POST,
            "https://x.test/form",
            RequestOptions::new()
                .header("Content-Type", content_type)
                .param("name", "a b")
                .param("n", 3),
        );
        assert_eq!(desc.body, Body::Form("n=3&name=a+b".to_string()));
        assert_eq!(desc.headers.get(CONTENT_TYPE).unwrap(), content_type);
    }

    #[test]
    fn test_post_params_win_over_query_values() {
        let desc = resolve(
            Method::POST,
            "https://x.test/rpc",
            RequestOptions::new()
                .param("a", 1)
                .query(Values::new().add("b", "2")),
        );
        assert_eq!(desc.body, Body::Json(Bytes::from_static(br#"{"a":1}"#)));
    }

    #[test]
    fn test_post_query_values_become_form_body() {
        let desc = resolve(
            Method::POST,
            "https://x.test/form",
            RequestOptions::new().query(Values::new().add("b", "2").add("a", "1")),
        );
        assert_eq!(desc.body, Body::Form("a=1&b=2".to_string()));
        assert_eq!(desc.url.query(), None);
    }

    #[test]
    fn test_post_raw_body_wins() {
        let desc = resolve(
            Method::POST,
            "https://x.test/raw",
            RequestOptions::new().param("a", 1).body("raw payload"),
        );
        assert_eq!(desc.body, Body::Raw(Bytes::from_static(b"raw payload")));
    }

    #[test]
    fn test_post_without_body_options_is_bodyless() {
        let desc = resolve(Method::POST, "https://x.test/ping", RequestOptions::new());
        assert_eq!(desc.body, Body::Empty);
    }

    #[test_case(json!("text"), "text" ; "string unquoted")]
    #[test_case(json!(null), "" ; "null empty")]
    #[test_case(json!(1.5), "1.5" ; "number")]
    #[test_case(json!(false), "false" ; "bool")]
    #[test_case(json!(["f021961"]), r#"["f021961"]"# ; "array as json")]
    fn test_form_value_rendering(value: Value, expected: &str) {
        assert_eq!(form_value(&value), expected);
    }

    #[test]
    fn test_headers_merge_case_insensitively() {
        let options = RequestOptions::new()
            .headers([("X-Trace", "1"), ("Accept", "text/plain")])
            .headers([("x-trace", "2")]);
        let desc = resolve(Method::GET, "https://x.test/", options);
        assert_eq!(desc.headers.len(), 2);
        assert_eq!(desc.headers.get("x-trace").unwrap(), "2");
        assert_eq!(desc.headers.get("accept").unwrap(), "text/plain");
    }

    #[test]
    fn test_bearer_auth_and_json_content() {
        let desc = resolve(
            Method::POST,
            "https://x.test/",
            RequestOptions::new().bearer_auth("token123").json_content(),
        );
        assert_eq!(desc.headers.get(AUTHORIZATION).unwrap(), "Bearer token123");
        assert_eq!(desc.headers.get(CONTENT_TYPE).unwrap(), headers::CONTENT_TYPE_JSON);
    }

    #[test]
    fn test_invalid_header_is_construction_error() {
        let result = RequestDescriptor::resolve(
            Method::GET,
            "https://x.test/",
            &RequestOptions::new().header("bad header", "v"),
            DEFAULT,
        );
        assert!(matches!(result, Err(HttpError::InvalidHeader { .. })));

        let result = RequestDescriptor::resolve(
            Method::GET,
            "https://x.test/",
            &RequestOptions::new().header("x-ok", "line\nbreak"),
            DEFAULT,
        );
        assert!(matches!(result, Err(HttpError::InvalidHeader { .. })));
    }

    #[test]
    fn test_invalid_url_is_construction_error() {
        let result =
            RequestDescriptor::resolve(Method::GET, "not a url", &RequestOptions::new(), DEFAULT);
        assert!(matches!(result, Err(HttpError::InvalidUrl { .. })));
    }

    #[test]
    fn test_timeout_and_tls_are_carried() {
        let desc = resolve(
            Method::GET,
            "https://x.test/",
            RequestOptions::new()
                .timeout(Duration::from_millis(250))
                .tls(TlsConfig::new().danger_accept_invalid_certs(true)),
        );
        assert_eq!(desc.timeout, Duration::from_millis(250));
        assert!(desc.tls.accept_invalid_certs);
    }

    #[test]
    fn test_last_value_wins_and_merge() {
        let base = RequestOptions::new()
            .header("X-Base", "1")
            .timeout(Duration::from_secs(1))
            .retries(3)
            .param("a", 1);
        let call = RequestOptions::new()
            .header("X-Call", "2")
            .timeout(Duration::from_secs(2))
            .timeout(Duration::from_secs(5));

        let merged = base.merge(call);
        assert_eq!(merged.header_value("x-base"), Some("1"));
        assert_eq!(merged.header_value("X-CALL"), Some("2"));
        assert_eq!(merged.retry_count(), Some(3));
        assert!(!merged.is_debug());

        let desc = resolve(Method::GET, "https://x.test/", merged);
        assert_eq!(desc.timeout, Duration::from_secs(5));
        assert_eq!(desc.url.query(), Some("a=1"));
    }

    #[test]
    fn test_values_builders() {
        let values = Values::new().add("k", "1").add("k", "2").set("j", "x");
        assert_eq!(values.get("k"), Some("1"));
        assert_eq!(values.get("missing"), None);
        assert_eq!(values.encode(), "j=x&k=1&k=2");

        let values = values.set("k", "3");
        assert_eq!(values.encode(), "j=x&k=3");

        let collected: Values = vec![("b", "2"), ("a", "1")].into_iter().collect();
        assert_eq!(collected.encode(), "a=1&b=2");
    }
}

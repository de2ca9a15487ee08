//! HTTP transport boundary.
//!
//! Scenarios never talk to `reqwest` directly. They build an [`ApiRequest`],
//! hand it to a [`Transport`] and get back an [`ApiResponse`] holding the
//! status, headers and JSON body. Non-2xx statuses are ordinary responses
//! unless the request opts into `fail_on_status_code`.

use crate::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use strum::{AsRefStr, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, Serialize)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One request against the service, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path below the base URL, starting with `/`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Merged over the configured default headers
    pub headers: BTreeMap<String, String>,
    /// Turn non-2xx statuses into a transport error
    pub fail_on_status_code: bool,
    /// Overrides the transport's default request timeout
    #[serde(skip)]
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: BTreeMap::new(),
            fail_on_status_code: false,
            timeout: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn fail_on_status_code(mut self, fail: bool) -> Self {
        self.fail_on_status_code = fail;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// `METHOD /path` label used in logs and errors.
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// Status, headers and body of a completed round trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    /// JSON body; non-JSON text is kept as `Value::String`, empty as `Null`
    pub body: Value,
    /// Header names lowercased
    pub headers: BTreeMap<String, String>,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
            headers: BTreeMap::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Decode the body into a typed value.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> HarnessResult<T> {
        Ok(serde_json::from_value(self.body.clone())?)
    }
}

/// Parse a raw body: JSON when possible, the text itself otherwise.
pub fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Issues one request and returns the response. Implementations never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> HarnessResult<ApiResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: ApiRequest) -> HarnessResult<ApiResponse> {
        (**self).send(request).await
    }
}

// =============================================================================
// reqwest-backed transport
// =============================================================================

/// Transport over `reqwest` against the configured base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    default_headers: BTreeMap<String, String>,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &HarnessConfig) -> HarnessResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.request_timeout)
            .timeout(config.generic_timeout)
            .build()
            .map_err(|err| HarnessError::Config(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            default_headers: config.default_headers.clone(),
            timeout: config.generic_timeout,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> HarnessResult<ApiResponse> {
        let label = request.label();
        let started = Instant::now();

        let mut builder = self
            .client
            .request(request.method.into(), self.url_for(&request.path))
            .timeout(request.timeout.unwrap_or(self.timeout));
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in self.default_headers.iter().chain(request.headers.iter()) {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|err| {
            tracing::warn!(request = %label, error = %err, "request failed");
            HarnessError::from(err)
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let text = response
            .text()
            .await
            .map_err(|err| HarnessError::transport(label.clone(), format!("failed to read body: {err}")))?;

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "round trip complete"
        );

        let response = ApiResponse {
            status,
            body: decode_body(&text),
            headers,
        };
        if request.fail_on_status_code && !response.is_success() {
            return Err(HarnessError::transport(
                label,
                format!("unexpected status {status}: {}", truncate(&text, 200)),
            ));
        }
        Ok(response)
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

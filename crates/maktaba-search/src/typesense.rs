//! Typesense multi-search backend.
//!
//! Sends every [`ProviderRequest`] as one `POST /multi_search` call. Transport
//! failures and 5xx responses are retried at most once after a short fixed
//! delay; anything else surfaces immediately. Every failure is reported as
//! `SearchUnavailable` so callers can fall back to the degraded view.
//!
//! Requires the `typesense` feature.

use std::time::Duration;

use async_trait::async_trait;
use backon::{ConstantBuilder, Retryable};
use maktaba_core::{Error, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::backend::{
    FacetField, ProviderRequest, ProviderResponse, ProviderSearch, RawHit, ResultSet,
    SearchBackend,
};
use crate::document::{Document, Highlight};
use crate::result::FacetCount;

/// Header carrying the API key.
const API_KEY_HEADER: &str = "X-TYPESENSE-API-KEY";

/// Upper bound on retries regardless of configuration.
const MAX_RETRIES: usize = 1;

// ============================================================================
// Configuration
// ============================================================================

/// Connection settings for a Typesense node.
#[derive(Clone, Serialize, Deserialize)]
pub struct TypesenseConfig {
    /// Base URL of the node.
    #[serde(default = "default_url")]
    pub url: String,

    /// Search-only API key.
    #[serde(default)]
    pub api_key: String,

    /// Per-attempt request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Retries after a transient failure (at most 1).
    #[serde(default = "default_retries")]
    pub retries: usize,

    /// Delay before a retry in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_url() -> String {
    "http://localhost:8108".to_string()
}

fn default_timeout_ms() -> u64 {
    2000
}

fn default_connect_timeout_ms() -> u64 {
    500
}

fn default_retries() -> usize {
    1
}

fn default_retry_delay_ms() -> u64 {
    50
}

impl Default for TypesenseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            api_key: String::new(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            retries: default_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl std::fmt::Debug for TypesenseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypesenseConfig")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("timeout_ms", &self.timeout_ms)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("retries", &self.retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .finish()
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    union: bool,
    searches: Vec<WireSearch<'a>>,
}

#[derive(Debug, Serialize)]
struct WireSearch<'a> {
    collection: &'a str,
    q: &'a str,
    query_by: String,
    filter_by: &'a str,
    #[serde(skip_serializing_if = "String::is_empty")]
    facet_by: String,
    sort_by: &'a str,
    highlight_fields: String,
    page: u32,
    per_page: u32,
}

impl<'a> From<&'a ProviderSearch> for WireSearch<'a> {
    fn from(s: &'a ProviderSearch) -> Self {
        Self {
            collection: &s.collection,
            q: &s.q,
            query_by: s.query_by.join(","),
            filter_by: &s.filter_by,
            facet_by: s.facet_by.join(","),
            sort_by: &s.sort_by,
            highlight_fields: s.highlight_fields.join(","),
            page: s.page,
            per_page: s.per_page,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireMultiResponse {
    #[serde(default)]
    results: Vec<WireResult>,
}

#[derive(Debug, Default, Deserialize)]
struct WireResult {
    #[serde(default)]
    found: u64,
    #[serde(default)]
    hits: Vec<WireHit>,
    #[serde(default)]
    facet_counts: Vec<WireFacet>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct WireHit {
    document: Document,
    #[serde(default)]
    highlights: Vec<WireHighlight>,
    #[serde(default)]
    text_match: Option<u64>,
    #[serde(default)]
    search_index: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct WireHighlight {
    field: String,
    #[serde(default)]
    snippet: Option<String>,
    #[serde(default)]
    snippets: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WireFacet {
    field_name: String,
    #[serde(default)]
    counts: Vec<WireFacetCount>,
}

#[derive(Debug, Deserialize)]
struct WireFacetCount {
    value: String,
    count: u64,
}

impl WireResult {
    fn into_result_set(self) -> ResultSet {
        ResultSet {
            found: self.found,
            hits: self.hits.into_iter().map(WireHit::into_raw).collect(),
            facet_counts: self
                .facet_counts
                .into_iter()
                .map(|f| FacetField {
                    field_name: f.field_name,
                    counts: f
                        .counts
                        .into_iter()
                        .map(|c| FacetCount::new(c.value, c.count))
                        .collect(),
                })
                .collect(),
        }
    }
}

impl WireHit {
    fn into_raw(self) -> RawHit {
        let highlights = self
            .highlights
            .into_iter()
            .filter_map(|h| {
                let snippet = h.snippet.or_else(|| h.snippets.into_iter().next())?;
                Some(Highlight::new(h.field, snippet))
            })
            .collect();
        RawHit {
            document: self.document,
            highlights,
            text_match: self.text_match,
            search_index: self.search_index,
        }
    }
}

// ============================================================================
// Attempts
// ============================================================================

#[derive(Debug, thiserror::Error)]
enum AttemptError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status {
        status: StatusCode,
        body: String,
    },
}

impl AttemptError {
    /// Worth another attempt: connection problems, timeouts, 5xx.
    fn is_transient(&self) -> bool {
        match self {
            AttemptError::Transport(e) => !e.is_decode() && !e.is_builder(),
            AttemptError::Status { status, .. } => status.is_server_error(),
        }
    }
}

// ============================================================================
// Backend
// ============================================================================

/// HTTP client for the Typesense multi-search endpoint.
pub struct TypesenseBackend {
    client: reqwest::Client,
    config: TypesenseConfig,
}

impl TypesenseBackend {
    /// Build a backend with its own HTTP client.
    pub fn new(config: TypesenseConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(Error::config("typesense.url must not be empty"));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Connection settings in use.
    pub fn config(&self) -> &TypesenseConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.url.trim_end_matches('/'), path)
    }

    async fn attempt(&self, body: &WireRequest<'_>) -> std::result::Result<String, AttemptError> {
        let response = self
            .client
            .post(self.endpoint("/multi_search"))
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(AttemptError::Status { status, body: text });
        }
        Ok(text)
    }

    /// Ping `GET /health`.
    pub async fn health(&self) -> Result<()> {
        let response = self
            .client
            .get(self.endpoint("/health"))
            .send()
            .await
            .map_err(|e| Error::search_unavailable_with_source("health check failed", e))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Error::search_unavailable(format!(
                "health check returned {}",
                response.status()
            )))
        }
    }
}

/// A 400 means the request itself was rejected (for example a sort on a
/// field the collection lacks); anything else is an outage.
fn provider_error(what: &str, code: Option<u16>, message: &str) -> Error {
    let code = code.unwrap_or_default();
    if code == StatusCode::BAD_REQUEST.as_u16() {
        Error::invalid_parameter("query", format!("{what} rejected: {message}"))
    } else {
        Error::search_unavailable(format!("{what} failed ({code}): {message}"))
    }
}

fn decode_response(request: &ProviderRequest, text: &str) -> Result<ProviderResponse> {
    if request.union {
        let merged: WireResult = serde_json::from_str(text).map_err(|e| {
            Error::search_unavailable_with_source("malformed union response", e)
        })?;
        if let Some(message) = merged.error {
            return Err(provider_error("union search", merged.code, &message));
        }
        return Ok(ProviderResponse {
            result_sets: vec![merged.into_result_set()],
        });
    }

    let multi: WireMultiResponse = serde_json::from_str(text)
        .map_err(|e| Error::search_unavailable_with_source("malformed multi-search response", e))?;

    let mut result_sets = Vec::with_capacity(multi.results.len());
    for (index, result) in multi.results.into_iter().enumerate() {
        if let Some(message) = result.error {
            let collection = request
                .searches
                .get(index)
                .map(|s| s.collection.as_str())
                .unwrap_or("?");
            return Err(provider_error(
                &format!("search on '{collection}'"),
                result.code,
                &message,
            ));
        }
        result_sets.push(result.into_result_set());
    }
    Ok(ProviderResponse { result_sets })
}

#[async_trait]
impl SearchBackend for TypesenseBackend {
    async fn multi_search(&self, request: ProviderRequest) -> Result<ProviderResponse> {
        let body = WireRequest {
            union: request.union,
            searches: request.searches.iter().map(WireSearch::from).collect(),
        };
        log::debug!(
            "Typesense multi_search: {} searches, union={}",
            body.searches.len(),
            body.union
        );

        let policy = ConstantBuilder::default()
            .with_delay(Duration::from_millis(self.config.retry_delay_ms))
            .with_max_times(self.config.retries.min(MAX_RETRIES));

        let text = (|| self.attempt(&body))
            .retry(policy)
            .when(AttemptError::is_transient)
            .notify(|err: &AttemptError, delay: Duration| {
                log::warn!("Typesense attempt failed, retrying in {delay:?}: {err}");
            })
            .await
            .map_err(|e| match e {
                AttemptError::Status { status, body } if status == StatusCode::BAD_REQUEST => {
                    Error::invalid_parameter("query", format!("Typesense rejected request: {body}"))
                }
                e => Error::search_unavailable_with_source("Typesense request failed", e),
            })?;

        decode_response(&request, &text)
    }

    fn name(&self) -> &str {
        "typesense"
    }

    async fn is_healthy(&self) -> bool {
        self.health().await.is_ok()
    }
}

impl std::fmt::Debug for TypesenseBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypesenseBackend")
            .field("config", &self.config)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

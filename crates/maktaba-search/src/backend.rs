//! Search backend trait and provider request/response model.
//!
//! This module defines the `SearchBackend` trait that every index client
//! must satisfy, plus the provider-agnostic shapes exchanged with it.
//!
//! # Backends
//!
//! - `TypesenseBackend`: HTTP multi-search (requires `typesense` feature)
//! - `StaticBackend`: canned response, for tests and offline fixture replay
//!
//! # Contract
//!
//! One [`ProviderRequest`] holds one [`ProviderSearch`] per content type.
//! In grouped mode the response carries one [`ResultSet`] per search, in
//! the same order. In union mode it carries a single merged set whose hits
//! name the search they came from via [`RawHit::search_index`].

use std::sync::Mutex;

use async_trait::async_trait;
use maktaba_core::{ContentType, Error, Result};
use serde::{Deserialize, Serialize};

use crate::document::{Document, Highlight};
use crate::result::FacetCount;

/// One search against one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSearch {
    /// Content type this search covers.
    pub content_type: ContentType,
    /// Collection (index) name.
    pub collection: String,
    /// Query text (`*` for browse).
    pub q: String,
    /// Fields matched against the query text.
    pub query_by: Vec<String>,
    /// Filter expression; always contains the tenant clause.
    pub filter_by: String,
    /// Fields to compute facet counts for.
    pub facet_by: Vec<String>,
    /// Sort expression.
    pub sort_by: String,
    /// Fields to produce highlight snippets for.
    pub highlight_fields: Vec<String>,
    /// 1-based page.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
}

/// One round trip to the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// Searches, in content-type request order.
    pub searches: Vec<ProviderSearch>,
    /// Merge all searches into one relevance-ordered set.
    pub union: bool,
}

impl ProviderRequest {
    /// Content type of the search at `index`.
    pub fn content_type_at(&self, index: usize) -> Option<ContentType> {
        self.searches.get(index).map(|s| s.content_type)
    }
}

/// A matched document as returned by the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHit {
    /// The stored document.
    pub document: Document,
    /// Highlight snippets.
    #[serde(default)]
    pub highlights: Vec<Highlight>,
    /// Provider relevance score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_match: Option<u64>,
    /// Index of the originating search (union mode).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_index: Option<usize>,
}

/// Facet counts for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetField {
    /// Facet field name.
    pub field_name: String,
    /// Value counts, as ordered by the provider.
    #[serde(default)]
    pub counts: Vec<FacetCount>,
}

/// Hits and facets for one search (or the union).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    /// Total matches across all pages.
    #[serde(default)]
    pub found: u64,
    /// Hits on the requested page, relevance order.
    #[serde(default)]
    pub hits: Vec<RawHit>,
    /// Facet counts.
    #[serde(default)]
    pub facet_counts: Vec<FacetField>,
}

/// Everything the index returned for one [`ProviderRequest`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// One set per search, or a single set in union mode.
    pub result_sets: Vec<ResultSet>,
}

/// Abstract search backend trait.
///
/// Implementations perform exactly one round trip per call and report any
/// transport or provider failure as `SearchUnavailable`.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Execute all searches of a request in one round trip.
    async fn multi_search(&self, request: ProviderRequest) -> Result<ProviderResponse>;

    /// Get the backend name for diagnostics.
    fn name(&self) -> &str;

    /// Check if the backend can currently serve queries.
    async fn is_healthy(&self) -> bool {
        true
    }
}

/// Backend that answers every request with the same canned response.
///
/// Records each request it receives so callers can inspect what would have
/// been sent to the index. Also used by the CLI to replay saved responses.
///
/// The record is never pruned, so this backend suits tests and one-shot
/// commands, not long-running services.
pub struct StaticBackend {
    outcome: std::result::Result<ProviderResponse, String>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl StaticBackend {
    /// Answer with `response`.
    pub fn new(response: ProviderResponse) -> Self {
        Self {
            outcome: Ok(response),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fail every request with `SearchUnavailable`.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Load a saved response from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        match self.requests.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl SearchBackend for StaticBackend {
    async fn multi_search(&self, request: ProviderRequest) -> Result<ProviderResponse> {
        log::debug!(
            "StaticBackend: {} searches, union={}",
            request.searches.len(),
            request.union
        );
        match self.requests.lock() {
            Ok(mut guard) => guard.push(request),
            Err(poisoned) => poisoned.into_inner().push(request),
        }
        match &self.outcome {
            Ok(response) => Ok(response.clone()),
            Err(message) => Err(Error::search_unavailable(message.clone())),
        }
    }

    fn name(&self) -> &str {
        "static"
    }

    async fn is_healthy(&self) -> bool {
        self.outcome.is_ok()
    }
}

impl std::fmt::Debug for StaticBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticBackend")
            .field("available", &self.outcome.is_ok())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

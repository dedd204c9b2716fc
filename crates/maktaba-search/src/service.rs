//! Search service: build, dispatch, adapt.
//!
//! [`SearchService`] owns the backend handle and the search defaults. Each
//! call turns a [`SearchQuery`] into one [`ProviderRequest`], performs exactly
//! one backend round trip bounded by the configured timeout, and adapts the
//! response into a [`SearchResult`].

use std::collections::BTreeMap;
use std::sync::Arc;

use maktaba_core::{ContentType, Error, Result};
use serde::Serialize;

use crate::backend::{FacetField, ProviderRequest, ProviderResponse, RawHit, SearchBackend};
use crate::hit::SearchHit;
use crate::params::{QueryParams, SearchQuery};
use crate::query::QueryBuilder;
use crate::result::{FacetCount, HitGroup, MIXED_GROUP, SearchResult};
use crate::types::SearchConfig;

/// Notice shown when the index cannot serve a request.
pub const UNAVAILABLE_NOTICE: &str = "Search is temporarily unavailable. Please try again shortly.";

/// Result of a search that may have degraded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// The index answered.
    Found(SearchResult),
    /// The index was unavailable; `result` is empty.
    Unavailable {
        /// Empty result with the requested groups.
        result: SearchResult,
        /// User-facing notice.
        notice: String,
    },
}

impl SearchOutcome {
    /// The result to render, empty when degraded.
    pub fn result(&self) -> &SearchResult {
        match self {
            SearchOutcome::Found(result) => result,
            SearchOutcome::Unavailable { result, .. } => result,
        }
    }

    /// The notice to display, if any.
    pub fn notice(&self) -> Option<&str> {
        match self {
            SearchOutcome::Found(_) => None,
            SearchOutcome::Unavailable { notice, .. } => Some(notice),
        }
    }

    /// Whether the index was unavailable.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SearchOutcome::Unavailable { .. })
    }
}

/// Entry point for browse and search requests.
#[derive(Clone)]
pub struct SearchService {
    backend: Arc<dyn SearchBackend>,
    config: SearchConfig,
}

impl SearchService {
    /// Create a service over a backend.
    pub fn new(backend: Arc<dyn SearchBackend>, config: SearchConfig) -> Self {
        Self { backend, config }
    }

    /// Search defaults in use.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Name of the backend in use.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Normalize inbound parameters for a tenant.
    pub fn prepare(&self, params: QueryParams, domain_id: u64) -> Result<SearchQuery> {
        params.into_query(domain_id, &self.config)
    }

    /// Provider request a query would send.
    pub fn provider_request(&self, query: &SearchQuery) -> ProviderRequest {
        QueryBuilder::new(&self.config).build(query)
    }

    /// Run a query against the index.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        let request = self.provider_request(query);
        let page = query.scope().page.max(1);
        let per_page = request.searches.first().map(|s| s.per_page).unwrap_or(0);

        log::debug!(
            "{} on {}: domain={} types={:?} page={} union={}",
            if query.is_browse() { "browse" } else { "search" },
            self.backend.name(),
            query.scope().domain_id,
            request
                .searches
                .iter()
                .map(|s| s.content_type.as_str())
                .collect::<Vec<_>>(),
            page,
            request.union
        );

        if request.searches.is_empty() {
            log::debug!("No content types to search");
            return Ok(SearchResult::empty(Vec::<String>::new(), page, per_page));
        }

        let timeout = self.config.request_timeout();
        let response = tokio::time::timeout(timeout, self.backend.multi_search(request.clone()))
            .await
            .map_err(|_| {
                Error::search_unavailable(format!("search timed out after {timeout:?}"))
            })??;

        let result = if request.union {
            assemble_union(&request, response, page, per_page)?
        } else {
            assemble_grouped(&request, response, page, per_page)?
        };
        log::debug!(
            "Search returned {} of {} matches",
            result.hits().count(),
            result.total_found()
        );
        Ok(result)
    }

    /// Run a query, degrading to an empty result when the index is down.
    ///
    /// Only `SearchUnavailable` degrades; other errors are returned.
    pub async fn search_or_degraded(&self, query: &SearchQuery) -> Result<SearchOutcome> {
        match self.search(query).await {
            Ok(result) => Ok(SearchOutcome::Found(result)),
            Err(e) if e.is_recoverable() => {
                log::warn!("Search degraded: {e}");
                Ok(SearchOutcome::Unavailable {
                    result: self.empty_result(query),
                    notice: UNAVAILABLE_NOTICE.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    fn empty_result(&self, query: &SearchQuery) -> SearchResult {
        let request = self.provider_request(query);
        let page = query.scope().page.max(1);
        let per_page = request.searches.first().map(|s| s.per_page).unwrap_or(0);
        if request.union {
            SearchResult::empty([MIXED_GROUP], page, per_page)
        } else {
            SearchResult::empty(
                request.searches.iter().map(|s| s.content_type.as_str()),
                page,
                per_page,
            )
        }
    }
}

impl std::fmt::Debug for SearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchService")
            .field("backend", &self.backend.name())
            .field("config", &self.config)
            .finish()
    }
}

// ============================================================================
// Response assembly
// ============================================================================

fn to_hit(content_type: ContentType, raw: RawHit) -> SearchHit {
    let hit = SearchHit::new(content_type, raw.document, raw.highlights);
    match raw.text_match {
        Some(score) => hit.with_text_match(score),
        None => hit,
    }
}

fn assemble_grouped(
    request: &ProviderRequest,
    response: ProviderResponse,
    page: u32,
    per_page: u32,
) -> Result<SearchResult> {
    if response.result_sets.len() != request.searches.len() {
        return Err(Error::search_unavailable(format!(
            "expected {} result sets, got {}",
            request.searches.len(),
            response.result_sets.len()
        )));
    }

    let mut facets = FacetMerge::default();
    let mut total_found = 0;
    let groups = request
        .searches
        .iter()
        .zip(response.result_sets)
        .map(|(search, set)| {
            total_found += set.found;
            facets.add(set.facet_counts);
            let hits = set
                .hits
                .into_iter()
                .map(|raw| to_hit(search.content_type, raw))
                .collect();
            HitGroup::new(search.content_type.as_str(), hits, set.found)
        })
        .collect();

    Ok(SearchResult::new(
        groups,
        facets.finish(),
        total_found,
        page,
        per_page,
    ))
}

fn assemble_union(
    request: &ProviderRequest,
    response: ProviderResponse,
    page: u32,
    per_page: u32,
) -> Result<SearchResult> {
    let mut sets = response.result_sets.into_iter();
    let set = match (sets.next(), sets.next()) {
        (Some(set), None) => set,
        (None, _) => {
            return Err(Error::search_unavailable("union response has no result set"));
        }
        (Some(_), Some(_)) => {
            return Err(Error::search_unavailable(
                "union response has more than one result set",
            ));
        }
    };

    let mut facets = FacetMerge::default();
    facets.add(set.facet_counts);

    let hits = set
        .hits
        .into_iter()
        .filter_map(|raw| match resolve_content_type(request, &raw) {
            Some(ct) => Some(to_hit(ct, raw)),
            None => {
                log::warn!(
                    "Skipping union hit with unresolvable content type (search_index={:?})",
                    raw.search_index
                );
                None
            }
        })
        .collect();

    Ok(SearchResult::new(
        vec![HitGroup::new(MIXED_GROUP, hits, set.found)],
        facets.finish(),
        set.found,
        page,
        per_page,
    ))
}

/// Search index first, then the document's own `content_type` field.
fn resolve_content_type(request: &ProviderRequest, raw: &RawHit) -> Option<ContentType> {
    raw.search_index
        .and_then(|i| request.content_type_at(i))
        .or_else(|| {
            raw.document
                .get("content_type")
                .and_then(|v| v.as_str())
                .and_then(|s| s.parse().ok())
        })
}

/// Sums facet counts per `(field, value)`, preserving first appearance.
#[derive(Default)]
struct FacetMerge {
    fields: BTreeMap<String, Vec<FacetCount>>,
}

impl FacetMerge {
    fn add(&mut self, facet_fields: Vec<FacetField>) {
        for field in facet_fields {
            let counts = self.fields.entry(field.field_name).or_default();
            for incoming in field.counts {
                match counts.iter_mut().find(|c| c.value == incoming.value) {
                    Some(existing) => existing.count += incoming.count,
                    None => counts.push(incoming),
                }
            }
        }
    }

    fn finish(mut self) -> BTreeMap<String, Vec<FacetCount>> {
        for counts in self.fields.values_mut() {
            // stable sort keeps first appearance on ties
            counts.sort_by(|a, b| b.count.cmp(&a.count));
        }
        self.fields
    }
}

// ============================================================================
// Tests
// ============================================================================

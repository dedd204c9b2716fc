//! Inbound request parameters and their normalized form.
//!
//! [`QueryParams`] mirrors the query string a listing or search page
//! receives. [`QueryParams::into_query`] turns it into a [`SearchQuery`],
//! which is either a browse (wildcard, default order, no user filters) or a
//! search (free text, relevance order, filters applied).

use std::fmt;
use std::str::FromStr;

use maktaba_core::{normalize_media_type, normalize_slug, ContentType, Error, Result};
use serde::{Deserialize, Serialize};

use crate::types::{GroupingMode, SearchConfig};

/// Query text meaning "match everything".
pub const MATCH_ALL: &str = "*";

/// Parsed query-string parameters, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    /// Free-text query.
    pub q: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
    /// Content type keys (singular or plural).
    #[serde(alias = "content_types[]")]
    pub content_types: Vec<String>,
    /// Scholar slugs.
    #[serde(alias = "scholars[]")]
    pub scholars: Vec<String>,
    /// Media types.
    #[serde(alias = "media_types[]")]
    pub media_types: Vec<String>,
    /// Topic slugs.
    #[serde(alias = "topics[]")]
    pub topics: Vec<String>,
    /// Minimum duration in seconds.
    pub duration_min: Option<u32>,
    /// Maximum duration in seconds.
    pub duration_max: Option<u32>,
    /// Merge all content types into one relevance-ordered list.
    pub expand_search: bool,
    /// Sort override, `field:asc` or `field:desc`.
    pub sort: Option<String>,
}

/// Inclusive duration bounds in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationRange {
    /// Lower bound.
    pub min: Option<u32>,
    /// Upper bound.
    pub max: Option<u32>,
}

impl DurationRange {
    /// Build a range, swapping inverted bounds. `None` when both are absent.
    pub fn new(min: Option<u32>, max: Option<u32>) -> Option<Self> {
        match (min, max) {
            (None, None) => None,
            (Some(a), Some(b)) if a > b => Some(Self {
                min: Some(b),
                max: Some(a),
            }),
            _ => Some(Self { min, max }),
        }
    }
}

/// User-selected facet filters. Only ever applied to a [`SearchRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    /// Scholar slugs.
    pub scholars: Vec<String>,
    /// Media types.
    pub media_types: Vec<String>,
    /// Topic slugs.
    pub topics: Vec<String>,
    /// Duration bounds.
    pub duration: Option<DurationRange>,
}

impl Filters {
    /// Whether no filter is set.
    pub fn is_empty(&self) -> bool {
        self.scholars.is_empty()
            && self.media_types.is_empty()
            && self.topics.is_empty()
            && self.duration.is_none()
    }
}

/// A single-field sort expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortBy {
    /// Indexed field name.
    pub field: String,
    /// Descending order.
    pub descending: bool,
}

impl FromStr for SortBy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (field, direction) = match s.trim().split_once(':') {
            Some((field, direction)) => (field, Some(direction)),
            None => (s.trim(), None),
        };
        if field.is_empty()
            || !field
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(Error::invalid_parameter(
                "sort",
                format!("invalid sort field '{field}'"),
            ));
        }
        let descending = match direction.map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => false,
            Some("desc") => true,
            Some(other) => {
                return Err(Error::invalid_parameter(
                    "sort",
                    format!("invalid sort direction '{other}'"),
                ));
            }
        };
        Ok(Self {
            field: field.to_string(),
            descending,
        })
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = if self.descending { "desc" } else { "asc" };
        write!(f, "{}:{direction}", self.field)
    }
}

/// What to search across and which page to return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    /// Tenant domain id. Every provider search is filtered by it.
    pub domain_id: u64,
    /// Requested content types; empty means the configured default set.
    pub content_types: Vec<ContentType>,
    /// 1-based page.
    pub page: u32,
    /// Explicit page size, if the caller gave one.
    pub per_page: Option<u32>,
    /// Caller sort override.
    pub sort: Option<SortBy>,
    /// Per-type groups or one mixed list.
    pub grouping: GroupingMode,
}

impl Scope {
    /// Scope over the default content types, first page.
    pub fn new(domain_id: u64) -> Self {
        Self {
            domain_id,
            content_types: Vec::new(),
            page: 1,
            per_page: None,
            sort: None,
            grouping: GroupingMode::PerType,
        }
    }

    /// Restrict to the given content types.
    pub fn with_content_types(mut self, content_types: impl IntoIterator<Item = ContentType>) -> Self {
        self.content_types = dedup(content_types);
        self
    }

    /// Select a page (0 is treated as 1).
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Set an explicit page size.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Override the sort order.
    pub fn with_sort(mut self, sort: SortBy) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Choose per-type or mixed grouping.
    pub fn with_grouping(mut self, grouping: GroupingMode) -> Self {
        self.grouping = grouping;
        self
    }

    /// Requested content types, or the configured defaults.
    pub fn effective_content_types(&self, config: &SearchConfig) -> Vec<ContentType> {
        if self.content_types.is_empty() {
            dedup(config.default_content_types.iter().copied())
        } else {
            self.content_types.clone()
        }
    }
}

/// A wildcard listing. Carries no user filters by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseRequest {
    /// What to list.
    pub scope: Scope,
}

impl BrowseRequest {
    /// Create a browse request.
    pub fn new(scope: Scope) -> Self {
        Self { scope }
    }
}

/// A free-text search with optional facet filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// What to search across.
    pub scope: Scope,
    /// Query text (never the wildcard).
    pub text: String,
    /// Facet filters.
    pub filters: Filters,
}

impl SearchRequest {
    /// Create a search request without filters.
    pub fn new(scope: Scope, text: impl Into<String>) -> Self {
        Self {
            scope,
            text: text.into(),
            filters: Filters::default(),
        }
    }

    /// Attach facet filters.
    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }
}

/// A normalized request: browse or search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SearchQuery {
    /// Wildcard listing in default order.
    Browse(BrowseRequest),
    /// Relevance-ordered search.
    Search(SearchRequest),
}

impl SearchQuery {
    /// The scope shared by both variants.
    pub fn scope(&self) -> &Scope {
        match self {
            SearchQuery::Browse(req) => &req.scope,
            SearchQuery::Search(req) => &req.scope,
        }
    }

    /// Text sent to the provider.
    pub fn text(&self) -> &str {
        match self {
            SearchQuery::Browse(_) => MATCH_ALL,
            SearchQuery::Search(req) => &req.text,
        }
    }

    /// Filters to apply; always `None` when browsing.
    pub fn filters(&self) -> Option<&Filters> {
        match self {
            SearchQuery::Browse(_) => None,
            SearchQuery::Search(req) => Some(&req.filters),
        }
    }

    /// Whether this is a browse.
    pub fn is_browse(&self) -> bool {
        matches!(self, SearchQuery::Browse(_))
    }
}

/// Parse a requested content type, rejecting facet-only entities.
fn parse_publishable(key: &str) -> Result<ContentType> {
    let content_type = key.parse::<ContentType>()?;
    if content_type.is_publishable() {
        Ok(content_type)
    } else {
        Err(Error::invalid_content_type(content_type.as_str()))
    }
}

impl QueryParams {
    /// Normalize into a [`SearchQuery`] scoped to a tenant domain.
    ///
    /// # Errors
    ///
    /// `InvalidContentType` for an unknown or facet-only (`scholars`)
    /// content type key and `InvalidParameter` for a malformed sort
    /// expression.
    pub fn into_query(self, domain_id: u64, config: &SearchConfig) -> Result<SearchQuery> {
        let content_types = self
            .content_types
            .iter()
            .filter(|key| !key.trim().is_empty())
            .map(String::as_str)
            .map(parse_publishable)
            .collect::<Result<Vec<_>>>()?;

        let sort = self
            .sort
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<SortBy>)
            .transpose()?;

        let grouping = if self.expand_search {
            GroupingMode::Mixed
        } else {
            GroupingMode::PerType
        };

        let mut scope = Scope::new(domain_id)
            .with_content_types(content_types)
            .with_page(self.page.unwrap_or(1))
            .with_grouping(grouping);
        scope.per_page = self.per_page.map(|n| n.min(config.max_per_page));
        scope.sort = sort;

        let text = self.q.as_deref().map(str::trim).unwrap_or_default();
        if text.is_empty() || text == MATCH_ALL {
            log::debug!("browse request for domain {domain_id}");
            return Ok(SearchQuery::Browse(BrowseRequest::new(scope)));
        }

        let filters = Filters {
            scholars: normalize_all(&self.scholars, |s| Some(normalize_slug(s))),
            media_types: normalize_all(&self.media_types, normalize_media_type),
            topics: normalize_all(&self.topics, |s| Some(normalize_slug(s))),
            duration: DurationRange::new(self.duration_min, self.duration_max),
        };

        Ok(SearchQuery::Search(
            SearchRequest::new(scope, text).with_filters(filters),
        ))
    }
}

fn normalize_all(values: &[String], f: impl Fn(&str) -> Option<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values.iter().filter_map(|v| f(v)) {
        if !value.is_empty() && !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

fn dedup(content_types: impl IntoIterator<Item = ContentType>) -> Vec<ContentType> {
    let mut out = Vec::new();
    for ct in content_types {
        if !out.contains(&ct) {
            out.push(ct);
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================

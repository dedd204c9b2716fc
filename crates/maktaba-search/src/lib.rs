//! Search query construction and result adaptation for Maktaba.
//!
//! This crate turns normalized request parameters into one multi-search
//! round trip against an external index (Typesense, feature-gated) and
//! adapts the raw heterogeneous documents it returns into a uniform,
//! content-type-aware view model.
//!
//! # Features
//!
//! - `typesense` (default): Enable the Typesense HTTP backend
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      maktaba-search                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  QueryParams → SearchQuery (Browse | Search)                │
//! │  QueryBuilder → ProviderRequest (filter/sort/facets/paging) │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SearchBackend trait                                        │
//! │  ├── StaticBackend (canned responses, replay fixtures)      │
//! │  └── TypesenseBackend (POST /multi_search)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SearchHit (per-document adapter + URL routing)             │
//! │  SearchResult (groups, facets, pagination)                  │
//! │  SearchService (build → dispatch → adapt)                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Browse vs. search
//!
//! A wildcard query (`"*"`, or no query at all) is a *browse*: results come
//! back in each content type's default order and user-selected facet
//! filters are dropped. [`SearchQuery::Browse`] has no filter field, so the
//! suppression cannot be forgotten downstream.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use maktaba_search::{QueryParams, SearchConfig, SearchService, TypesenseBackend};
//!
//! let backend = TypesenseBackend::new(typesense_config)?;
//! let service = SearchService::new(Arc::new(backend), SearchConfig::default());
//!
//! let params = QueryParams {
//!     q: Some("salah".to_string()),
//!     content_types: vec!["books".to_string(), "lectures".to_string()],
//!     ..Default::default()
//! };
//! let query = service.prepare(params, 3)?;
//!
//! let result = service.search(&query).await?;
//! for hit in result.hits_for("book") {
//!     println!("{}: {}", hit.label().unwrap_or_default(), hit.url()?);
//! }
//! ```

// Core modules (always available)
pub mod backend;
pub mod document;
pub mod hit;
pub mod params;
pub mod query;
pub mod result;
pub mod routing;
pub mod service;
pub mod types;

// Feature-gated Typesense module
#[cfg(feature = "typesense")]
pub mod typesense;

// Re-exports
pub use backend::{
    FacetField, ProviderRequest, ProviderResponse, ProviderSearch, RawHit, ResultSet,
    SearchBackend, StaticBackend,
};
pub use document::{Document, Highlight};
pub use hit::SearchHit;
pub use params::{
    BrowseRequest, DurationRange, Filters, QueryParams, Scope, SearchQuery, SearchRequest, SortBy,
    MATCH_ALL,
};
pub use query::QueryBuilder;
pub use result::{FacetCount, HitGroup, MIXED_GROUP, SearchResult};
pub use routing::RouteTable;
pub use service::{SearchOutcome, SearchService, UNAVAILABLE_NOTICE};
pub use types::{GroupingMode, SearchConfig};

#[cfg(feature = "typesense")]
pub use typesense::{TypesenseBackend, TypesenseConfig};

pub use maktaba_core::{ContentType, Error, Result};

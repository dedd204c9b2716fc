//! Common types for the search layer.
//!
//! These types are used across all search backends and are always available
//! regardless of feature flags.

use std::time::Duration;

use maktaba_core::ContentType;
use serde::{Deserialize, Serialize};

use crate::routing::RouteTable;

/// How hits from several content types are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingMode {
    /// One group per requested content type, in request order.
    #[default]
    PerType,
    /// All hits merged into one relevance-ordered `mixed` group.
    Mixed,
}

/// Search service configuration.
///
/// Deployments provide this to configure paging, facets, and URL segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Content types searched when a request names none.
    #[serde(default = "default_content_types")]
    pub default_content_types: Vec<ContentType>,

    /// Page size when a single content type is searched.
    #[serde(default = "default_per_page_single")]
    pub per_page_single: u32,

    /// Page size per type when several content types are searched.
    #[serde(default = "default_per_page_multi")]
    pub per_page_multi: u32,

    /// Upper bound for caller-supplied page sizes.
    #[serde(default = "default_max_per_page")]
    pub max_per_page: u32,

    /// Facet fields requested from the index (intersected per content type).
    #[serde(default = "default_facet_fields")]
    pub facet_fields: Vec<String>,

    /// Prefix prepended to every collection name (e.g. `"staging_"`).
    #[serde(default)]
    pub index_prefix: String,

    /// Overall deadline for one search round trip, retries included.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// URL path segments per content type.
    #[serde(default)]
    pub routes: RouteTable,
}

fn default_content_types() -> Vec<ContentType> {
    ContentType::PUBLISHABLE.to_vec()
}

fn default_per_page_single() -> u32 {
    12
}

fn default_per_page_multi() -> u32 {
    4
}

fn default_max_per_page() -> u32 {
    100
}

fn default_facet_fields() -> Vec<String> {
    vec![
        "scholar_slug".to_string(),
        "media_type".to_string(),
        "topic_slugs".to_string(),
    ]
}

fn default_request_timeout_ms() -> u64 {
    5000
}

impl SearchConfig {
    /// Effective page size for a request spanning `type_count` content types.
    ///
    /// Several types get fewer results each so one type does not dominate a
    /// mixed results page. Explicit sizes are clamped to `max_per_page`.
    pub fn per_page_for(&self, type_count: usize, grouping: GroupingMode, requested: Option<u32>) -> u32 {
        let default = if type_count > 1 && grouping == GroupingMode::PerType {
            self.per_page_multi
        } else {
            self.per_page_single
        };
        requested.unwrap_or(default).min(self.max_per_page)
    }

    /// Overall deadline for one search round trip.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_content_types: default_content_types(),
            per_page_single: default_per_page_single(),
            per_page_multi: default_per_page_multi(),
            max_per_page: default_max_per_page(),
            facet_fields: default_facet_fields(),
            index_prefix: String::new(),
            request_timeout_ms: default_request_timeout_ms(),
            routes: RouteTable::default(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Query building utilities.
//!
//! Provides `QueryBuilder` for turning a [`SearchQuery`] into the
//! provider-agnostic [`ProviderRequest`]: one search per content type, each
//! carrying the tenant filter, optional facet filters, a sort expression,
//! facet fields, and paging.

use maktaba_core::ContentType;

use crate::backend::{ProviderRequest, ProviderSearch};
use crate::params::{DurationRange, Filters, SearchQuery};
use crate::types::{GroupingMode, SearchConfig};

/// Sort prefix that puts relevance first in search mode.
const RELEVANCE_SORT: &str = "_text_match:desc";

/// Builder for constructing provider requests.
pub struct QueryBuilder<'a> {
    config: &'a SearchConfig,
}

impl<'a> QueryBuilder<'a> {
    /// Create a new query builder.
    pub fn new(config: &'a SearchConfig) -> Self {
        Self { config }
    }

    /// Build the provider request for a query.
    pub fn build(&self, query: &SearchQuery) -> ProviderRequest {
        let scope = query.scope();
        let content_types = scope.effective_content_types(self.config);
        let per_page =
            self.config
                .per_page_for(content_types.len(), scope.grouping, scope.per_page);
        let filter_by = filter_expression(scope.domain_id, query.filters());

        let searches = content_types
            .iter()
            .map(|&ct| ProviderSearch {
                content_type: ct,
                collection: format!("{}{}", self.config.index_prefix, ct.plural()),
                q: query.text().to_string(),
                query_by: to_strings(ct.query_fields()),
                filter_by: filter_by.clone(),
                facet_by: self.facet_fields(ct),
                sort_by: self.sort_expression(ct, query),
                highlight_fields: to_strings(ct.query_fields()),
                page: scope.page.max(1),
                per_page,
            })
            .collect();

        ProviderRequest {
            searches,
            union: scope.grouping == GroupingMode::Mixed,
        }
    }

    /// Configured facet fields the content type's collection declares.
    fn facet_fields(&self, ct: ContentType) -> Vec<String> {
        self.config
            .facet_fields
            .iter()
            .filter(|f| ct.facet_fields().contains(&f.as_str()))
            .cloned()
            .collect()
    }

    /// Caller override, else default order when browsing, else relevance
    /// with the default order as tiebreaker.
    fn sort_expression(&self, ct: ContentType, query: &SearchQuery) -> String {
        if let Some(sort) = &query.scope().sort {
            return sort.to_string();
        }
        if query.is_browse() {
            ct.default_sort().to_string()
        } else {
            format!("{RELEVANCE_SORT},{}", ct.default_sort())
        }
    }
}

/// Tenant clause plus any facet filters, joined with `&&`.
pub fn filter_expression(domain_id: u64, filters: Option<&Filters>) -> String {
    let mut clauses = vec![format!("domain_ids:=[{domain_id}]")];
    if let Some(filters) = filters {
        if let Some(clause) = in_clause("scholar_slug", &filters.scholars) {
            clauses.push(clause);
        }
        if let Some(clause) = in_clause("media_type", &filters.media_types) {
            clauses.push(clause);
        }
        if let Some(clause) = in_clause("topic_slugs", &filters.topics) {
            clauses.push(clause);
        }
        if let Some(clause) = filters.duration.and_then(duration_clause) {
            clauses.push(clause);
        }
    }
    clauses.join(" && ")
}

fn in_clause(field: &str, values: &[String]) -> Option<String> {
    if values.is_empty() {
        return None;
    }
    let quoted: Vec<String> = values.iter().map(|v| quote(v)).collect();
    Some(format!("{field}:=[{}]", quoted.join(",")))
}

fn duration_clause(range: DurationRange) -> Option<String> {
    match (range.min, range.max) {
        (Some(min), Some(max)) => Some(format!("duration:[{min}..{max}]")),
        (Some(min), None) => Some(format!("duration:>={min}")),
        (None, Some(max)) => Some(format!("duration:<={max}")),
        (None, None) => None,
    }
}

/// Backtick-quote a filter value so commas and operators stay literal.
fn quote(value: &str) -> String {
    format!("`{}`", value.replace('`', ""))
}

fn to_strings(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

// ============================================================================
// Tests
// ============================================================================

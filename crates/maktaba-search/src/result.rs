//! Search result aggregate.
//!
//! A [`SearchResult`] is a plain value: hits grouped by content type (or one
//! `mixed` group in union mode), facet counts for the filter UI, and the
//! pagination state of the request. Nothing about it changes after
//! construction.

use std::borrow::Cow;
use std::collections::BTreeMap;

use maktaba_core::ContentType;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::hit::SearchHit;

/// Group key used when hits of several content types are merged.
pub const MIXED_GROUP: &str = "mixed";

/// One value of a facet and how many matching documents carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    /// Facet value (e.g. a scholar slug).
    pub value: String,
    /// Number of matching documents.
    pub count: u64,
}

impl FacetCount {
    /// Create a new facet count.
    pub fn new(value: impl Into<String>, count: u64) -> Self {
        Self {
            value: value.into(),
            count,
        }
    }
}

/// Hits for one content type (or the `mixed` union), in provider order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitGroup {
    /// Content type key, or [`MIXED_GROUP`].
    pub key: String,
    /// Hits on the current page.
    pub hits: Vec<SearchHit>,
    /// Total matches for this group across all pages.
    pub found: u64,
}

impl HitGroup {
    /// Create a new group.
    pub fn new(key: impl Into<String>, hits: Vec<SearchHit>, found: u64) -> Self {
        Self {
            key: key.into(),
            hits,
            found,
        }
    }
}

/// Aggregate result of one search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    groups: Vec<HitGroup>,
    facets: BTreeMap<String, Vec<FacetCount>>,
    total_found: u64,
    page: u32,
    per_page: u32,
}

/// Canonical group key: content types by singular key, anything else as-is.
fn group_key(key: &str) -> Cow<'_, str> {
    match key.parse::<ContentType>() {
        Ok(ct) => Cow::Borrowed(ct.as_str()),
        Err(_) => Cow::Owned(key.trim().to_ascii_lowercase()),
    }
}

impl SearchResult {
    /// Create a result from already-grouped hits.
    pub fn new(
        groups: Vec<HitGroup>,
        facets: BTreeMap<String, Vec<FacetCount>>,
        total_found: u64,
        page: u32,
        per_page: u32,
    ) -> Self {
        Self {
            groups,
            facets,
            total_found,
            page,
            per_page,
        }
    }

    /// An empty result with one empty group per key.
    ///
    /// Used to render the degraded view when the index is unavailable.
    pub fn empty<I, K>(keys: I, page: u32, per_page: u32) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let groups = keys
            .into_iter()
            .map(|key| HitGroup::new(key, Vec::new(), 0))
            .collect();
        Self::new(groups, BTreeMap::new(), 0, page, per_page)
    }

    /// Hit groups in request order.
    pub fn groups(&self) -> &[HitGroup] {
        &self.groups
    }

    /// Facet counts by facet field name.
    pub fn facets(&self) -> &BTreeMap<String, Vec<FacetCount>> {
        &self.facets
    }

    /// Facet counts for one field (empty when the field was not faceted).
    pub fn facet(&self, field: &str) -> &[FacetCount] {
        self.facets.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total matching documents across the whole result.
    pub fn total_found(&self) -> u64 {
        self.total_found
    }

    /// Current 1-based page.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Page size.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// `ceil(total_found / per_page)`, or `0` when either is zero.
    pub fn total_pages(&self) -> u64 {
        if self.per_page == 0 || self.total_found == 0 {
            return 0;
        }
        self.total_found.div_ceil(u64::from(self.per_page))
    }

    /// `true` iff nothing matched, regardless of group bookkeeping.
    pub fn is_empty(&self) -> bool {
        self.total_found == 0
    }

    /// Whether another page follows the current one.
    pub fn has_next_page(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }

    /// Whether a page precedes the current one.
    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }

    /// Group under a key; accepts a [`ContentType`] or its string forms.
    pub fn group(&self, key: impl AsRef<str>) -> Option<&HitGroup> {
        let key = group_key(key.as_ref());
        self.groups.iter().find(|g| group_key(&g.key) == key)
    }

    /// Hits under a key (empty when the key has no group).
    pub fn hits_for(&self, key: impl AsRef<str>) -> &[SearchHit] {
        self.group(key).map(|g| g.hits.as_slice()).unwrap_or_default()
    }

    /// Whether the group under a key has at least one hit.
    pub fn has_results_for(&self, key: impl AsRef<str>) -> bool {
        !self.hits_for(key).is_empty()
    }

    /// All hits in group order.
    pub fn hits(&self) -> impl Iterator<Item = &SearchHit> {
        self.groups.iter().flat_map(|g| g.hits.iter())
    }
}

impl Serialize for SearchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SearchResult", 6)?;
        state.serialize_field("groups", &self.groups)?;
        state.serialize_field("facets", &self.facets)?;
        state.serialize_field("total_found", &self.total_found)?;
        state.serialize_field("page", &self.page)?;
        state.serialize_field("per_page", &self.per_page)?;
        state.serialize_field("total_pages", &self.total_pages())?;
        state.end()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::document::Document;
    use proptest::prelude::*;

    fn result(total_found: u64, per_page: u32) -> SearchResult {
        SearchResult::new(Vec::new(), BTreeMap::new(), total_found, 1, per_page)
    }

    fn book_hit(slug: &str) -> SearchHit {
        let mut doc = Document::new();
        doc.insert("slug".to_string(), slug.into());
        SearchHit::new(ContentType::Book, doc, Vec::new())
    }

    #[test]
    fn test_total_pages_ceiling() {
        assert_eq!(result(25, 10).total_pages(), 3);
        assert_eq!(result(20, 10).total_pages(), 2);
        assert_eq!(result(1, 10).total_pages(), 1);
    }

    #[test]
    fn test_total_pages_zero_per_page() {
        assert_eq!(result(25, 0).total_pages(), 0);
        assert_eq!(result(0, 0).total_pages(), 0);
    }

    #[test]
    fn test_total_pages_zero_found() {
        assert_eq!(result(0, 10).total_pages(), 0);
    }

    #[test]
    fn test_empty_ignores_stray_groups() {
        let r = SearchResult::empty(["book", "lecture"], 1, 10);
        assert!(r.is_empty());
        assert_eq!(r.groups().len(), 2);

        let r = SearchResult::new(
            vec![HitGroup::new("book", Vec::new(), 0)],
            BTreeMap::new(),
            3,
            1,
            10,
        );
        assert!(!r.is_empty());
    }

    #[test]
    fn test_has_results_for_accepts_enum_and_strings() {
        let r = SearchResult::new(
            vec![
                HitGroup::new("book", vec![book_hit("a")], 1),
                HitGroup::new("lecture", Vec::new(), 0),
            ],
            BTreeMap::new(),
            1,
            1,
            10,
        );

        assert!(r.has_results_for(ContentType::Book));
        assert!(r.has_results_for("book"));
        assert!(r.has_results_for("books"));
        assert!(!r.has_results_for(ContentType::Lecture));
        assert!(!r.has_results_for("lecture"));
        assert!(!r.has_results_for(ContentType::Fatwa));
        assert!(!r.has_results_for("unknown"));
    }

    #[test]
    fn test_mixed_group_lookup() {
        let r = SearchResult::new(
            vec![HitGroup::new(MIXED_GROUP, vec![book_hit("a")], 1)],
            BTreeMap::new(),
            1,
            1,
            10,
        );
        assert!(r.has_results_for("mixed"));
        assert_eq!(r.hits_for(MIXED_GROUP).len(), 1);
    }

    #[test]
    fn test_page_navigation() {
        let r = SearchResult::new(Vec::new(), BTreeMap::new(), 25, 2, 10);
        assert!(r.has_next_page());
        assert!(r.has_previous_page());

        let r = SearchResult::new(Vec::new(), BTreeMap::new(), 25, 3, 10);
        assert!(!r.has_next_page());
    }

    #[test]
    fn test_facet_lookup() {
        let mut facets = BTreeMap::new();
        facets.insert(
            "media_type".to_string(),
            vec![FacetCount::new("audio", 7), FacetCount::new("video", 2)],
        );
        let r = SearchResult::new(Vec::new(), facets, 9, 1, 10);
        assert_eq!(r.facet("media_type")[0], FacetCount::new("audio", 7));
        assert!(r.facet("scholar_slug").is_empty());
    }

    #[test]
    fn test_serialize_includes_total_pages() {
        let json = serde_json::to_value(result(25, 10)).unwrap();
        assert_eq!(json["total_pages"], 3);
        assert_eq!(json["total_found"], 25);
    }

    proptest! {
        #[test]
        fn prop_total_pages_is_ceiling(total in 0u64..1_000_000, per_page in 1u32..500) {
            let r = result(total, per_page);
            let expected = (total + u64::from(per_page) - 1) / u64::from(per_page);
            prop_assert_eq!(r.total_pages(), expected);
            prop_assert_eq!(r.total_pages(), r.total_pages());
        }

        #[test]
        fn prop_empty_iff_nothing_found(total in 0u64..100) {
            prop_assert_eq!(result(total, 10).is_empty(), total == 0);
        }
    }
}

//! Shared fixtures for maktaba-search integration tests.

#![allow(dead_code)]

use maktaba_search::{ProviderResponse, RawHit, ResultSet};
use serde_json::{Value, json};

/// A grouped Typesense multi-search body with one book and one lecture set.
pub fn grouped_body() -> Value {
    json!({
        "results": [
            {
                "found": 2,
                "hits": [
                    {
                        "document": {
                            "id": "11",
                            "slug": "kitab-at-tawhid",
                            "title": "Kitab at-Tawhid",
                            "description": "Explanation of tawhid",
                            "scholar_name": "Ibn Baz",
                            "scholar_slug": "ibn-baz",
                            "media_type": "pdf"
                        },
                        "highlights": [
                            {"field": "title", "snippet": "Kitab at-<mark>Tawhid</mark>"}
                        ],
                        "text_match": 578730123365711993u64
                    }
                ],
                "facet_counts": [
                    {"field_name": "scholar_slug", "counts": [{"value": "ibn-baz", "count": 2}]}
                ]
            },
            {
                "found": 1,
                "hits": [
                    {
                        "document": {
                            "id": 42,
                            "slug": "tawhid-lecture-1",
                            "title": "Tawhid, part 1",
                            "scholar_slug": "ibn-uthaymeen",
                            "media_type": "audio",
                            "duration": 3600
                        }
                    }
                ],
                "facet_counts": [
                    {"field_name": "scholar_slug", "counts": [{"value": "ibn-uthaymeen", "count": 1}]},
                    {"field_name": "media_type", "counts": [{"value": "audio", "count": 1}]}
                ]
            }
        ]
    })
}

/// A union body whose hits point back at their search by index.
pub fn union_body() -> Value {
    json!({
        "found": 4,
        "hits": [
            {"document": {"id": "2", "slug": "l-2", "title": "Lecture"}, "search_index": 1},
            {"document": {"id": "1", "slug": "b-1", "title": "Book"}, "search_index": 0}
        ],
        "facet_counts": []
    })
}

/// A provider response with a single set holding `found` matches and no hits.
pub fn found_only(found: u64) -> ProviderResponse {
    ProviderResponse {
        result_sets: vec![ResultSet {
            found,
            ..Default::default()
        }],
    }
}

/// A raw hit for a document.
pub fn raw_hit(document: Value) -> RawHit {
    RawHit {
        document: document.as_object().cloned().unwrap_or_default(),
        highlights: Vec::new(),
        text_match: None,
        search_index: None,
    }
}

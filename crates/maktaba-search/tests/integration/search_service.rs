//! End-to-end tests from query parameters to the adapted result.

use std::sync::Arc;

use maktaba_search::{
    ContentType, Error, Highlight, MIXED_GROUP, ProviderResponse, QueryParams, ResultSet, SearchConfig,
    SearchQuery, SearchService, StaticBackend,
};
use serde_json::json;

use crate::common::{found_only, raw_hit};

fn service_with(response: ProviderResponse) -> (Arc<StaticBackend>, SearchService) {
    let backend = Arc::new(StaticBackend::new(response));
    let service = SearchService::new(backend.clone(), SearchConfig::default());
    (backend, service)
}

#[tokio::test]
async fn test_pagination_scenario() {
    let (_, service) = service_with(found_only(25));
    let params = QueryParams {
        q: Some("salah".to_string()),
        content_types: vec!["fatwas".to_string()],
        per_page: Some(10),
        page: Some(3),
        ..Default::default()
    };
    let query = service.prepare(params, 1).unwrap();
    let result = service.search(&query).await.unwrap();

    assert_eq!(result.total_pages(), 3);
    assert_eq!(result.page(), 3);
    assert!(!result.has_next_page());
    assert!(result.has_previous_page());
}

#[tokio::test]
async fn test_blank_query_is_browse() {
    let (backend, service) = service_with(found_only(0));
    let params = QueryParams {
        q: Some("   ".to_string()),
        content_types: vec!["lessons".to_string()],
        topics: vec!["Aqeedah".to_string()],
        ..Default::default()
    };
    let query = service.prepare(params, 9).unwrap();
    assert!(matches!(query, SearchQuery::Browse(_)));

    service.search(&query).await.unwrap();
    let sent = &backend.requests()[0].searches[0];
    assert_eq!(sent.q, "*");
    assert_eq!(sent.filter_by, "domain_ids:=[9]");
    assert_eq!(sent.sort_by, "position:asc");
}

#[tokio::test]
async fn test_filters_are_normalized_before_sending() {
    let (backend, service) = service_with(found_only(0));
    let params = QueryParams {
        q: Some("zakat".to_string()),
        content_types: vec!["lecture".to_string()],
        scholars: vec!["Ibn Uthaymeen".to_string(), "ibn_uthaymeen".to_string()],
        media_types: vec!["AUDIO".to_string()],
        duration_min: Some(600),
        duration_max: Some(60),
        ..Default::default()
    };
    let query = service.prepare(params, 5).unwrap();
    service.search(&query).await.unwrap();

    let sent = &backend.requests()[0].searches[0];
    assert_eq!(
        sent.filter_by,
        "domain_ids:=[5] && scholar_slug:=[`ibn-uthaymeen`] && media_type:=[`audio`] && \
         duration:[60..600]"
    );
}

#[tokio::test]
async fn test_expand_search_returns_single_mixed_group() {
    let mut news = raw_hit(json!({"slug": "eid", "title": "Eid announcement"}));
    news.search_index = Some(1);
    let mut article = raw_hit(json!({"slug": "fasting", "title": "On fasting", "scholar_slug": "ibn-baz"}));
    article.search_index = Some(0);
    let response = ProviderResponse {
        result_sets: vec![ResultSet {
            found: 2,
            hits: vec![news, article],
            facet_counts: Vec::new(),
        }],
    };
    let (_, service) = service_with(response);
    let params = QueryParams {
        q: Some("ramadan".to_string()),
        content_types: vec!["articles".to_string(), "news".to_string()],
        expand_search: true,
        ..Default::default()
    };
    let query = service.prepare(params, 1).unwrap();
    let result = service.search(&query).await.unwrap();

    assert_eq!(result.groups().len(), 1);
    assert_eq!(result.groups()[0].key, MIXED_GROUP);
    let urls: Vec<_> = result
        .hits_for(MIXED_GROUP)
        .iter()
        .map(|h| h.url().unwrap())
        .collect();
    assert_eq!(urls, vec!["/news/eid", "/ibn-baz/articles/fasting"]);
}

#[tokio::test]
async fn test_unknown_content_type_is_rejected() {
    let (backend, service) = service_with(found_only(0));
    let params = QueryParams {
        content_types: vec!["podcasts".to_string()],
        ..Default::default()
    };
    let err = service.prepare(params, 1).unwrap_err();
    assert!(matches!(err, Error::InvalidContentType { .. }));
    assert!(!err.is_recoverable());
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_default_content_types_exclude_scholars() {
    let response = ProviderResponse {
        result_sets: vec![ResultSet::default(); ContentType::PUBLISHABLE.len()],
    };
    let (backend, service) = service_with(response);
    let query = service.prepare(QueryParams::default(), 1).unwrap();
    let result = service.search(&query).await.unwrap();

    assert_eq!(result.groups().len(), 7);
    assert!(result.group("scholar").is_none());
    assert!(backend.requests()[0].searches.iter().all(|s| s.per_page == 4));
}

#[tokio::test]
async fn test_outcome_serializes_for_rendering() {
    let response = ProviderResponse {
        result_sets: vec![ResultSet {
            found: 1,
            hits: vec![raw_hit(json!({"id": "7", "slug": "s", "series_title": "Usul", "title": "Lesson 1"}))],
            facet_counts: Vec::new(),
        }],
    };
    let (_, service) = service_with(response);
    let params = QueryParams {
        q: Some("usul".to_string()),
        content_types: vec!["lesson".to_string()],
        ..Default::default()
    };
    let query = service.prepare(params, 1).unwrap();
    let outcome = service.search_or_degraded(&query).await.unwrap();

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["status"], "found");
    assert_eq!(json["total_pages"], 1);
    assert_eq!(json["groups"][0]["hits"][0]["label"], "Usul");
    assert_eq!(json["groups"][0]["hits"][0]["url"], "/lessons/s");
}

#[tokio::test]
async fn test_scholar_content_type_is_rejected_before_search() {
    let (backend, service) = service_with(found_only(1));
    let params = QueryParams {
        q: Some("ibn baz".to_string()),
        content_types: vec!["scholars".to_string()],
        ..Default::default()
    };
    let err = service.prepare(params, 1).unwrap_err();
    assert!(matches!(err, Error::InvalidContentType { ref value } if value == "scholar"));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_fatwa_content_text_match_is_highlighted() {
    let mut hit = raw_hit(json!({"slug": "wudu", "title": "Wudu", "content_text": "The ruling on wudu is..."}));
    hit.highlights = vec![Highlight::new("content_text", "The ruling on <mark>wudu</mark> is...")];
    let response = ProviderResponse {
        result_sets: vec![ResultSet {
            found: 1,
            hits: vec![hit],
            facet_counts: Vec::new(),
        }],
    };
    let (backend, service) = service_with(response);
    let params = QueryParams {
        q: Some("wudu".to_string()),
        content_types: vec!["fatwas".to_string()],
        ..Default::default()
    };
    let query = service.prepare(params, 1).unwrap();
    let result = service.search(&query).await.unwrap();

    let highlighted = &backend.requests()[0].searches[0].highlight_fields;
    assert!(highlighted.iter().any(|f| f == "content_text"));
    let hit = &result.group("fatwa").unwrap().hits[0];
    assert_eq!(
        hit.highlighted_description(),
        Some("The ruling on <mark>wudu</mark> is...")
    );
}

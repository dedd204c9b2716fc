//! Integration tests for the Typesense backend over HTTP.

use std::time::Duration;

use maktaba_search::{
    ContentType, Error, ProviderRequest, QueryBuilder, SearchBackend, SearchConfig, SearchQuery,
    SearchService, TypesenseBackend, TypesenseConfig, UNAVAILABLE_NOTICE,
};
use maktaba_search::{BrowseRequest, GroupingMode, Scope, SearchRequest};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{grouped_body, union_body};

fn backend_for(server: &MockServer) -> TypesenseBackend {
    TypesenseBackend::new(TypesenseConfig {
        url: server.uri(),
        api_key: "search-only-key".to_string(),
        timeout_ms: 300,
        retry_delay_ms: 10,
        ..Default::default()
    })
    .unwrap()
}

fn books_and_lectures() -> Scope {
    Scope::new(3).with_content_types([ContentType::Book, ContentType::Lecture])
}

fn request(query: &SearchQuery) -> ProviderRequest {
    QueryBuilder::new(&SearchConfig::default()).build(query)
}

#[tokio::test]
async fn test_grouped_multi_search() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/multi_search"))
        .and(header("X-TYPESENSE-API-KEY", "search-only-key"))
        .and(body_partial_json(json!({
            "searches": [
                {"collection": "books", "q": "tawhid", "filter_by": "domain_ids:=[3]"},
                {"collection": "lectures", "q": "tawhid", "filter_by": "domain_ids:=[3]"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(grouped_body()))
        .expect(1)
        .mount(&server)
        .await;

    let query = SearchQuery::Search(SearchRequest::new(books_and_lectures(), "tawhid"));
    let response = backend_for(&server)
        .multi_search(request(&query))
        .await
        .unwrap();

    assert_eq!(response.result_sets.len(), 2);
    assert_eq!(response.result_sets[0].found, 2);
    assert_eq!(
        response.result_sets[0].hits[0].highlights[0].snippet,
        "Kitab at-<mark>Tawhid</mark>"
    );
    assert_eq!(response.result_sets[1].hits[0].document["id"], 42);
}

#[tokio::test]
async fn test_union_multi_search_sends_flag() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/multi_search"))
        .and(body_partial_json(json!({"union": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(union_body()))
        .expect(1)
        .mount(&server)
        .await;

    let scope = books_and_lectures().with_grouping(GroupingMode::Mixed);
    let query = SearchQuery::Search(SearchRequest::new(scope, "fiqh"));
    let response = backend_for(&server)
        .multi_search(request(&query))
        .await
        .unwrap();

    assert_eq!(response.result_sets.len(), 1);
    assert_eq!(response.result_sets[0].found, 4);
    assert_eq!(response.result_sets[0].hits[0].search_index, Some(1));
}

#[tokio::test]
async fn test_server_error_is_retried_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/multi_search"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/multi_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(grouped_body()))
        .expect(1)
        .mount(&server)
        .await;

    let query = SearchQuery::Browse(BrowseRequest::new(books_and_lectures()));
    let response = backend_for(&server)
        .multi_search(request(&query))
        .await
        .unwrap();
    assert_eq!(response.result_sets.len(), 2);
}

#[tokio::test]
async fn test_persistent_server_error_gives_up_after_one_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/multi_search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(2)
        .mount(&server)
        .await;

    let query = SearchQuery::Browse(BrowseRequest::new(books_and_lectures()));
    let err = backend_for(&server)
        .multi_search(request(&query))
        .await
        .unwrap_err();
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/multi_search"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Forbidden"})))
        .expect(1)
        .mount(&server)
        .await;

    let query = SearchQuery::Browse(BrowseRequest::new(books_and_lectures()));
    let err = backend_for(&server)
        .multi_search(request(&query))
        .await
        .unwrap_err();
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_rejected_request_is_invalid_parameter_not_outage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/multi_search"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Could not find a field named `pages` in the schema for sorting."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = SearchService::new(Arc::new(backend_for(&server)), SearchConfig::default());
    let query = SearchQuery::Browse(BrowseRequest::new(books_and_lectures()));

    let err = service.search_or_degraded(&query).await.unwrap_err();
    assert!(matches!(err, Error::InvalidParameter { .. }));
    assert!(err.to_string().contains("pages"));
}

#[tokio::test]
async fn test_per_set_error_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/multi_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"found": 0, "hits": []},
                {"error": "Could not find a field named `scholar_slug` in the schema.", "code": 404}
            ]
        })))
        .mount(&server)
        .await;

    let service = SearchService::new(Arc::new(backend_for(&server)), SearchConfig::default());
    let query = SearchQuery::Browse(BrowseRequest::new(books_and_lectures()));

    let err = service.search(&query).await.unwrap_err();
    assert!(err.to_string().contains("lectures"));

    let outcome = service.search_or_degraded(&query).await.unwrap();
    assert!(outcome.is_unavailable());
    assert_eq!(outcome.notice(), Some(UNAVAILABLE_NOTICE));
    assert!(outcome.result().is_empty());
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/multi_search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(grouped_body())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let query = SearchQuery::Browse(BrowseRequest::new(books_and_lectures()));
    let err = backend_for(&server)
        .multi_search(request(&query))
        .await
        .unwrap_err();
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_end_to_end_grouped_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/multi_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(grouped_body()))
        .mount(&server)
        .await;

    let service = SearchService::new(Arc::new(backend_for(&server)), SearchConfig::default());
    let query = SearchQuery::Search(SearchRequest::new(books_and_lectures(), "tawhid"));
    let result = service.search(&query).await.unwrap();

    let book = &result.hits_for(ContentType::Book)[0];
    assert_eq!(book.highlighted_title(), Some("Kitab at-<mark>Tawhid</mark>"));
    assert_eq!(book.url().unwrap(), "/ibn-baz/books/kitab-at-tawhid");

    let lecture = &result.hits_for("lectures")[0];
    assert_eq!(lecture.id().as_deref(), Some("42"));
    assert_eq!(lecture.duration(), Some(3600));

    assert_eq!(result.total_found(), 3);
    assert_eq!(result.facet("scholar_slug").len(), 2);
}

#[tokio::test]
async fn test_health() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    assert!(backend.health().await.is_ok());
    assert!(backend.is_healthy().await);
}

#[tokio::test]
async fn test_unreachable_server_is_unhealthy() {
    let server = MockServer::start().await;
    let backend = backend_for(&server);
    drop(server);
    assert!(!backend.is_healthy().await);
}

//! Tests for round-history acquisition

use super::*;
use crate::config::UpstreamConfig;
use crate::error::SicboError;
use crate::types::Category;
use axum::{http::StatusCode, routing::get, Json, Router};
use serde_json::json;

fn sample_body() -> serde_json::Value {
    json!({
        "code": 0,
        "data": {
            "resultList": [
                { "gameNum": "#0000103", "score": 15, "facesList": [4, 5, 6] },
                { "gameNum": "#0000102", "score": 3, "facesList": [1, 1, 1] },
                { "gameNum": "#0000101", "score": 9, "facesList": [2, 3, 4] }
            ]
        }
    })
}

fn parse(value: serde_json::Value) -> crate::error::Result<Vec<crate::types::HistoryEntry>> {
    let response: UpstreamResponse = serde_json::from_value(value).unwrap();
    parse_history(response)
}

#[test]
fn test_parse_reverses_to_oldest_first() {
    let history = parse(sample_body()).unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].session, "#0000101");
    assert_eq!(history[0].category, Some(Category::Small));
    assert_eq!(history[1].category, None);
    assert_eq!(history[2].session, "#0000103");
    assert_eq!(history[2].dice, [4, 5, 6]);
    assert_eq!(history[2].category, Some(Category::Big));
}

#[test]
fn test_parse_missing_faces_default_to_zero() {
    let history = parse(json!({
        "data": { "resultList": [{ "gameNum": "#1", "score": 11, "facesList": [5] }] }
    }))
    .unwrap();
    assert_eq!(history[0].dice, [5, 0, 0]);
}

#[test]
fn test_parse_missing_result_list() {
    let err = parse(json!({ "data": {} })).unwrap_err();
    assert!(matches!(err, SicboError::DataUnavailable(_)));

    let err = parse(json!({ "message": "maintenance" })).unwrap_err();
    assert!(matches!(err, SicboError::DataUnavailable(_)));
}

#[test]
fn test_parse_empty_result_list() {
    let err = parse(json!({ "data": { "resultList": [] } })).unwrap_err();
    assert!(matches!(err, SicboError::DataUnavailable(_)));
}

/// Serve `router` on an ephemeral port and return its base URL
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client_for(base_url: String) -> UpstreamClient {
    UpstreamClient::new(UpstreamConfig {
        base_url,
        timeout_secs: 5,
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_history_from_server() {
    let router = Router::new().route(
        "/v2/history/getLastResult",
        get(|| async { Json(sample_body()) }),
    );
    let client = client_for(serve(router).await);

    let history = client.fetch_history().await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history.last().unwrap().session, "#0000103");
    assert_eq!(client.name(), "upstream");
}

#[tokio::test]
async fn test_fetch_history_error_status() {
    let router = Router::new().route(
        "/v2/history/getLastResult",
        get(|| async { StatusCode::BAD_GATEWAY }),
    );
    let client = client_for(serve(router).await);

    match client.fetch_history().await.unwrap_err() {
        SicboError::DataUnavailable(msg) => {
            assert!(msg.starts_with("API error"), "{msg}");
            assert!(msg.contains("502"), "{msg}");
        }
        other => panic!("unexpected error kind: {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_history_malformed_body() {
    let router = Router::new().route(
        "/v2/history/getLastResult",
        get(|| async { "not json" }),
    );
    let client = client_for(serve(router).await);

    match client.fetch_history().await.unwrap_err() {
        SicboError::DataUnavailable(msg) => assert!(msg.starts_with("JSON error"), "{msg}"),
        other => panic!("unexpected error kind: {other:?}"),
    }
}

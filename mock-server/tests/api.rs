use std::collections::HashMap;

use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, fixture_items, router, router_under, ErrorBody, Item, MockState};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- success ---

#[tokio::test]
async fn user_items_first_page() {
    let resp = app()
        .oneshot(get("/users/yaotti/items?page=1&per_page=3"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let items: Vec<Item> = body_json(resp).await;
    assert_eq!(items, fixture_items()[..3].to_vec());
}

#[tokio::test]
async fn user_items_second_page() {
    let resp = app()
        .oneshot(get("/users/yaotti/items?page=2&per_page=3"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let items: Vec<Item> = body_json(resp).await;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, "2f5ee4a7d4e94b1a8c1e");
}

#[tokio::test]
async fn user_items_past_the_end_is_empty_array() {
    let resp = app()
        .oneshot(get("/users/yaotti/items?page=5&per_page=3"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await.as_ref(), b"[]");
}

#[tokio::test]
async fn user_without_items_is_empty_array() {
    let resp = app()
        .oneshot(get("/users/empty/items?page=1&per_page=20"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let items: Vec<Item> = body_json(resp).await;
    assert!(items.is_empty());
}

// --- errors ---

#[tokio::test]
async fn page_out_of_range_returns_400() {
    let resp = app()
        .oneshot(get("/users/yaotti/items?page=101&per_page=3"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.kind, "bad_request");
}

#[tokio::test]
async fn missing_paging_returns_400() {
    let resp = app().oneshot(get("/users/yaotti/items")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_user_returns_404() {
    let resp = app()
        .oneshot(get("/users/nonexistent/items?page=2&per_page=3"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.kind, "not_found");
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let resp = app().oneshot(get("/items")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- state ---

#[tokio::test]
async fn custom_users_are_served() {
    let mut users = HashMap::new();
    users.insert(
        "alice".to_string(),
        vec![Item {
            id: "a1".to_string(),
            title: "first".to_string(),
            likes_count: 1,
        }],
    );
    let resp = router(MockState::new(users))
        .oneshot(get("/users/alice/items?page=1&per_page=10"))
        .await
        .unwrap();

    let items: Vec<Item> = body_json(resp).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "a1");
}

#[tokio::test]
async fn requests_are_recorded() {
    let state = MockState::fixture();
    let request = Request::builder()
        .uri("/api/v2/users/yaotti/items?page=2&per_page=3")
        .header(http::header::AUTHORIZATION, "Bearer token")
        .header(http::header::USER_AGENT, "test-agent")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(String::new())
        .unwrap();

    let resp = router_under("/api/v2", state.clone())
        .oneshot(request)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let recorded = state.requests().await;
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].method, "GET");
    assert_eq!(recorded[0].path, "/api/v2/users/yaotti/items");
    assert_eq!(recorded[0].raw_query.as_deref(), Some("page=2&per_page=3"));
    assert_eq!(recorded[0].authorization.as_deref(), Some("Bearer token"));
    assert_eq!(recorded[0].user_agent.as_deref(), Some("test-agent"));
    assert_eq!(recorded[0].content_type.as_deref(), Some("application/json"));
}

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
};
use chrono::{DateTime, FixedOffset};
use serde_json::{Value, json};
use tower::ServiceExt;

use todo_api::{routes::app, state::AppState, test_helpers::sqlite_state};

async fn state() -> Arc<AppState> {
    sqlite_state().await.expect("sqlite state should build")
}

async fn json_response(state: &Arc<AppState>, request: Request<Body>) -> (StatusCode, Value) {
    let response = app(state.clone())
        .oneshot(request)
        .await
        .expect("request should succeed");
    let status = response.status();
    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let json: Value = serde_json::from_slice(&body).expect("body should be json");
    (status, json)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn timestamp(value: &Value) -> DateTime<FixedOffset> {
    let text = value.as_str().expect("timestamp should be a string");
    DateTime::parse_from_rfc3339(text).expect("timestamp should be rfc3339")
}

fn buy_milk() -> Value {
    json!({
        "content": "buy milk",
        "title": "errand",
        "description": "from store",
        "date": "2024-01-01T00:00:00Z"
    })
}

async fn create(state: &Arc<AppState>) -> Value {
    let (status, json) = json_response(state, json_request("POST", "/todos", buy_milk())).await;
    assert_eq!(status, StatusCode::CREATED);
    json["todo"].clone()
}

async fn list_len(state: &Arc<AppState>) -> usize {
    let (status, json) = json_response(state, empty_request("GET", "/todos")).await;
    assert_eq!(status, StatusCode::OK);
    json["todos"].as_array().expect("todos should be an array").len()
}

#[tokio::test]
async fn created_record_reads_back_unchanged() {
    let state = state().await;
    let created = create(&state).await;
    let id = created["_id"].as_str().expect("id should be a string");

    let (status, json) = json_response(&state, empty_request("GET", &format!("/todos/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    let fetched = &json["todo"];

    assert_eq!(fetched["_id"], created["_id"]);
    assert_eq!(fetched["content"], "buy milk");
    assert_eq!(fetched["title"], "errand");
    assert_eq!(fetched["description"], "from store");
    assert_eq!(timestamp(&fetched["date"]), timestamp(&buy_milk()["date"]));
    assert_eq!(timestamp(&fetched["createdAt"]), timestamp(&created["createdAt"]));
    assert_eq!(timestamp(&fetched["updatedAt"]), timestamp(&created["updatedAt"]));
}

#[tokio::test]
async fn rejected_create_persists_nothing() {
    let state = state().await;
    create(&state).await;

    let (status, json) = json_response(
        &state,
        json_request("POST", "/todos", json!({ "content": "no title" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().unwrap_or("").contains("title"));

    let (status, _) = json_response(
        &state,
        json_request("POST", "/todos", json!({ "date": "not a date" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(list_len(&state).await, 1);
}

#[tokio::test]
async fn back_to_back_updates_advance_updated_at() {
    let state = state().await;
    let created = create(&state).await;
    let uri = format!("/todos/{}", created["_id"].as_str().expect("id should be a string"));

    let (status, first) =
        json_response(&state, json_request("PUT", &uri, json!({ "title": "chore" }))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, second) = json_response(&state, json_request("PUT", &uri, json!({}))).await;
    assert_eq!(status, StatusCode::OK);

    let (first, second) = (&first["todo"], &second["todo"]);
    assert!(timestamp(&first["updatedAt"]) > timestamp(&created["updatedAt"]));
    assert!(timestamp(&second["updatedAt"]) > timestamp(&first["updatedAt"]));

    for todo in [first, second] {
        assert_eq!(timestamp(&todo["createdAt"]), timestamp(&created["createdAt"]));
        assert_eq!(todo["content"], "buy milk");
        assert_eq!(todo["title"], "chore");
    }
}

#[tokio::test]
async fn update_without_json_content_type_only_touches_updated_at() {
    let state = state().await;
    let created = create(&state).await;
    let uri = format!("/todos/{}", created["_id"].as_str().expect("id should be a string"));

    let request = Request::builder()
        .method("PUT")
        .uri(&uri)
        .body(Body::from("title=chore"))
        .unwrap();
    let (status, json) = json_response(&state, request).await;
    assert_eq!(status, StatusCode::OK);

    let updated = &json["todo"];
    assert_eq!(updated["title"], "errand");
    assert_eq!(updated["content"], "buy milk");
    assert!(timestamp(&updated["updatedAt"]) > timestamp(&created["updatedAt"]));
}

#[tokio::test]
async fn deleted_record_is_gone_for_every_operation() {
    let state = state().await;
    let created = create(&state).await;
    let uri = format!("/todos/{}", created["_id"].as_str().expect("id should be a string"));

    let (status, json) = json_response(&state, empty_request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "message": "Todo deleted successfully" }));

    let (status, json) = json_response(&state, empty_request("GET", &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({ "message": "Todo not found" }));

    let (status, json) = json_response(&state, empty_request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Todo not found");

    let (status, json) =
        json_response(&state, json_request("PUT", &uri, json!({ "title": "chore" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Todo not found");

    assert_eq!(list_len(&state).await, 0);
}

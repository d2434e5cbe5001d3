use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use roster::db::{self, CredentialsSource, DataSource};
use roster::router::{RosterState, roster_router};

async fn empty_app() -> Router {
    let pool = db::connect("sqlite::memory:")
        .await
        .expect("open in-memory store");
    db::init_schema(&pool).await.expect("schema init failed");
    let data = DataSource::new(pool.clone());
    let credentials = CredentialsSource::new(pool);
    roster_router(RosterState::new(data, credentials))
}

/// Router over a store holding the two canonical fixture rows.
async fn seeded_app() -> Router {
    let pool = db::connect("sqlite::memory:")
        .await
        .expect("open in-memory store");
    db::init_schema(&pool).await.expect("schema init failed");

    let data = DataSource::new(pool.clone());
    for (name, username, email) in [
        ("one", "test1", "test1@example.com"),
        ("two", "test2", "test2@example.com"),
    ] {
        data.add_data(name, username, email)
            .await
            .expect("fixture insert failed");
    }

    let credentials = CredentialsSource::new(pool);
    roster_router(RosterState::new(data, credentials))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

async fn body_json(body: Body) -> Value {
    let bytes = to_bytes(body, usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body was not JSON")
}

#[tokio::test]
async fn head_root_returns_204_with_empty_body() {
    let app = empty_app().await;
    let resp = app
        .oneshot(
            Request::builder()
                .method("HEAD")
                .uri("/")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn get_data_on_empty_store_lists_no_ids() {
    let app = empty_app().await;
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/data")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp.into_body()).await, json!({ "ids": [] }));
}

#[tokio::test]
async fn get_data_lists_ids() {
    let app = seeded_app().await;
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/data")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp.into_body()).await, json!({ "ids": [1, 2] }));
}

#[tokio::test]
async fn get_data_by_id_returns_record_without_id() {
    let app = seeded_app().await;
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/data/1")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp.into_body()).await,
        json!({ "data": { "name": "one", "username": "test1", "email": "test1@example.com" } })
    );
}

#[tokio::test]
async fn get_data_by_missing_id_is_404() {
    let app = seeded_app().await;
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/data/3")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(resp.into_body()).await,
        json!({ "error": "data not found" })
    );
}

#[tokio::test]
async fn post_data_creates_row_and_returns_new_id() {
    let app = seeded_app().await;
    let payload = json!({
        "data": { "name": "three", "username": "test3", "email": "test3@example.com" }
    });
    let resp = app
        .oneshot(json_request("POST", "/data", payload))
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(body_json(resp.into_body()).await, json!({ "id": 3 }));
}

#[tokio::test]
async fn post_data_with_null_data_is_400() {
    let app = seeded_app().await;
    let resp = app
        .oneshot(json_request("POST", "/data", json!({ "data": null })))
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(resp.into_body()).await,
        json!({ "error": "bad/no data in request" })
    );
}

#[tokio::test]
async fn post_data_with_partial_record_is_500() {
    let app = seeded_app().await;
    let resp = app
        .oneshot(json_request("POST", "/data", json!({ "data": { "name": "fail" } })))
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(resp.into_body()).await,
        json!({ "error": "data not created" })
    );
}

#[tokio::test]
async fn put_data_rewrites_row() {
    let app = seeded_app().await;
    let payload = json!({
        "data": { "name": "neo", "username": "1test", "email": "test1@example.org" }
    });
    let resp = app
        .clone()
        .oneshot(json_request("PUT", "/data/1", payload))
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    assert!(bytes.is_empty());

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/data/1")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(
        body_json(resp.into_body()).await,
        json!({ "data": { "name": "neo", "username": "1test", "email": "test1@example.org" } })
    );
}

#[tokio::test]
async fn put_data_with_null_data_is_400() {
    let app = seeded_app().await;
    let resp = app
        .oneshot(json_request("PUT", "/data/1", json!({ "data": null })))
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(resp.into_body()).await,
        json!({ "error": "bad/no data in request" })
    );
}

#[tokio::test]
async fn put_data_with_partial_record_is_500() {
    let app = seeded_app().await;
    let resp = app
        .oneshot(json_request("PUT", "/data/1", json!({ "data": { "name": "fail" } })))
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(resp.into_body()).await,
        json!({ "error": "data not updated" })
    );
}

#[tokio::test]
async fn put_data_on_missing_id_is_500() {
    let app = seeded_app().await;
    let payload = json!({
        "data": { "name": "three", "username": "test3", "email": "test3@example.com" }
    });
    let resp = app
        .oneshot(json_request("PUT", "/data/3", payload))
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(resp.into_body()).await,
        json!({ "error": "data not updated" })
    );
}

#[tokio::test]
async fn delete_data_removes_row() {
    let app = seeded_app().await;
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/data/1")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/data/1")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_data_on_missing_id_is_500() {
    let app = seeded_app().await;
    let resp = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/data/3")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(resp.into_body()).await,
        json!({ "error": "data not deleted" })
    );
}

// tests/e2e_error_statuses.rs
mod support;

use axum::body;
use blog_core::presentation::http::state::HttpSettings;
use axum::http::{Method, StatusCode};
use serde_json::json;
use std::sync::Arc;
use support::{
    FixedSuffix, TestContext, assert_error_response, create_category, create_post, get_request,
    json_request, read_json, register_user, send,
};

#[tokio::test]
async fn slug_exhaustion_surfaces_as_500_envelope() {
    let ctx = TestContext::with_suffixes(Arc::new(FixedSuffix("aaaaaa")));
    let router = ctx.router();
    let token = register_user(&router, "Alice", "alice@example.com").await;
    let category = create_category(&router, &token, "General").await;

    assert_eq!(
        create_post(&router, &token, "Same Title", category).await.status(),
        StatusCode::CREATED
    );
    assert_eq!(
        create_post(&router, &token, "Same Title", category).await.status(),
        StatusCode::CREATED
    );

    let resp = create_post(&router, &token, "Same Title", category).await;
    assert_error_response(
        resp,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to create post after multiple attempts",
    )
    .await;
    assert_eq!(ctx.posts.slugs(), ["same-title", "same-title-aaaaaa"]);
}

#[tokio::test]
async fn category_slug_exhaustion_names_the_category() {
    let ctx = TestContext::with_suffixes(Arc::new(FixedSuffix("aaaaaa")));
    let router = ctx.router();
    let token = register_user(&router, "Alice", "alice@example.com").await;

    create_category(&router, &token, "Rust").await;
    create_category(&router, &token, "Rust!").await;

    let resp = send(
        &router,
        json_request(
            Method::POST,
            "/api/categories",
            Some(&token),
            json!({ "name": "Rust?" }),
        ),
    )
    .await;
    assert_error_response(
        resp,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to create category after multiple attempts",
    )
    .await;
}

#[tokio::test]
async fn oversized_bodies_use_the_error_envelope() {
    let ctx = TestContext::new();
    let router = ctx.router_with_settings(HttpSettings {
        max_upload_bytes: 64,
        ..HttpSettings::default()
    });

    let resp = send(
        &router,
        json_request(
            Method::POST,
            "/api/auth/register",
            None,
            json!({
                "name": "x".repeat(200),
                "email": "big@example.com",
                "password": "secret123",
            }),
        ),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let json = read_json(resp).await;
    assert_eq!(json["success"], json!(false));
    assert!(json["error"].as_str().is_some_and(|msg| !msg.is_empty()));
}

#[tokio::test]
async fn persistence_failures_are_opaque_500s() {
    let ctx = TestContext::new();
    let router = ctx.router();
    let token = register_user(&router, "Alice", "alice@example.com").await;
    let category = create_category(&router, &token, "General").await;
    ctx.posts.fail_inserts();

    let resp = create_post(&router, &token, "Doomed", category).await;
    assert_error_response(resp, StatusCode::INTERNAL_SERVER_ERROR, "Server Error").await;
}

#[tokio::test]
async fn image_store_failures_are_500s() {
    let ctx = TestContext::new();
    let router = ctx.router();
    let token = register_user(&router, "Alice", "alice@example.com").await;
    let category = create_category(&router, &token, "General").await;
    ctx.images.fail_uploads();

    let category = category.to_string();
    let resp = send(
        &router,
        support::multipart_request(
            Method::POST,
            "/api/posts",
            &token,
            &[
                ("title", "Picture"),
                ("content", "Body"),
                ("category", category.as_str()),
            ],
            Some(("a.png", "image/png", b"png")),
        ),
    )
    .await;
    assert_error_response(resp, StatusCode::INTERNAL_SERVER_ERROR, "Image upload failed").await;
}

#[tokio::test]
async fn malformed_json_uses_the_error_envelope() {
    let router = support::make_test_router();
    let req = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let resp = send(&router, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = read_json(resp).await;
    assert_eq!(json["success"], json!(false));
    assert!(json["error"].as_str().is_some());
}

#[tokio::test]
async fn invalid_post_ids_are_400() {
    let router = support::make_test_router();
    let token = register_user(&router, "Alice", "alice@example.com").await;
    let resp = send(
        &router,
        json_request(Method::PUT, "/api/posts/0", Some(&token), json!({ "title": "x" })),
    )
    .await;
    assert_error_response(resp, StatusCode::BAD_REQUEST, "Invalid post id").await;
}

#[tokio::test]
async fn root_health_and_docs_are_served() {
    let router = support::make_test_router();

    let resp = send(&router, get_request("/", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), 1024).await.unwrap();
    assert_eq!(&bytes[..], b"Blog API is running");

    let resp = send(&router, get_request("/health", None)).await;
    assert_eq!(read_json(resp).await, json!({ "status": "ok" }));

    let resp = send(&router, get_request("/openapi.json", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let spec = read_json(resp).await;
    assert!(spec["paths"]["/api/posts"].is_object());
    assert!(spec["paths"]["/api/posts/{id}/comments"].is_object());
}

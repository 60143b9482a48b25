// tests/support/helpers.rs
use super::mocks::{
    DummyClock, InMemoryCategoryRepo, InMemoryPostStore, InMemoryUserRepo, RecordingImageStore,
    StrictPasswordHasher, TestTokenManager,
};
use axum::Router;
use axum::body::{self, Body};
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use blog_core::application::ports::util::SlugSuffixGenerator;
use blog_core::application::services::ApplicationServices;
use blog_core::infrastructure::util::RandomSlugSuffix;
use blog_core::presentation::http::{
    routes::build_router_with_rate_limiter,
    state::{HttpSettings, HttpState},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

const MULTIPART_BOUNDARY: &str = "----blog-core-test-boundary";

/// Application services wired to in-memory collaborators, with handles on
/// the collaborators so tests can inspect or steer them.
pub struct TestContext {
    pub users: Arc<InMemoryUserRepo>,
    pub categories: Arc<InMemoryCategoryRepo>,
    pub posts: Arc<InMemoryPostStore>,
    pub images: Arc<RecordingImageStore>,
    pub services: Arc<ApplicationServices>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_suffixes(Arc::new(RandomSlugSuffix))
    }

    pub fn with_suffixes(suffixes: Arc<dyn SlugSuffixGenerator>) -> Self {
        let users = Arc::new(InMemoryUserRepo::default());
        let categories = Arc::new(InMemoryCategoryRepo::default());
        let posts = Arc::new(InMemoryPostStore::new(
            Arc::clone(&users),
            Arc::clone(&categories),
        ));
        let images = Arc::new(RecordingImageStore::default());

        let services = Arc::new(ApplicationServices::new(
            users.clone(),
            posts.clone(),
            posts.clone(),
            posts.clone(),
            categories.clone(),
            images.clone(),
            Arc::new(StrictPasswordHasher),
            Arc::new(TestTokenManager),
            Arc::new(DummyClock),
            suffixes,
        ));

        Self {
            users,
            categories,
            posts,
            images,
            services,
        }
    }

    pub fn state(&self) -> HttpState {
        HttpState {
            services: Arc::clone(&self.services),
            settings: HttpSettings::default(),
        }
    }

    pub fn router(&self) -> Router {
        build_router_with_rate_limiter(self.state(), false)
    }

    pub fn router_with_settings(&self, settings: HttpSettings) -> Router {
        let state = HttpState {
            services: Arc::clone(&self.services),
            settings,
        };
        build_router_with_rate_limiter(state, false)
    }
}

pub fn make_test_router() -> Router {
    TestContext::new().router()
}

pub async fn send(router: &Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.expect("router call")
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request")
}

pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).expect("json body")))
        .expect("request")
}

/// An image part for [`multipart_request`]: file name, content type, bytes.
pub type ImagePart<'a> = (&'a str, &'a str, &'a [u8]);

pub fn multipart_request(
    method: Method,
    uri: &str,
    token: &str,
    fields: &[(&str, &str)],
    image: Option<ImagePart<'_>>,
) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, content_type, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .expect("request")
}

pub async fn read_json(resp: Response) -> Value {
    let bytes = body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Assert the `{ "success": false, "error": ... }` envelope and its status.
pub async fn assert_error_response(resp: Response, expected_status: StatusCode, expected_error: &str) {
    assert_eq!(resp.status(), expected_status);
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    assert!(
        content_type.starts_with("application/json"),
        "unexpected content-type: {content_type}"
    );
    let json = read_json(resp).await;
    assert_eq!(json["success"], json!(false));
    assert_eq!(json["error"], json!(expected_error), "unexpected body: {json}");
}

/// Register an account through the API and return its bearer token.
pub async fn register_user(router: &Router, name: &str, email: &str) -> String {
    let resp = send(
        router,
        json_request(
            Method::POST,
            "/api/auth/register",
            None,
            json!({ "name": name, "email": email, "password": "secret123" }),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let json = read_json(resp).await;
    json["data"]["token"]
        .as_str()
        .expect("token in register response")
        .to_string()
}

pub async fn create_category(router: &Router, token: &str, name: &str) -> i64 {
    let resp = send(
        router,
        json_request(
            Method::POST,
            "/api/categories",
            Some(token),
            json!({ "name": name }),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    read_json(resp).await["data"]["id"]
        .as_i64()
        .expect("category id")
}

/// Create a post with a JSON body and return the response.
pub async fn create_post(router: &Router, token: &str, title: &str, category: i64) -> Response {
    send(
        router,
        json_request(
            Method::POST,
            "/api/posts",
            Some(token),
            json!({ "title": title, "content": "Body text", "category": category }),
        ),
    )
    .await
}

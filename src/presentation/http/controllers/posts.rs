// src/presentation/http/controllers/posts.rs
use crate::application::{
    commands::posts::{AddCommentCommand, CreatePostCommand, DeletePostCommand, UpdatePostCommand},
    dto::PostDto,
    queries::posts::ListPostsQuery,
};
use crate::presentation::http::error::{ErrorResponse, HttpError, HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::forms::{JsonBody, PostPayload, PostRequest};
use crate::presentation::http::openapi::{
    CommentCreatedResponse, EmptyResponse, PostListResponse, PostResponse,
};
use crate::presentation::http::response::ApiResponse;
use crate::presentation::http::state::HttpState;
use axum::{
    Extension,
    extract::{Path, Query},
    http::StatusCode,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Lenient page number parsing: anything that is not a positive integer falls
/// back to the default.
fn parse_number(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
}

fn parse_post_id(raw: &str) -> HttpResult<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| HttpError::new(StatusCode::BAD_REQUEST, "Invalid post id"))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PostListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PostSearchParams {
    pub q: Option<String>,
    /// Accepted as an alias of `q`.
    pub search: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CommentRequest {
    #[serde(default)]
    pub content: String,
}

#[utoipa::path(
    get,
    path = "/api/posts",
    params(PostListParams),
    responses(
        (status = 200, description = "Newest posts first.", body = PostListResponse)
    ),
    tag = "Posts"
)]
pub async fn list_posts(
    Extension(state): Extension<HttpState>,
    Query(params): Query<PostListParams>,
) -> HttpResult<ApiResponse<Vec<PostDto>>> {
    let query = ListPostsQuery {
        page: parse_number(params.page.as_deref()),
        limit: parse_number(params.limit.as_deref()),
        search: params.search,
    };

    state
        .services
        .post_queries
        .list_posts(query)
        .await
        .into_http()
        .map(ApiResponse::paged)
}

#[utoipa::path(
    get,
    path = "/api/posts/search",
    params(PostSearchParams),
    responses(
        (status = 200, description = "Posts whose title or content match.", body = PostListResponse),
        (status = 400, description = "Missing search term.", body = ErrorResponse)
    ),
    tag = "Posts"
)]
pub async fn search_posts(
    Extension(state): Extension<HttpState>,
    Query(params): Query<PostSearchParams>,
) -> HttpResult<ApiResponse<Vec<PostDto>>> {
    let query = ListPostsQuery {
        page: parse_number(params.page.as_deref()),
        limit: parse_number(params.limit.as_deref()),
        search: params.q.or(params.search),
    };

    state
        .services
        .post_queries
        .search_posts(query)
        .await
        .into_http()
        .map(ApiResponse::paged)
}

#[utoipa::path(
    get,
    path = "/api/posts/mine",
    params(PostListParams),
    responses(
        (status = 200, description = "Posts written by the caller.", body = PostListResponse),
        (status = 401, description = "Missing or invalid token.", body = ErrorResponse)
    ),
    tag = "Posts"
)]
pub async fn list_my_posts(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Query(params): Query<PostListParams>,
) -> HttpResult<ApiResponse<Vec<PostDto>>> {
    state
        .services
        .post_queries
        .list_my_posts(
            &user,
            parse_number(params.page.as_deref()),
            parse_number(params.limit.as_deref()),
        )
        .await
        .into_http()
        .map(ApiResponse::paged)
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    params(("id" = String, Path, description = "Numeric post id or slug")),
    responses(
        (status = 200, description = "Post with its comments.", body = PostResponse),
        (status = 404, description = "Unknown post.", body = ErrorResponse)
    ),
    tag = "Posts"
)]
pub async fn get_post(
    Extension(state): Extension<HttpState>,
    Path(id_or_slug): Path<String>,
) -> HttpResult<ApiResponse<PostDto>> {
    state
        .services
        .post_queries
        .get_post(&id_or_slug)
        .await
        .into_http()
        .map(ApiResponse::ok)
}

#[utoipa::path(
    post,
    path = "/api/posts",
    request_body(
        content = PostRequest,
        description = "JSON, or multipart/form-data with an optional `image` file part"
    ),
    responses(
        (status = 201, description = "Post created under a unique slug.", body = PostResponse),
        (status = 400, description = "Validation failed.", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token.", body = ErrorResponse),
        (status = 500, description = "No free slug could be allocated.", body = ErrorResponse)
    ),
    tag = "Posts"
)]
pub async fn create_post(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    payload: PostPayload,
) -> HttpResult<ApiResponse<PostDto>> {
    let command = CreatePostCommand {
        title: payload.title.unwrap_or_default(),
        content: payload.content.unwrap_or_default(),
        excerpt: payload.excerpt,
        category: payload.category.unwrap_or_default(),
        image: payload.image,
    };

    state
        .services
        .post_commands
        .create_post(&user, command)
        .await
        .into_http()
        .map(ApiResponse::created)
}

#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    params(("id" = i64, Path, description = "Post id")),
    request_body(
        content = PostRequest,
        description = "JSON, or multipart/form-data with an optional `image` file part"
    ),
    responses(
        (status = 200, description = "Updated post; the slug never changes.", body = PostResponse),
        (status = 403, description = "Caller is neither author nor admin.", body = ErrorResponse),
        (status = 404, description = "Unknown post.", body = ErrorResponse)
    ),
    tag = "Posts"
)]
pub async fn update_post(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<String>,
    payload: PostPayload,
) -> HttpResult<ApiResponse<PostDto>> {
    let command = UpdatePostCommand {
        id: parse_post_id(&id)?,
        title: payload.title,
        content: payload.content,
        excerpt: payload.excerpt,
        category: payload.category,
        image: payload.image,
    };

    state
        .services
        .post_commands
        .update_post(&user, command)
        .await
        .into_http()
        .map(ApiResponse::ok)
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post deleted.", body = EmptyResponse),
        (status = 403, description = "Caller is neither author nor admin.", body = ErrorResponse),
        (status = 404, description = "Unknown post.", body = ErrorResponse)
    ),
    tag = "Posts"
)]
pub async fn delete_post(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<String>,
) -> HttpResult<ApiResponse<serde_json::Value>> {
    let id = parse_post_id(&id)?;
    state
        .services
        .post_commands
        .delete_post(&user, DeletePostCommand { id })
        .await
        .into_http()?;

    Ok(ApiResponse::ok(serde_json::json!({})))
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/comments",
    params(("id" = i64, Path, description = "Post id")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment added; returns the post.", body = CommentCreatedResponse),
        (status = 400, description = "Empty comment.", body = ErrorResponse),
        (status = 404, description = "Unknown post.", body = ErrorResponse)
    ),
    tag = "Posts"
)]
pub async fn add_comment(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<CommentRequest>,
) -> HttpResult<ApiResponse<PostDto>> {
    let command = AddCommentCommand {
        post_id: parse_post_id(&id)?,
        content: payload.content,
    };

    let post = state
        .services
        .post_commands
        .add_comment(&user, command)
        .await
        .into_http()?;

    let slug = post.slug.clone();
    Ok(ApiResponse::created(post).with_created_slug(slug))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_numbers_are_parsed_leniently() {
        assert_eq!(parse_number(Some("3")), Some(3));
        assert_eq!(parse_number(Some("abc")), None);
        assert_eq!(parse_number(None), None);
    }

    #[test]
    fn post_ids_must_be_positive_integers() {
        assert_eq!(parse_post_id("12").unwrap(), 12);
        assert_eq!(parse_post_id("0").unwrap_err().status(), StatusCode::BAD_REQUEST);
        assert_eq!(parse_post_id("my-slug").unwrap_err().message(), "Invalid post id");
    }
}

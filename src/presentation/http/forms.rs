// src/presentation/http/forms.rs
use crate::application::ports::storage::ImageUpload;
use axum::{
    Json,
    extract::{FromRequest, Multipart, Request, multipart::MultipartError},
    http::{StatusCode, header::CONTENT_TYPE},
};
use serde::Deserialize;
use utoipa::ToSchema;

use super::error::HttpError;

/// Category reference as sent by clients: either a number or its text form.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum CategoryField {
    Id(i64),
    Text(String),
}

impl CategoryField {
    fn into_text(self) -> String {
        match self {
            Self::Id(id) => id.to_string(),
            Self::Text(text) => text,
        }
    }
}

/// JSON body accepted by the create and update post endpoints.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<CategoryField>,
}

/// Post fields read from either a JSON body or a `multipart/form-data` body
/// whose optional `image` part carries the featured image.
#[derive(Debug, Default)]
pub struct PostPayload {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub image: Option<ImageUpload>,
}

impl From<PostRequest> for PostPayload {
    fn from(body: PostRequest) -> Self {
        Self {
            title: body.title,
            content: body.content,
            excerpt: body.excerpt,
            category: body.category.map(CategoryField::into_text),
            image: None,
        }
    }
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"))
}

fn multipart_error(err: MultipartError) -> HttpError {
    HttpError::new(err.status(), err.body_text())
}

async fn read_multipart(mut multipart: Multipart) -> Result<PostPayload, HttpError> {
    let mut payload = PostPayload::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let file_name = field.file_name().map(str::to_owned);
                let content_type = field.content_type().map(str::to_owned);
                let data = field.bytes().await.map_err(multipart_error)?;
                // browsers send an empty part when no file was chosen
                if !data.is_empty() {
                    payload.image = Some(ImageUpload {
                        file_name,
                        content_type,
                        data,
                    });
                }
            }
            "title" => payload.title = Some(field.text().await.map_err(multipart_error)?),
            "content" => payload.content = Some(field.text().await.map_err(multipart_error)?),
            "excerpt" => payload.excerpt = Some(field.text().await.map_err(multipart_error)?),
            "category" => payload.category = Some(field.text().await.map_err(multipart_error)?),
            other => tracing::debug!(field = other, "ignoring unknown form field"),
        }
    }

    Ok(payload)
}

impl<S> FromRequest<S> for PostPayload
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_multipart(&req) {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|rejection| HttpError::new(rejection.status(), rejection.body_text()))?;
            return read_multipart(multipart).await;
        }

        if !req.headers().contains_key(CONTENT_TYPE) {
            return Err(HttpError::new(
                StatusCode::BAD_REQUEST,
                "Expected a JSON or multipart/form-data body",
            ));
        }

        let JsonBody(body) = JsonBody::<PostRequest>::from_request(req, state).await?;
        Ok(body.into())
    }
}

/// `Json<T>` whose rejections use the error envelope.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: serde::de::DeserializeOwned,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| HttpError::new(rejection.status(), rejection.body_text()))?;
        Ok(Self(value))
    }
}

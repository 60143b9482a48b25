use crate::domain::errors::DomainResult;
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::post::comment::{Comment, NewComment};
use crate::domain::post::entity::{NewPost, Post, PostUpdate};
use crate::domain::post::value_objects::PostId;
use crate::domain::slug::Slug;
use crate::domain::user::UserId;
use async_trait::async_trait;

/// Narrowing applied to a post listing.
#[derive(Debug, Clone, Default)]
pub struct PostListFilter {
    /// Case-insensitive substring matched against title and content.
    pub search: Option<String>,
    pub author: Option<UserId>,
}

#[async_trait]
pub trait PostWriteRepository: Send + Sync {
    /// Persist a new post. A slug collision must surface as
    /// `DomainError::DuplicateKey { field: "slug" }` and leave nothing behind.
    async fn insert(&self, post: NewPost) -> DomainResult<Post>;
    async fn update(&self, update: PostUpdate) -> DomainResult<Post>;
    async fn delete(&self, id: PostId) -> DomainResult<()>;
}

#[async_trait]
pub trait PostReadRepository: Send + Sync {
    async fn find_by_id(&self, id: PostId) -> DomainResult<Option<Post>>;
    async fn find_by_slug(&self, slug: &Slug) -> DomainResult<Option<Post>>;
    /// Newest first.
    async fn list_page(&self, filter: PostListFilter, page: PageRequest)
    -> DomainResult<Page<Post>>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn add(&self, comment: NewComment) -> DomainResult<Comment>;
    /// Oldest first.
    async fn list_for_post(&self, post_id: PostId) -> DomainResult<Vec<Comment>>;
}

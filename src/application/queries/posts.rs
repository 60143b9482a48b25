// src/application/queries/posts.rs
use crate::{
    application::{
        dto::{AuthenticatedUser, PagedDto, PostDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        pagination::PageRequest,
        post::{CommentRepository, Post, PostId, PostListFilter, PostReadRepository},
        slug::Slug,
    },
};
use std::sync::Arc;

pub struct PostQueryService {
    read_repo: Arc<dyn PostReadRepository>,
    comment_repo: Arc<dyn CommentRepository>,
}

#[derive(Debug, Clone, Default)]
pub struct ListPostsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
}

impl PostQueryService {
    pub fn new(
        read_repo: Arc<dyn PostReadRepository>,
        comment_repo: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            read_repo,
            comment_repo,
        }
    }

    pub async fn list_posts(&self, query: ListPostsQuery) -> ApplicationResult<PagedDto<PostDto>> {
        let filter = PostListFilter {
            search: normalize_search(query.search),
            author: None,
        };
        self.page(filter, PageRequest::new(query.page, query.limit))
            .await
    }

    /// Like [`Self::list_posts`] but the search term is mandatory.
    pub async fn search_posts(
        &self,
        query: ListPostsQuery,
    ) -> ApplicationResult<PagedDto<PostDto>> {
        let search = normalize_search(query.search)
            .ok_or_else(|| ApplicationError::validation("Search query is required"))?;
        let filter = PostListFilter {
            search: Some(search),
            author: None,
        };
        self.page(filter, PageRequest::new(query.page, query.limit))
            .await
    }

    pub async fn list_my_posts(
        &self,
        actor: &AuthenticatedUser,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> ApplicationResult<PagedDto<PostDto>> {
        let filter = PostListFilter {
            search: None,
            author: Some(actor.id),
        };
        self.page(filter, PageRequest::new(page, limit)).await
    }

    /// Resolve a post by slug first and by numeric id otherwise, so a post
    /// whose slug is all digits stays reachable. The result carries the
    /// post's comments.
    pub async fn get_post(&self, id_or_slug: &str) -> ApplicationResult<PostDto> {
        let post = self
            .find_post(id_or_slug)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Post not found"))?;
        let comments = self.comment_repo.list_for_post(post.id).await?;
        Ok(PostDto::from(post).with_comments(comments))
    }

    async fn find_post(&self, id_or_slug: &str) -> ApplicationResult<Option<Post>> {
        let key = id_or_slug.trim();
        if let Ok(slug) = Slug::new(key) {
            if let Some(post) = self.read_repo.find_by_slug(&slug).await? {
                return Ok(Some(post));
            }
        }
        let Some(id) = key.parse::<i64>().ok().and_then(|id| PostId::new(id).ok()) else {
            return Ok(None);
        };
        Ok(self.read_repo.find_by_id(id).await?)
    }

    async fn page(
        &self,
        filter: PostListFilter,
        request: PageRequest,
    ) -> ApplicationResult<PagedDto<PostDto>> {
        let page = self.read_repo.list_page(filter, request).await?;
        Ok(page.into())
    }
}

fn normalize_search(search: Option<String>) -> Option<String> {
    search
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

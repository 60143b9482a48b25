// src/domain/post/entity.rs
use crate::domain::category::CategoryId;
use crate::domain::post::value_objects::{
    FeaturedImage, PostContent, PostExcerpt, PostId, PostTitle,
};
use crate::domain::slug::{Slug, SlugTarget};
use crate::domain::user::UserId;
use chrono::{DateTime, Utc};

/// Category fields embedded in a post read model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRef {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

/// Author fields embedded in post and comment read models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRef {
    pub id: UserId,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Post {
    pub id: PostId,
    pub title: PostTitle,
    pub slug: Slug,
    pub content: PostContent,
    pub excerpt: Option<PostExcerpt>,
    pub featured_image: Option<FeaturedImage>,
    pub category: CategoryRef,
    pub author: AuthorRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.author.id == user_id
    }

    pub fn set_content(
        &mut self,
        title: PostTitle,
        content: PostContent,
        excerpt: Option<PostExcerpt>,
        now: DateTime<Utc>,
    ) {
        self.title = title;
        self.content = content;
        self.excerpt = excerpt;
        self.updated_at = now;
    }

    /// Swap the featured image, handing back the one it replaced.
    pub fn replace_image(
        &mut self,
        image: FeaturedImage,
        now: DateTime<Utc>,
    ) -> Option<FeaturedImage> {
        self.updated_at = now;
        self.featured_image.replace(image)
    }
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: PostTitle,
    pub slug: Option<Slug>,
    pub content: PostContent,
    pub excerpt: Option<PostExcerpt>,
    pub featured_image: Option<FeaturedImage>,
    pub category_id: CategoryId,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SlugTarget for NewPost {
    fn assign_slug(&mut self, slug: Slug) {
        self.slug = Some(slug);
    }
}

/// Partial update of an existing post. There is deliberately no slug field:
/// once committed a slug never changes.
#[derive(Debug, Clone)]
pub struct PostUpdate {
    pub id: PostId,
    pub title: Option<PostTitle>,
    pub content: Option<PostContent>,
    pub excerpt: Option<Option<PostExcerpt>>,
    pub category_id: Option<CategoryId>,
    pub featured_image: Option<FeaturedImage>,
    pub updated_at: DateTime<Utc>,
}

impl PostUpdate {
    pub fn new(id: PostId, updated_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: None,
            content: None,
            excerpt: None,
            category_id: None,
            featured_image: None,
            updated_at,
        }
    }

    pub fn with_title(mut self, title: PostTitle) -> Self {
        self.title = Some(title);
        self
    }

    pub fn with_content(mut self, content: PostContent) -> Self {
        self.content = Some(content);
        self
    }

    pub fn with_excerpt(mut self, excerpt: Option<PostExcerpt>) -> Self {
        self.excerpt = Some(excerpt);
        self
    }

    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_featured_image(mut self, image: FeaturedImage) -> Self {
        self.featured_image = Some(image);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.excerpt.is_none()
            && self.category_id.is_none()
            && self.featured_image.is_none()
    }
}

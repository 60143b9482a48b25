// src/infrastructure/repositories/postgres_post.rs
use super::{error::like_pattern, map_sqlx};
use crate::domain::category::CategoryId;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::post::{
    AuthorRef, CategoryRef, FeaturedImage, NewPost, Post, PostContent, PostExcerpt, PostId,
    PostListFilter, PostReadRepository, PostTitle, PostUpdate, PostWriteRepository,
};
use crate::domain::slug::Slug;
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

const POST_COLUMNS: &str = "p.id, p.title, p.slug, p.content, p.excerpt, \
     p.featured_image_url, p.featured_image_public_id, \
     p.category_id, c.name AS category_name, c.slug AS category_slug, \
     p.author_id, u.name AS author_name, p.created_at, p.updated_at";

/// Select list plus joins for posts read from `source`, which is either the
/// table itself or a CTE over it.
fn post_select(source: &str) -> String {
    format!(
        "SELECT {POST_COLUMNS} FROM {source} p \
         JOIN categories c ON c.id = p.category_id \
         JOIN users u ON u.id = p.author_id"
    )
}

#[derive(Clone)]
pub struct PostgresPostWriteRepository {
    pool: PgPool,
}

impl PostgresPostWriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Clone)]
pub struct PostgresPostReadRepository {
    pool: PgPool,
}

impl PostgresPostReadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PostRow {
    id: i64,
    title: String,
    slug: String,
    content: String,
    excerpt: Option<String>,
    featured_image_url: Option<String>,
    featured_image_public_id: Option<String>,
    category_id: i64,
    category_name: String,
    category_slug: String,
    author_id: i64,
    author_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PostRow> for Post {
    type Error = DomainError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        let featured_image = row.featured_image_url.map(|url| FeaturedImage {
            url,
            public_id: row.featured_image_public_id,
        });

        Ok(Post {
            id: PostId::new(row.id)?,
            title: PostTitle::new(row.title)?,
            slug: Slug::new(row.slug)?,
            content: PostContent::new(row.content)?,
            excerpt: row.excerpt.map(PostExcerpt::new).transpose()?,
            featured_image,
            category: CategoryRef {
                id: CategoryId::new(row.category_id)?,
                name: row.category_name,
                slug: row.category_slug,
            },
            author: AuthorRef {
                id: UserId::new(row.author_id)?,
                name: row.author_name,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl PostWriteRepository for PostgresPostWriteRepository {
    async fn insert(&self, post: NewPost) -> DomainResult<Post> {
        let NewPost {
            title,
            slug,
            content,
            excerpt,
            featured_image,
            category_id,
            author_id,
            created_at,
            updated_at,
        } = post;
        let slug = slug.ok_or_else(|| DomainError::Validation("slug must be assigned".into()))?;
        let (image_url, image_public_id) = match featured_image {
            Some(image) => (Some(image.url), image.public_id),
            None => (None, None),
        };

        let sql = format!(
            "WITH inserted AS (
                INSERT INTO posts (title, slug, content, excerpt, featured_image_url,
                    featured_image_public_id, category_id, author_id, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING *
             ) {}",
            post_select("inserted")
        );

        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(title.as_str())
            .bind(slug.as_str())
            .bind(content.as_str())
            .bind(excerpt.as_ref().map(PostExcerpt::as_str))
            .bind(image_url)
            .bind(image_public_id)
            .bind(i64::from(category_id))
            .bind(i64::from(author_id))
            .bind(created_at)
            .bind(updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Post::try_from(row)
    }

    async fn update(&self, update: PostUpdate) -> DomainResult<Post> {
        let PostUpdate {
            id,
            title,
            content,
            excerpt,
            category_id,
            featured_image,
            updated_at,
        } = update;

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("WITH updated AS (UPDATE posts SET updated_at = ");
        builder.push_bind(updated_at);

        if let Some(title) = title {
            builder.push(", title = ");
            builder.push_bind(title.into_inner());
        }

        if let Some(content) = content {
            builder.push(", content = ");
            builder.push_bind(content.into_inner());
        }

        if let Some(excerpt) = excerpt {
            builder.push(", excerpt = ");
            builder.push_bind(excerpt.map(PostExcerpt::into_inner));
        }

        if let Some(category_id) = category_id {
            builder.push(", category_id = ");
            builder.push_bind(i64::from(category_id));
        }

        if let Some(image) = featured_image {
            builder.push(", featured_image_url = ");
            builder.push_bind(image.url);
            builder.push(", featured_image_public_id = ");
            builder.push_bind(image.public_id);
        }

        builder.push(" WHERE id = ");
        builder.push_bind(i64::from(id));
        builder.push(" RETURNING *) ");
        builder.push(post_select("updated"));

        let row = builder
            .build_query_as::<PostRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .ok_or_else(|| DomainError::NotFound("Post not found".into()))?;

        Post::try_from(row)
    }

    async fn delete(&self, id: PostId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(i64::from(id))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("Post not found".into()));
        }
        Ok(())
    }
}

impl PostgresPostReadRepository {
    fn apply_filter<'a>(builder: &mut QueryBuilder<'a, Postgres>, filter: &'a PostListFilter) {
        let mut has_where = false;

        if let Some(author) = filter.author {
            builder.push(" WHERE p.author_id = ");
            builder.push_bind(i64::from(author));
            has_where = true;
        }

        if let Some(term) = filter.search.as_deref() {
            builder.push(if has_where { " AND " } else { " WHERE " });
            let pattern = like_pattern(term);
            builder.push("(p.title ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR p.content ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }
    }
}

#[async_trait]
impl PostReadRepository for PostgresPostReadRepository {
    async fn find_by_id(&self, id: PostId) -> DomainResult<Option<Post>> {
        let sql = format!("{} WHERE p.id = $1", post_select("posts"));
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(i64::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        row.map(Post::try_from).transpose()
    }

    async fn find_by_slug(&self, slug: &Slug) -> DomainResult<Option<Post>> {
        let sql = format!("{} WHERE p.slug = $1", post_select("posts"));
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(slug.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        row.map(Post::try_from).transpose()
    }

    async fn list_page(
        &self,
        filter: PostListFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Post>> {
        let mut count_builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(1) FROM posts p");
        Self::apply_filter(&mut count_builder, &filter);
        let total = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(post_select("posts"));
        Self::apply_filter(&mut builder, &filter);
        builder.push(" ORDER BY p.created_at DESC, p.id DESC LIMIT ");
        builder.push_bind(i64::from(page.limit()));
        builder.push(" OFFSET ");
        builder.push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));

        let rows = builder
            .build_query_as::<PostRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let items = rows
            .into_iter()
            .map(Post::try_from)
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(Page::new(items, total.max(0) as u64, page))
    }
}

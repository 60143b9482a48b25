use super::map_sqlx;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::post::{
    AuthorRef, Comment, CommentBody, CommentId, CommentRepository, NewComment, PostId,
};
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

const COMMENT_COLUMNS: &str =
    "cm.id, cm.post_id, cm.author_id, u.name AS author_name, cm.body, cm.created_at";

#[derive(Clone)]
pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CommentRow {
    id: i64,
    post_id: i64,
    author_id: Option<i64>,
    author_name: Option<String>,
    body: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CommentRow> for Comment {
    type Error = DomainError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        // authors may have been deleted since, leaving the comment anonymous
        let author = match (row.author_id, row.author_name) {
            (Some(id), Some(name)) => Some(AuthorRef {
                id: UserId::new(id)?,
                name,
            }),
            _ => None,
        };

        Ok(Comment {
            id: CommentId(row.id),
            post_id: PostId::new(row.post_id)?,
            author,
            body: CommentBody::new(row.body)?,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn add(&self, comment: NewComment) -> DomainResult<Comment> {
        let NewComment {
            post_id,
            author_id,
            body,
            created_at,
        } = comment;

        let sql = format!(
            "WITH inserted AS (
                INSERT INTO comments (post_id, author_id, body, created_at)
                VALUES ($1, $2, $3, $4)
                RETURNING *
             )
             SELECT {COMMENT_COLUMNS} FROM inserted cm
             LEFT JOIN users u ON u.id = cm.author_id"
        );

        let row = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(i64::from(post_id))
            .bind(author_id.map(i64::from))
            .bind(body.as_str())
            .bind(created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Comment::try_from(row)
    }

    async fn list_for_post(&self, post_id: PostId) -> DomainResult<Vec<Comment>> {
        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments cm
             LEFT JOIN users u ON u.id = cm.author_id
             WHERE cm.post_id = $1
             ORDER BY cm.created_at ASC, cm.id ASC"
        );

        let rows = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(i64::from(post_id))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        rows.into_iter().map(Comment::try_from).collect()
    }
}

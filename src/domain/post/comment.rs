use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::post::entity::AuthorRef;
use crate::domain::post::value_objects::PostId;
use crate::domain::user::UserId;
use chrono::{DateTime, Utc};

const COMMENT_MAX_CHARS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommentId(pub i64);

impl From<CommentId> for i64 {
    fn from(value: CommentId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBody(String);

impl CommentBody {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::Validation("Comment content is required".into()));
        }
        if value.chars().count() > COMMENT_MAX_CHARS {
            return Err(DomainError::Validation(
                "Comment cannot be more than 1000 characters".into(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author: Option<AuthorRef>,
    pub body: CommentBody,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: PostId,
    pub author_id: Option<UserId>,
    pub body: CommentBody,
    pub created_at: DateTime<Utc>,
}

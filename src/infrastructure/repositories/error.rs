use crate::domain::errors::DomainError;

const CNT_POST_SLUG: &str = "posts_slug_key";
const CNT_POST_CATEGORY: &str = "posts_category_id_fkey";
const CNT_POST_AUTHOR: &str = "posts_author_id_fkey";
const CNT_CATEGORY_SLUG: &str = "categories_slug_key";
const CNT_CATEGORY_NAME: &str = "categories_name_key";
const CNT_USER_EMAIL: &str = "users_email_key";
const CNT_COMMENT_POST: &str = "comments_post_id_fkey";

/// Translate a sqlx failure into a domain error. Unique violations are
/// reported structurally so that callers can tell which field collided.
pub fn map_sqlx(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(constraint) = db_err.constraint() {
                return match constraint {
                    CNT_POST_SLUG | CNT_CATEGORY_SLUG => DomainError::duplicate_key("slug"),
                    CNT_CATEGORY_NAME => DomainError::duplicate_key("name"),
                    CNT_USER_EMAIL => DomainError::duplicate_key("email"),
                    CNT_POST_CATEGORY => DomainError::Validation("Category not found".into()),
                    CNT_POST_AUTHOR => DomainError::NotFound("author not found".into()),
                    CNT_COMMENT_POST => DomainError::NotFound("Post not found".into()),
                    other => {
                        DomainError::Persistence(format!("database constraint violation: {other}"))
                    }
                };
            }

            if let Some(code) = db_err.code() {
                match code.as_ref() {
                    "23505" => {
                        return DomainError::Conflict("unique constraint violated".into());
                    }
                    "23503" => {
                        return DomainError::NotFound("referenced record not found".into());
                    }
                    "23514" => {
                        return DomainError::Validation("check constraint violated".into());
                    }
                    _ => {}
                }
            }

            DomainError::Persistence(db_err.message().to_string())
        }
        _ => DomainError::Persistence(err.to_string()),
    }
}

/// Escape LIKE metacharacters so user input is matched literally.
pub(super) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

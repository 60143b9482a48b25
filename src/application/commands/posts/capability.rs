// src/application/commands/posts/capability.rs
use crate::application::{
    dto::AuthenticatedUser,
    error::{ApplicationError, ApplicationResult},
};
use crate::domain::category::CategoryId;

pub(super) fn ensure_capability(
    actor: &AuthenticatedUser,
    resource: &str,
    action: &str,
) -> ApplicationResult<()> {
    if actor.has_capability(resource, action) {
        Ok(())
    } else {
        Err(ApplicationError::forbidden(format!(
            "missing capability {resource}:{action}"
        )))
    }
}

/// Category references arrive as form text, so they are parsed here rather
/// than by the transport layer.
pub(super) fn parse_category_id(raw: &str) -> ApplicationResult<CategoryId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApplicationError::validation("Category is required"));
    }
    trimmed
        .parse::<i64>()
        .ok()
        .and_then(|id| CategoryId::new(id).ok())
        .ok_or_else(|| ApplicationError::validation("Invalid category id"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_ids_are_parsed_from_text() {
        assert_eq!(i64::from(parse_category_id(" 12 ").unwrap()), 12);
        assert!(matches!(
            parse_category_id(""),
            Err(ApplicationError::Validation(msg)) if msg == "Category is required"
        ));
        assert!(matches!(
            parse_category_id("abc"),
            Err(ApplicationError::Validation(msg)) if msg == "Invalid category id"
        ));
        assert!(parse_category_id("-4").is_err());
    }
}

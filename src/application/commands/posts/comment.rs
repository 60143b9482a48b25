use super::{PostCommandService, capability::ensure_capability};
use crate::{
    application::{
        dto::{AuthenticatedUser, PostDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::post::{CommentBody, NewComment, PostId},
};

pub struct AddCommentCommand {
    pub post_id: i64,
    pub content: String,
}

impl PostCommandService {
    /// Append a comment and return the post with its full comment thread.
    pub async fn add_comment(
        &self,
        actor: &AuthenticatedUser,
        command: AddCommentCommand,
    ) -> ApplicationResult<PostDto> {
        ensure_capability(actor, "comments", "create")?;

        let body = CommentBody::new(command.content)?;
        let post_id = PostId::new(command.post_id)
            .map_err(|_| ApplicationError::validation("Invalid post id"))?;
        let post = self
            .read_repo
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Post not found"))?;

        self.comment_repo
            .add(NewComment {
                post_id,
                author_id: Some(actor.id),
                body,
                created_at: self.clock.now(),
            })
            .await?;

        let comments = self.comment_repo.list_for_post(post_id).await?;
        Ok(PostDto::from(post).with_comments(comments))
    }
}

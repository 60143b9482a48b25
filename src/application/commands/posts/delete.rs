use super::PostCommandService;
use crate::{
    application::{
        dto::AuthenticatedUser,
        error::{ApplicationError, ApplicationResult},
    },
    domain::post::{
        PostId,
        specifications::{CanDeletePostSpec, PostSpecification},
    },
};

pub struct DeletePostCommand {
    pub id: i64,
}

impl PostCommandService {
    pub async fn delete_post(
        &self,
        actor: &AuthenticatedUser,
        command: DeletePostCommand,
    ) -> ApplicationResult<()> {
        let id = PostId::new(command.id)
            .map_err(|_| ApplicationError::validation("Invalid post id"))?;
        let post = self
            .read_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Post not found"))?;

        if !CanDeletePostSpec::new(&actor.capabilities, &post, actor.id).is_satisfied() {
            return Err(ApplicationError::forbidden("Forbidden"));
        }

        self.write_repo.delete(id).await?;

        if let Some(image) = &post.featured_image {
            self.discard_image(image).await;
        }

        tracing::info!(post_id = command.id, "post deleted");
        Ok(())
    }
}

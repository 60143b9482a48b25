use super::{PostCommandService, capability::parse_category_id};
use crate::{
    application::{
        dto::{AuthenticatedUser, PostDto},
        error::{ApplicationError, ApplicationResult},
        ports::storage::ImageUpload,
    },
    domain::post::{
        FeaturedImage, Post, PostContent, PostExcerpt, PostId, PostTitle, PostUpdate,
        specifications::{CanUpdatePostSpec, PostSpecification},
    },
};
use chrono::{DateTime, Utc};

pub struct UpdatePostCommand {
    pub id: i64,
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub image: Option<ImageUpload>,
}

impl PostCommandService {
    pub async fn update_post(
        &self,
        actor: &AuthenticatedUser,
        command: UpdatePostCommand,
    ) -> ApplicationResult<PostDto> {
        let id = PostId::new(command.id)
            .map_err(|_| ApplicationError::validation("Invalid post id"))?;
        let mut post = self
            .read_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Post not found"))?;

        if !CanUpdatePostSpec::new(&actor.capabilities, &post, actor.id).is_satisfied() {
            return Err(ApplicationError::forbidden("Forbidden"));
        }

        let UpdatePostCommand {
            id: _,
            title,
            content,
            excerpt,
            category,
            image,
        } = command;

        let now = self.clock.now();
        let mut update = apply_content_updates(&mut post, title, content, excerpt, now)?;

        if let Some(raw) = category {
            let category_id = parse_category_id(&raw)?;
            self.ensure_category_exists(category_id).await?;
            update = update.with_category(category_id);
        }

        let new_image = self.store_image(image).await?;
        let mut replaced: Option<FeaturedImage> = None;
        if let Some(image) = new_image.clone() {
            replaced = post.replace_image(image.clone(), now);
            update = update.with_featured_image(image);
        }

        if update.is_empty() {
            return Ok(post.into());
        }

        let updated = match self.write_repo.update(update).await {
            Ok(updated) => updated,
            Err(err) => {
                if let Some(image) = &new_image {
                    self.discard_image(image).await;
                }
                return Err(err.into());
            }
        };

        if let Some(old) = &replaced {
            self.discard_image(old).await;
        }

        Ok(updated.into())
    }
}

/// Fold title/content/excerpt changes into both the entity and the update.
/// The slug is left untouched even when the title changes.
fn apply_content_updates(
    post: &mut Post,
    title: Option<String>,
    content: Option<String>,
    excerpt: Option<String>,
    now: DateTime<Utc>,
) -> ApplicationResult<PostUpdate> {
    let mut update = PostUpdate::new(post.id, now);

    let title = title.map(PostTitle::new).transpose()?;
    let content = content.map(PostContent::new).transpose()?;
    let excerpt = excerpt.map(|raw| PostExcerpt::optional(Some(raw))).transpose()?;

    if title.is_none() && content.is_none() && excerpt.is_none() {
        return Ok(update);
    }

    let new_title = title.clone().unwrap_or_else(|| post.title.clone());
    let new_content = content.clone().unwrap_or_else(|| post.content.clone());
    let new_excerpt = excerpt.clone().unwrap_or_else(|| post.excerpt.clone());
    post.set_content(new_title, new_content, new_excerpt, now);

    if let Some(title) = title {
        update = update.with_title(title);
    }
    if let Some(content) = content {
        update = update.with_content(content);
    }
    if let Some(excerpt) = excerpt {
        update = update.with_excerpt(excerpt);
    }

    Ok(update)
}

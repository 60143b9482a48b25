use super::{
    PostCommandService,
    capability::{ensure_capability, parse_category_id},
};
use crate::{
    application::{
        dto::{AuthenticatedUser, PostDto},
        error::ApplicationResult,
        ports::storage::ImageUpload,
    },
    domain::post::{NewPost, PostContent, PostExcerpt, PostTitle},
};

pub struct CreatePostCommand {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub category: String,
    pub image: Option<ImageUpload>,
}

impl PostCommandService {
    /// Validate, store the optional image, then insert under a freshly
    /// allocated slug. The image is discarded again if the insert fails.
    pub async fn create_post(
        &self,
        actor: &AuthenticatedUser,
        command: CreatePostCommand,
    ) -> ApplicationResult<PostDto> {
        ensure_capability(actor, "posts", "create")?;

        let title = PostTitle::new(command.title)?;
        let content = PostContent::new(command.content)?;
        let excerpt = PostExcerpt::optional(command.excerpt)?;
        let category_id = parse_category_id(&command.category)?;
        self.ensure_category_exists(category_id).await?;

        let featured_image = self.store_image(command.image).await?;
        let now = self.clock.now();
        let source = title.as_str().to_owned();

        let new_post = NewPost {
            title,
            slug: None,
            content,
            excerpt,
            featured_image: featured_image.clone(),
            category_id,
            author_id: actor.id,
            created_at: now,
            updated_at: now,
        };

        let result = self
            .slug_allocator
            .allocate_and_insert(&source, "post", new_post, |post| {
                self.write_repo.insert(post)
            })
            .await;

        match result {
            Ok(post) => {
                tracing::info!(post_id = i64::from(post.id), slug = %post.slug, "post created");
                Ok(post.into())
            }
            Err(err) => {
                if let Some(image) = &featured_image {
                    self.discard_image(image).await;
                }
                Err(err.into())
            }
        }
    }
}

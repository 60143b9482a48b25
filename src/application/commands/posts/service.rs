use std::sync::Arc;

use crate::{
    application::{
        error::{ApplicationError, ApplicationResult},
        ports::{
            storage::{ImageStore, ImageUpload},
            time::Clock,
        },
    },
    domain::{
        category::{CategoryId, CategoryRepository},
        post::{CommentRepository, FeaturedImage, PostReadRepository, PostWriteRepository},
        slug::SlugAllocator,
    },
};

pub struct PostCommandService {
    pub(super) write_repo: Arc<dyn PostWriteRepository>,
    pub(super) read_repo: Arc<dyn PostReadRepository>,
    pub(super) comment_repo: Arc<dyn CommentRepository>,
    pub(super) category_repo: Arc<dyn CategoryRepository>,
    pub(super) image_store: Arc<dyn ImageStore>,
    pub(super) slug_allocator: Arc<SlugAllocator>,
    pub(super) clock: Arc<dyn Clock>,
}

impl PostCommandService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        write_repo: Arc<dyn PostWriteRepository>,
        read_repo: Arc<dyn PostReadRepository>,
        comment_repo: Arc<dyn CommentRepository>,
        category_repo: Arc<dyn CategoryRepository>,
        image_store: Arc<dyn ImageStore>,
        slug_allocator: Arc<SlugAllocator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            write_repo,
            read_repo,
            comment_repo,
            category_repo,
            image_store,
            slug_allocator,
            clock,
        }
    }

    pub(super) async fn ensure_category_exists(&self, id: CategoryId) -> ApplicationResult<()> {
        self.category_repo
            .find_by_id(id)
            .await?
            .map(|_| ())
            .ok_or_else(|| ApplicationError::validation("Category not found"))
    }

    pub(super) async fn store_image(
        &self,
        upload: Option<ImageUpload>,
    ) -> ApplicationResult<Option<FeaturedImage>> {
        let Some(upload) = upload else {
            return Ok(None);
        };
        let stored = self.image_store.store(upload).await?;
        Ok(Some(FeaturedImage {
            url: stored.url,
            public_id: stored.public_id,
        }))
    }

    /// Best-effort removal; a failure only leaves an orphaned file behind.
    pub(super) async fn discard_image(&self, image: &FeaturedImage) {
        if let Some(public_id) = image.public_id.as_deref() {
            if let Err(err) = self.image_store.remove(public_id).await {
                tracing::warn!(error = %err, public_id, "failed to remove stored image");
            }
        }
    }
}

// src/application/services/mod.rs
use std::sync::Arc;

use crate::{
    application::{
        ApplicationResult,
        commands::{
            categories::CategoryCommandService, posts::PostCommandService,
            users::UserCommandService,
        },
        dto::AuthenticatedUser,
        error::ApplicationError,
        ports::{
            security::{PasswordHasher, TokenManager},
            storage::ImageStore,
            time::Clock,
            util::SlugSuffixGenerator,
        },
        queries::{
            categories::CategoryQueryService, posts::PostQueryService, users::UserQueryService,
        },
    },
    domain::{
        category::CategoryRepository,
        post::{CommentRepository, PostReadRepository, PostWriteRepository},
        slug::SlugAllocator,
        user::UserRepository,
    },
};

pub struct ApplicationServices {
    pub user_commands: Arc<UserCommandService>,
    pub post_commands: Arc<PostCommandService>,
    pub category_commands: Arc<CategoryCommandService>,
    pub post_queries: Arc<PostQueryService>,
    pub category_queries: Arc<CategoryQueryService>,
    pub user_queries: Arc<UserQueryService>,
    user_repo: Arc<dyn UserRepository>,
    token_manager: Arc<dyn TokenManager>,
}

impl ApplicationServices {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        post_write_repo: Arc<dyn PostWriteRepository>,
        post_read_repo: Arc<dyn PostReadRepository>,
        comment_repo: Arc<dyn CommentRepository>,
        category_repo: Arc<dyn CategoryRepository>,
        image_store: Arc<dyn ImageStore>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_manager: Arc<dyn TokenManager>,
        clock: Arc<dyn Clock>,
        slug_suffixes: Arc<dyn SlugSuffixGenerator>,
    ) -> Self {
        let slug_allocator = Arc::new(SlugAllocator::new(slug_suffixes, Arc::clone(&clock)));

        let user_commands = Arc::new(UserCommandService::new(
            Arc::clone(&user_repo),
            password_hasher,
            Arc::clone(&token_manager),
            Arc::clone(&clock),
        ));

        let post_commands = Arc::new(PostCommandService::new(
            post_write_repo,
            Arc::clone(&post_read_repo),
            Arc::clone(&comment_repo),
            Arc::clone(&category_repo),
            image_store,
            Arc::clone(&slug_allocator),
            Arc::clone(&clock),
        ));

        let category_commands = Arc::new(CategoryCommandService::new(
            Arc::clone(&category_repo),
            slug_allocator,
            clock,
        ));

        let post_queries = Arc::new(PostQueryService::new(post_read_repo, comment_repo));
        let category_queries = Arc::new(CategoryQueryService::new(category_repo));
        let user_queries = Arc::new(UserQueryService::new(Arc::clone(&user_repo)));

        Self {
            user_commands,
            post_commands,
            category_commands,
            post_queries,
            category_queries,
            user_queries,
            user_repo,
            token_manager,
        }
    }

    pub fn token_manager(&self) -> Arc<dyn TokenManager> {
        Arc::clone(&self.token_manager)
    }

    /// Verify a raw bearer token and make sure its subject still exists.
    pub async fn authenticate(&self, token: &str) -> ApplicationResult<AuthenticatedUser> {
        let user = self
            .token_manager
            .authenticate(token)
            .await
            .map_err(|err| match err {
                ApplicationError::Unauthorized(reason) => {
                    tracing::debug!(%reason, "bearer token rejected");
                    ApplicationError::unauthorized("Not authorized, token invalid")
                }
                other => other,
            })?;

        if self.user_repo.find_by_id(user.id).await?.is_none() {
            tracing::debug!(user_id = i64::from(user.id), "token subject no longer exists");
            return Err(ApplicationError::unauthorized(
                "Not authorized, user not found",
            ));
        }

        Ok(user)
    }
}

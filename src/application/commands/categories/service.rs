use std::sync::Arc;

use crate::{
    application::ports::time::Clock,
    domain::{category::CategoryRepository, slug::SlugAllocator},
};

pub struct CategoryCommandService {
    pub(super) repo: Arc<dyn CategoryRepository>,
    pub(super) slug_allocator: Arc<SlugAllocator>,
    pub(super) clock: Arc<dyn Clock>,
}

impl CategoryCommandService {
    pub fn new(
        repo: Arc<dyn CategoryRepository>,
        slug_allocator: Arc<SlugAllocator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            slug_allocator,
            clock,
        }
    }
}

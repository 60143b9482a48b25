use crate::domain::pagination::Page;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone)]
pub struct PagedDto<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T, U> From<Page<U>> for PagedDto<T>
where
    U: Into<T>,
{
    fn from(page: Page<U>) -> Self {
        let meta = PageMeta {
            total: page.total,
            page: page.request.page(),
            limit: page.request.limit(),
        };
        Self {
            items: page.items.into_iter().map(Into::into).collect(),
            meta,
        }
    }
}

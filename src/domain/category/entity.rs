use crate::domain::category::value_objects::{CategoryDescription, CategoryId, CategoryName};
use crate::domain::slug::{Slug, SlugTarget};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub slug: Slug,
    pub description: Option<CategoryDescription>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: CategoryName,
    pub slug: Option<Slug>,
    pub description: Option<CategoryDescription>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewCategory {
    pub fn new(
        name: CategoryName,
        description: Option<CategoryDescription>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            name,
            slug: None,
            description,
            created_at: now,
            updated_at: now,
        }
    }
}

impl SlugTarget for NewCategory {
    fn assign_slug(&mut self, slug: Slug) {
        self.slug = Some(slug);
    }
}

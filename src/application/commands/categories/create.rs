use super::CategoryCommandService;
use crate::{
    application::{
        dto::{AuthenticatedUser, CategoryDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        category::{CategoryDescription, CategoryName, NewCategory},
        errors::DomainError,
    },
};

const ALREADY_EXISTS: &str = "Category already exists";

pub struct CreateCategoryCommand {
    pub name: String,
    pub description: Option<String>,
}

impl CategoryCommandService {
    pub async fn create_category(
        &self,
        actor: &AuthenticatedUser,
        command: CreateCategoryCommand,
    ) -> ApplicationResult<CategoryDto> {
        if !actor.has_capability("categories", "create") {
            return Err(ApplicationError::forbidden(
                "missing capability categories:create",
            ));
        }

        let name = CategoryName::new(command.name)?;
        let description = command
            .description
            .filter(|d| !d.trim().is_empty())
            .map(CategoryDescription::new)
            .transpose()?;

        if self.repo.find_by_name(&name).await?.is_some() {
            return Err(ApplicationError::validation(ALREADY_EXISTS));
        }

        let source = name.as_str().to_owned();
        let new_category = NewCategory::new(name, description, self.clock.now());

        let category = self
            .slug_allocator
            .allocate_and_insert(&source, "category", new_category, |category| {
                self.repo.insert(category)
            })
            .await
            .map_err(|err| match err {
                DomainError::DuplicateKey { ref field } if field == "name" => {
                    ApplicationError::validation(ALREADY_EXISTS)
                }
                other => other.into(),
            })?;

        tracing::info!(category_id = i64::from(category.id), slug = %category.slug, "category created");
        Ok(category.into())
    }
}

// src/domain/errors.rs
use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("duplicate value for unique field `{field}`")]
    DuplicateKey { field: String },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("slug allocation for {entity} gave up after {attempts} attempts")]
    SlugAllocationExhausted { entity: String, attempts: u32 },
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl DomainError {
    pub fn duplicate_key(field: impl Into<String>) -> Self {
        Self::DuplicateKey {
            field: field.into(),
        }
    }

    /// True when a uniqueness constraint on `field` rejected the write.
    pub fn is_duplicate_of(&self, field: &str) -> bool {
        matches!(self, Self::DuplicateKey { field: f } if f == field)
    }
}

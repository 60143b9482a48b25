// src/domain/slug/mod.rs
mod allocator;

pub use allocator::SlugAllocator;

use crate::domain::errors::{DomainError, DomainResult};
use std::fmt;

/// Total insert attempts before a slug allocation is abandoned.
pub const MAX_SLUG_ATTEMPTS: u32 = 6;

/// Length of the random suffix appended after a collision.
pub const SLUG_SUFFIX_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::Validation("slug cannot be empty".into()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

/// A record payload whose slug is assigned by the [`SlugAllocator`].
pub trait SlugTarget {
    fn assign_slug(&mut self, slug: Slug);
}

/// Turn a human readable title into its base slug.
///
/// The input is lower-cased, every character outside `[a-z0-9_ ]` is dropped
/// and each run of spaces becomes a single hyphen. Leading and trailing spaces
/// therefore survive as hyphens. The result may be empty.
pub fn base_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut in_space_run = false;

    for ch in title.to_lowercase().chars() {
        if ch == ' ' {
            if !in_space_run {
                slug.push('-');
                in_space_run = true;
            }
        } else if ch.is_ascii_alphanumeric() || ch == '_' {
            slug.push(ch);
            in_space_run = false;
        }
    }

    slug
}

/// Candidate slug for the given zero-based attempt.
///
/// The first attempt uses the base slug verbatim; every retry appends
/// `-<suffix>`. `suffix` is only invoked for retries.
pub fn slug_candidate(base: &str, attempt: u32, suffix: impl FnOnce() -> String) -> String {
    if attempt == 0 {
        base.to_owned()
    } else {
        format!("{base}-{}", suffix())
    }
}

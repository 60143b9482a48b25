// src/domain/slug/allocator.rs
use std::future::Future;
use std::sync::Arc;

use super::{MAX_SLUG_ATTEMPTS, SLUG_SUFFIX_LEN, Slug, SlugTarget, base_slug, slug_candidate};
use crate::application::ports::{time::Clock, util::SlugSuffixGenerator};
use crate::domain::errors::{DomainError, DomainResult};

/// Domain service that assigns a unique slug to a new record while inserting it.
///
/// Uniqueness is arbitrated by the storage layer: the insert callback must
/// report a slug conflict as [`DomainError::DuplicateKey`] with field `slug`.
/// The allocator holds no shared mutable state, so concurrent callers need no
/// coordination beyond that constraint.
pub struct SlugAllocator {
    suffixes: Arc<dyn SlugSuffixGenerator>,
    clock: Arc<dyn Clock>,
    max_attempts: u32,
}

impl SlugAllocator {
    pub fn new(suffixes: Arc<dyn SlugSuffixGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            suffixes,
            clock,
            max_attempts: MAX_SLUG_ATTEMPTS,
        }
    }

    /// Base slug for `source`, or `<fallback_prefix>-<unix millis>` when the
    /// title contains no word characters at all.
    pub fn base_for(&self, source: &str, fallback_prefix: &str) -> String {
        let base = base_slug(source);
        if base.chars().all(|c| c == '-') {
            format!("{fallback_prefix}-{}", self.clock.now().timestamp_millis())
        } else {
            base
        }
    }

    /// Inserts `payload` under the first free slug candidate. `fallback_prefix`
    /// names the kind of record and is reported back on exhaustion.
    pub async fn allocate_and_insert<T, R, F, Fut>(
        &self,
        source: &str,
        fallback_prefix: &str,
        mut payload: T,
        mut insert: F,
    ) -> DomainResult<R>
    where
        T: SlugTarget + Clone,
        F: FnMut(T) -> Fut,
        Fut: Future<Output = DomainResult<R>>,
    {
        let base = self.base_for(source, fallback_prefix);

        for attempt in 0..self.max_attempts {
            let candidate =
                slug_candidate(&base, attempt, || self.suffixes.suffix(SLUG_SUFFIX_LEN));
            payload.assign_slug(Slug::new(candidate.as_str())?);

            match insert(payload.clone()).await {
                Ok(record) => return Ok(record),
                Err(err) if err.is_duplicate_of("slug") => {
                    tracing::debug!(attempt, slug = %candidate, "slug collision, retrying");
                }
                Err(err) => return Err(err),
            }
        }

        tracing::warn!(
            base = %base,
            attempts = self.max_attempts,
            "slug allocation exhausted"
        );
        Err(DomainError::SlugAllocationExhausted {
            entity: fallback_prefix.to_owned(),
            attempts: self.max_attempts,
        })
    }
}

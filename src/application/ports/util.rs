// src/application/ports/util.rs
/// Source of the random suffix appended to a slug after a collision.
pub trait SlugSuffixGenerator: Send + Sync {
    /// `len` characters drawn from `[a-z0-9]`.
    fn suffix(&self, len: usize) -> String;
}

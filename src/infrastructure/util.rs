// src/infrastructure/util.rs
use crate::application::ports::util::SlugSuffixGenerator;
use rand::Rng;

const SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Random lower-case alphanumeric string of `len` characters.
pub fn random_lower_alnum(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| char::from(SUFFIX_ALPHABET[rng.random_range(0..SUFFIX_ALPHABET.len())]))
        .collect()
}

/// Thread-local RNG backed suffixes for slug retries.
#[derive(Default, Clone, Copy)]
pub struct RandomSlugSuffix;

impl SlugSuffixGenerator for RandomSlugSuffix {
    fn suffix(&self, len: usize) -> String {
        random_lower_alnum(len)
    }
}

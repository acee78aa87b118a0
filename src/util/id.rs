//! ID generation for equipment records.
//!
//! IDs look like `eq-<hash>` where hash is base36 lowercase (0-9, a-z) with
//! adaptive length based on how many records the database has seen.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Default ID generation configuration.
#[derive(Debug, Clone)]
pub struct IdConfig {
    /// Equipment ID prefix.
    pub prefix: String,
    /// Minimum hash length.
    pub min_hash_length: usize,
    /// Maximum hash length.
    pub max_hash_length: usize,
    /// Maximum collision probability before increasing length.
    pub max_collision_prob: f64,
}

impl Default for IdConfig {
    fn default() -> Self {
        Self {
            prefix: "eq".to_string(),
            min_hash_length: 4,
            max_hash_length: 8,
            max_collision_prob: 0.25,
        }
    }
}

/// ID generator that produces unique equipment IDs.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    config: IdConfig,
}

impl IdGenerator {
    #[must_use]
    pub const fn new(config: IdConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(IdConfig::default())
    }

    /// Compute the optimal hash length for a given record count.
    ///
    /// Uses birthday problem approximation to estimate collision probability.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap
    )]
    pub fn optimal_length(&self, known_ids: usize) -> usize {
        let n = known_ids as f64;
        let max_prob = self.config.max_collision_prob;

        for len in self.config.min_hash_length..=self.config.max_hash_length {
            let space = 36_f64.powi(len as i32);
            // P(collision) ≈ 1 - e^(-n²/2d)
            let prob = 1.0 - (-n * n / (2.0 * space)).exp();
            if prob < max_prob {
                return len;
            }
        }
        self.config.max_hash_length
    }

    #[must_use]
    pub fn generate_candidate(
        &self,
        name: &str,
        category: Option<&str>,
        created_at: DateTime<Utc>,
        nonce: u32,
        hash_length: usize,
    ) -> String {
        let seed = generate_id_seed(name, category, created_at, nonce);
        let hash_str = compute_id_hash(&seed, hash_length);
        format!("{}-{hash_str}", self.config.prefix)
    }

    /// Generate an ID, asking `taken` whether each candidate is already used.
    ///
    /// `taken` may fail (it usually queries the database); its error is
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `taken`.
    pub fn generate<F, E>(
        &self,
        name: &str,
        category: Option<&str>,
        created_at: DateTime<Utc>,
        known_ids: usize,
        mut taken: F,
    ) -> Result<String, E>
    where
        F: FnMut(&str) -> Result<bool, E>,
    {
        let mut length = self.optimal_length(known_ids);

        loop {
            for nonce in 0..10 {
                let id = self.generate_candidate(name, category, created_at, nonce, length);
                if !taken(&id)? {
                    return Ok(id);
                }
            }

            if length < self.config.max_hash_length {
                length += 1;
            } else {
                break;
            }
        }

        // Every short candidate collided: widen the hash and keep stepping the nonce.
        let mut nonce = 10u32;
        loop {
            let id = self.generate_candidate(name, category, created_at, nonce, 12);
            if !taken(&id)? {
                return Ok(id);
            }
            nonce += 1;
        }
    }
}

/// Seed string: `name | category | created_at (ns) | nonce`.
#[must_use]
pub fn generate_id_seed(
    name: &str,
    category: Option<&str>,
    created_at: DateTime<Utc>,
    nonce: u32,
) -> String {
    format!(
        "{}|{}|{}|{}",
        name,
        category.unwrap_or(""),
        created_at.timestamp_nanos_opt().unwrap_or(0),
        nonce
    )
}

/// Compute a base36 hash of the input string with a specific length.
///
/// Hashes with SHA256, folds the first 8 bytes into a u64, encodes as base36
/// and truncates to the requested length.
#[must_use]
pub fn compute_id_hash(input: &str, length: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let result = hasher.finalize();

    let mut num = 0u64;
    for &byte in result.iter().take(8) {
        num = (num << 8) | u64::from(byte);
    }

    let mut s = base36_encode(num);
    if s.len() < length {
        s = format!("{s:0>length$}");
    }
    s.chars().take(length).collect()
}

fn base36_encode(mut num: u64) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if num == 0 {
        return "0".to_string();
    }
    let mut chars = Vec::new();
    while num > 0 {
        chars.push(ALPHABET[(num % 36) as usize] as char);
        num /= 36;
    }
    chars.into_iter().rev().collect()
}

/// Normalize user-typed IDs (`EQ-AB12` -> `eq-ab12`).
#[must_use]
pub fn normalize_id(id: &str) -> String {
    id.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_base36_encode() {
        assert_eq!(base36_encode(0), "0");
        assert_eq!(base36_encode(10), "a");
        assert_eq!(base36_encode(35), "z");
        assert_eq!(base36_encode(36), "10");
    }

    #[test]
    fn test_compute_id_hash_length() {
        assert_eq!(compute_id_hash("drill", 4).len(), 4);
        assert_eq!(compute_id_hash("drill", 12).len(), 12);
    }

    #[test]
    fn test_generate_id_seed() {
        let now = Utc::now();
        let seed = generate_id_seed("Hammer", Some("Tools"), now, 3);
        assert!(seed.starts_with("Hammer|Tools|"));
        assert!(seed.ends_with("|3"));
    }

    #[test]
    fn test_optimal_length_grows_with_population() {
        let id_gen = IdGenerator::with_defaults();
        assert_eq!(id_gen.optimal_length(0), 4);
        assert!(id_gen.optimal_length(100_000) > id_gen.optimal_length(10));
        assert!(id_gen.optimal_length(usize::MAX / 2) <= 8);
    }

    #[test]
    fn test_generate_uses_prefix() {
        let id_gen = IdGenerator::with_defaults();
        let id = id_gen
            .generate::<_, ()>("Hammer", None, Utc::now(), 0, |_| Ok(false))
            .unwrap();
        assert!(id.starts_with("eq-"));
        assert!(crate::validation::is_valid_id_format(&id));
    }

    #[test]
    fn test_generate_skips_taken_ids() {
        let id_gen = IdGenerator::with_defaults();
        let now = Utc::now();
        let mut taken = HashSet::new();

        let first = id_gen
            .generate::<_, ()>("Hammer", None, now, 0, |id| Ok(taken.contains(id)))
            .unwrap();
        taken.insert(first.clone());
        let second = id_gen
            .generate::<_, ()>("Hammer", None, now, 0, |id| Ok(taken.contains(id)))
            .unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_generate_falls_back_when_everything_short_collides() {
        let id_gen = IdGenerator::with_defaults();
        let id = id_gen
            .generate::<_, ()>("Hammer", None, Utc::now(), 0, |id| Ok(id.len() < 15))
            .unwrap();
        assert_eq!(id.len(), "eq-".len() + 12);
    }

    #[test]
    fn test_generate_propagates_lookup_errors() {
        let id_gen = IdGenerator::with_defaults();
        let result = id_gen.generate("Hammer", None, Utc::now(), 0, |_| Err("db down"));
        assert_eq!(result, Err("db down"));
    }

    #[test]
    fn test_normalize_id() {
        assert_eq!(normalize_id("  EQ-Ab12 "), "eq-ab12");
    }
}

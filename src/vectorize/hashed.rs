//! Dense feature-hashed embeddings.
//!
//! A lightweight stand-in for a pretrained sentence encoder: every token
//! (and token bigram) is hashed to a handful of positions in a
//! fixed-width vector with a hash-derived sign, and the result is
//! L2-normalized. No fitting state means new queries encode exactly like
//! corpus documents, with no refit.

use rayon::prelude::*;

use crate::catalog::RecordId;
use crate::error::{Result, SugerirError};
use crate::vectorize::{FeatureMatrix, FeatureVector, Vectorizer};

/// Default embedding width, matching the small sentence-encoder sizes the
/// dense strategy emulates.
pub const DEFAULT_DIM: usize = 384;

/// Weight of bigram features relative to unigrams.
const BIGRAM_WEIGHT: f32 = 0.5;

/// Signed feature-hashing embedder.
///
/// # Examples
///
/// ```
/// use sugerir::vectorize::{HashedEmbedder, Vectorizer};
///
/// let embedder = HashedEmbedder::new();
/// let vector = embedder.vector_for("haunted house mystery").unwrap();
///
/// // Unit-length dense vector, usable without any fitting
/// assert!((vector.norm() - 1.0).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HashedEmbedder {
    dim: usize,
}

impl HashedEmbedder {
    /// Embedder at the default width.
    #[must_use]
    pub fn new() -> Self {
        Self { dim: DEFAULT_DIM }
    }

    /// Override the embedding width (minimum 1).
    #[must_use]
    pub fn with_dim(mut self, dim: usize) -> Self {
        self.dim = dim.max(1);
        self
    }

    /// Embedding width.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Encode one text into a normalized dense vector.
    ///
    /// Text with no tokens encodes to the zero vector, which is
    /// orthogonal to everything under cosine similarity.
    #[must_use]
    pub fn encode(&self, text: &str) -> Vec<f32> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let mut vector = vec![0.0f32; self.dim];

        for token in &tokens {
            // Three positions per token spread collisions
            for seed in 0..3u64 {
                let position = (fnv1a(token, seed) % self.dim as u64) as usize;
                let sign = hash_sign(token, seed + 3);
                vector[position] += sign;
            }
        }

        for pair in tokens.windows(2) {
            let bigram = pair.join("_");
            let position = (fnv1a(&bigram, 6) % self.dim as u64) as usize;
            vector[position] += BIGRAM_WEIGHT * hash_sign(&bigram, 7);
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

impl Default for HashedEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl Vectorizer for HashedEmbedder {
    fn fit(&mut self, ids: &[RecordId], corpus: &[String]) -> Result<FeatureMatrix> {
        if corpus.is_empty() {
            return Err(SugerirError::vectorization(
                "cannot encode an empty corpus",
            ));
        }

        let rows: Vec<FeatureVector> = corpus
            .par_iter()
            .map(|doc| FeatureVector::Dense(self.encode(doc)))
            .collect();

        FeatureMatrix::new(ids.to_vec(), rows, self.dim)
    }

    fn vector_for(&self, text: &str) -> Result<FeatureVector> {
        Ok(FeatureVector::Dense(self.encode(text)))
    }
}

/// Seeded FNV-1a over the term bytes.
fn fnv1a(term: &str, seed: u64) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325u64 ^ seed.wrapping_mul(0x9e37_79b9_7f4a_7c15);
    for byte in term.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

fn hash_sign(term: &str, seed: u64) -> f32 {
    if fnv1a(term, seed) & 1 == 0 {
        1.0
    } else {
        -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_deterministic() {
        let embedder = HashedEmbedder::new();
        assert_eq!(embedder.encode("gothic horror"), embedder.encode("gothic horror"));
    }

    #[test]
    fn test_encode_unit_norm() {
        let embedder = HashedEmbedder::new();
        let v = embedder.encode("a few ordinary words");
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_text_encodes_to_zero_vector() {
        let embedder = HashedEmbedder::new();
        let v = embedder.encode("");
        assert_eq!(v.len(), DEFAULT_DIM);
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_dim_override() {
        let embedder = HashedEmbedder::new().with_dim(64);
        assert_eq!(embedder.encode("anything").len(), 64);
        assert_eq!(embedder.dim(), 64);
    }

    #[test]
    fn test_fit_carries_ids_and_dim() {
        let mut embedder = HashedEmbedder::new().with_dim(32);
        let corpus = vec!["first doc".to_string(), "second doc".to_string()];
        let matrix = embedder.fit(&[3, 9], &corpus).unwrap();
        assert_eq!(matrix.ids(), &[3, 9]);
        assert_eq!(matrix.dim(), 32);
        assert_eq!(matrix.len(), 2);
    }

    #[test]
    fn test_empty_corpus_is_error() {
        let mut embedder = HashedEmbedder::new();
        assert!(embedder.fit(&[], &[]).is_err());
    }

    #[test]
    fn test_query_encoding_needs_no_fit() {
        let embedder = HashedEmbedder::new();
        let v = embedder.vector_for("brand new query").unwrap();
        assert!(v.norm() > 0.0);
    }

    #[test]
    fn test_shared_tokens_increase_similarity() {
        let embedder = HashedEmbedder::new();
        let a = FeatureVector::Dense(embedder.encode("space station thriller"));
        let b = FeatureVector::Dense(embedder.encode("space station drama"));
        let c = FeatureVector::Dense(embedder.encode("regency romance ballroom"));
        assert!(a.dot(&b) > a.dot(&c));
    }
}

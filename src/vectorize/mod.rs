//! Feature vectorization backends.
//!
//! Tag text becomes numeric vectors through exactly one of two
//! interchangeable strategies, selected by configuration:
//!
//! - [`TfidfVectorizer`]: sparse lexical vectors over word 1–3-grams with
//!   tf × idf weighting. Must be refit whenever the corpus changes.
//! - [`HashedEmbedder`]: dense fixed-width vectors via signed feature
//!   hashing. Encodes out-of-corpus queries without refitting.
//!
//! Both produce a [`FeatureMatrix`] whose rows carry the record ids they
//! were built from, so reordering or filtering the catalog can never
//! silently desynchronize vectors from records. Everything downstream
//! only assumes cosine similarity works on the rows.

pub mod hashed;
pub mod tfidf;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, RecordId};
use crate::error::{Result, SugerirError};

pub use hashed::HashedEmbedder;
pub use tfidf::TfidfVectorizer;

/// Sparse vector: parallel index/value arrays, indices strictly
/// ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    indices: Vec<u32>,
    values: Vec<f32>,
}

impl SparseVector {
    /// Build from (index, value) pairs; sorts and drops explicit zeros.
    #[must_use]
    pub fn from_pairs(mut pairs: Vec<(u32, f32)>) -> Self {
        pairs.retain(|(_, v)| *v != 0.0);
        pairs.sort_unstable_by_key(|(i, _)| *i);

        let mut indices = Vec::with_capacity(pairs.len());
        let mut values = Vec::with_capacity(pairs.len());
        for (i, v) in pairs {
            indices.push(i);
            values.push(v);
        }
        Self { indices, values }
    }

    /// Number of stored (non-zero) entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Largest stored index plus one, or 0 when empty.
    #[must_use]
    pub fn max_dim(&self) -> usize {
        self.indices.last().map_or(0, |&i| i as usize + 1)
    }

    /// Iterate stored entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Dot product with another sparse vector (merge walk).
    #[must_use]
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let mut sum = 0.0;
        let (mut i, mut j) = (0, 0);
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// Euclidean norm.
    #[must_use]
    pub fn norm(&self) -> f32 {
        self.values.iter().map(|v| v * v).sum::<f32>().sqrt()
    }
}

/// One record's feature vector, in whichever representation the active
/// backend produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureVector {
    /// Sparse lexical vector (TF-IDF).
    Sparse(SparseVector),
    /// Dense embedding vector.
    Dense(Vec<f32>),
}

impl FeatureVector {
    /// Euclidean norm.
    #[must_use]
    pub fn norm(&self) -> f32 {
        match self {
            FeatureVector::Sparse(v) => v.norm(),
            FeatureVector::Dense(v) => v.iter().map(|x| x * x).sum::<f32>().sqrt(),
        }
    }

    /// Dot product. Rows of one matrix always share a representation;
    /// mixing kinds is rejected at matrix construction.
    #[must_use]
    pub fn dot(&self, other: &FeatureVector) -> f32 {
        match (self, other) {
            (FeatureVector::Sparse(a), FeatureVector::Sparse(b)) => a.dot(b),
            (FeatureVector::Dense(a), FeatureVector::Dense(b)) => {
                a.iter().zip(b).map(|(x, y)| x * y).sum()
            }
            _ => {
                debug_assert!(false, "mixed sparse/dense dot product");
                0.0
            }
        }
    }

    fn is_sparse(&self) -> bool {
        matches!(self, FeatureVector::Sparse(_))
    }

    fn within_dim(&self, dim: usize) -> bool {
        match self {
            FeatureVector::Sparse(v) => v.max_dim() <= dim,
            FeatureVector::Dense(v) => v.len() == dim,
        }
    }
}

/// Feature vectors for a whole corpus, keyed by record id.
///
/// Row order mirrors the catalog order the backend was fitted on, but the
/// ids are authoritative: [`FeatureMatrix::is_aligned_with`] is how
/// consumers verify they are pairing vectors with the right records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    ids: Vec<RecordId>,
    rows: Vec<FeatureVector>,
    norms: Vec<f32>,
    dim: usize,
}

impl FeatureMatrix {
    /// Assemble a matrix, validating shape invariants.
    ///
    /// # Errors
    ///
    /// [`SugerirError::Vectorization`] when ids and rows disagree in
    /// length, rows mix representations, or a row exceeds `dim`.
    pub fn new(ids: Vec<RecordId>, rows: Vec<FeatureVector>, dim: usize) -> Result<Self> {
        if ids.len() != rows.len() {
            return Err(SugerirError::vectorization(format!(
                "{} ids for {} vector rows",
                ids.len(),
                rows.len()
            )));
        }
        if let Some(first) = rows.first() {
            if !rows.iter().all(|r| r.is_sparse() == first.is_sparse()) {
                return Err(SugerirError::vectorization(
                    "rows mix sparse and dense representations",
                ));
            }
        }
        if let Some(bad) = rows.iter().position(|r| !r.within_dim(dim)) {
            return Err(SugerirError::vectorization(format!(
                "row {bad} exceeds declared dimensionality {dim}"
            )));
        }

        let norms = rows.iter().map(FeatureVector::norm).collect();
        Ok(Self {
            ids,
            rows,
            norms,
            dim,
        })
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the matrix has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Vector dimensionality (vocabulary size or embedding width).
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Record ids, in row order.
    #[must_use]
    pub fn ids(&self) -> &[RecordId] {
        &self.ids
    }

    /// Row at a position.
    #[must_use]
    pub fn row(&self, position: usize) -> &FeatureVector {
        &self.rows[position]
    }

    /// Precomputed norm of a row.
    #[must_use]
    pub fn norm(&self, position: usize) -> f32 {
        self.norms[position]
    }

    /// Record id of a row.
    #[must_use]
    pub fn id_at(&self, position: usize) -> RecordId {
        self.ids[position]
    }

    /// Position of a record id, if present.
    #[must_use]
    pub fn position_of(&self, id: RecordId) -> Option<usize> {
        self.ids.iter().position(|&i| i == id)
    }

    /// Whether rows pair one-to-one, in order, with the catalog's records.
    #[must_use]
    pub fn is_aligned_with(&self, catalog: &Catalog) -> bool {
        self.ids.len() == catalog.len()
            && self
                .ids
                .iter()
                .zip(catalog.records())
                .all(|(&id, record)| id == record.id)
    }
}

/// Capability contract every vectorization backend satisfies.
pub trait Vectorizer {
    /// Fit on the corpus and return one vector row per tag string, keyed
    /// by the given record ids.
    ///
    /// # Errors
    ///
    /// [`SugerirError::Vectorization`] on an empty corpus or a degenerate
    /// vocabulary; never a silent zero-dimension result.
    fn fit(&mut self, ids: &[RecordId], corpus: &[String]) -> Result<FeatureMatrix>;

    /// Encode an out-of-corpus query, when the strategy supports it
    /// (TF-IDF: only after fitting; hashed embeddings: always).
    fn vector_for(&self, text: &str) -> Result<FeatureVector>;
}

/// Configuration-level choice of vectorization strategy.
///
/// Exactly one strategy is active per deployment; the rest of the engine
/// is agnostic to which.
///
/// # Examples
///
/// ```
/// use sugerir::vectorize::VectorizerKind;
///
/// let kind = VectorizerKind::default();
/// assert!(matches!(kind, VectorizerKind::Lexical));
/// let _backend = VectorizerKind::Hashed { dim: 256 }.build();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VectorizerKind {
    /// Sparse TF-IDF over word 1–3-grams.
    Lexical,
    /// Dense signed feature hashing at the given width.
    Hashed {
        /// Embedding width.
        dim: usize,
    },
}

impl VectorizerKind {
    /// Construct the configured backend.
    #[must_use]
    pub fn build(&self) -> Box<dyn Vectorizer + Send + Sync> {
        match self {
            VectorizerKind::Lexical => Box::new(TfidfVectorizer::new()),
            VectorizerKind::Hashed { dim } => Box::new(HashedEmbedder::new().with_dim(*dim)),
        }
    }
}

impl Default for VectorizerKind {
    fn default() -> Self {
        VectorizerKind::Lexical
    }
}

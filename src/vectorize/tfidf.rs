//! Sparse TF-IDF vectorization over word n-grams.

use std::collections::{HashMap, HashSet};

use crate::catalog::RecordId;
use crate::error::{Result, SugerirError};
use crate::vectorize::{FeatureMatrix, FeatureVector, SparseVector, Vectorizer};

/// TF-IDF vectorizer over word 1–3-grams.
///
/// The vocabulary spans every n-gram of the fitted corpus; each document
/// row weights a term by its in-document count times the term's smoothed
/// inverse document frequency `ln((1 + n) / (1 + df)) + 1`. Rows are
/// sparse; dimensionality equals the vocabulary size. There is no
/// incremental update — a changed corpus means refitting.
///
/// Input is expected to be tag text already normalized by the feature
/// builder, so tokenization here is plain whitespace splitting.
///
/// # Examples
///
/// ```
/// use sugerir::vectorize::{TfidfVectorizer, Vectorizer};
///
/// let corpus = vec![
///     "space opera adventure".to_string(),
///     "space detective noir".to_string(),
/// ];
///
/// let mut vectorizer = TfidfVectorizer::new();
/// let matrix = vectorizer.fit(&[0, 1], &corpus).unwrap();
///
/// assert_eq!(matrix.len(), 2);
/// assert_eq!(matrix.dim(), vectorizer.vocabulary_size());
/// ```
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    ngram_range: (usize, usize),
    vocabulary: HashMap<String, u32>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Vectorizer with the default 1–3-gram range.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ngram_range: (1, 3),
            vocabulary: HashMap::new(),
            idf: Vec::new(),
        }
    }

    /// Set the n-gram range (both bounds clamped to at least 1).
    #[must_use]
    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        let min_n = min_n.max(1);
        self.ngram_range = (min_n, max_n.max(min_n));
        self
    }

    /// Number of terms in the fitted vocabulary (0 before fitting).
    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// All n-grams of one document, in occurrence order.
    fn ngrams(&self, text: &str) -> Vec<String> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let mut terms = Vec::new();
        for n in self.ngram_range.0..=self.ngram_range.1 {
            for window in tokens.windows(n) {
                terms.push(window.join("_"));
            }
        }
        terms
    }

    /// TF-IDF row for one document against the fitted vocabulary.
    fn transform(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<u32, f32> = HashMap::new();
        for term in self.ngrams(text) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let pairs = counts
            .into_iter()
            .map(|(index, count)| (index, count * self.idf[index as usize]))
            .collect();
        SparseVector::from_pairs(pairs)
    }
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Vectorizer for TfidfVectorizer {
    fn fit(&mut self, ids: &[RecordId], corpus: &[String]) -> Result<FeatureMatrix> {
        if corpus.is_empty() {
            return Err(SugerirError::vectorization(
                "cannot fit on an empty corpus",
            ));
        }

        // Document frequency per term
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        for doc in corpus {
            let unique: HashSet<String> = self.ngrams(doc).into_iter().collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            return Err(SugerirError::vectorization(
                "degenerate vocabulary: corpus has no terms",
            ));
        }

        // Alphabetical term order keeps indices deterministic across fits
        let mut terms: Vec<(String, usize)> = doc_freq.into_iter().collect();
        terms.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        let n_docs = corpus.len() as f32;
        self.vocabulary = HashMap::with_capacity(terms.len());
        self.idf = Vec::with_capacity(terms.len());
        for (index, (term, df)) in terms.into_iter().enumerate() {
            self.vocabulary.insert(term, index as u32);
            self.idf.push(((1.0 + n_docs) / (1.0 + df as f32)).ln() + 1.0);
        }

        let rows: Vec<FeatureVector> = corpus
            .iter()
            .map(|doc| FeatureVector::Sparse(self.transform(doc)))
            .collect();

        FeatureMatrix::new(ids.to_vec(), rows, self.vocabulary.len())
    }

    fn vector_for(&self, text: &str) -> Result<FeatureVector> {
        if self.vocabulary.is_empty() {
            return Err(SugerirError::vectorization(
                "vectorizer is not fitted; call fit() first",
            ));
        }
        Ok(FeatureVector::Sparse(self.transform(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(docs: &[&str]) -> Vec<String> {
        docs.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_fit_builds_ngram_vocabulary() {
        let mut vectorizer = TfidfVectorizer::new();
        vectorizer
            .fit(&[0], &corpus(&["the quick brown fox"]))
            .unwrap();
        // 4 unigrams + 3 bigrams + 2 trigrams
        assert_eq!(vectorizer.vocabulary_size(), 9);
    }

    #[test]
    fn test_unigram_only_range() {
        let mut vectorizer = TfidfVectorizer::new().with_ngram_range(1, 1);
        vectorizer
            .fit(&[0, 1], &corpus(&["cat dog", "dog bird bird"]))
            .unwrap();
        assert_eq!(vectorizer.vocabulary_size(), 3);
    }

    #[test]
    fn test_empty_corpus_is_error() {
        let mut vectorizer = TfidfVectorizer::new();
        let err = vectorizer.fit(&[], &[]).unwrap_err();
        assert!(matches!(err, SugerirError::Vectorization { .. }));
    }

    #[test]
    fn test_all_empty_documents_is_error() {
        let mut vectorizer = TfidfVectorizer::new();
        let err = vectorizer.fit(&[0, 1], &corpus(&["", ""])).unwrap_err();
        assert!(matches!(err, SugerirError::Vectorization { .. }));
        assert!(err.to_string().contains("degenerate"));
    }

    #[test]
    fn test_idf_positive_and_rarity_weighted() {
        let mut vectorizer = TfidfVectorizer::new().with_ngram_range(1, 1);
        let matrix = vectorizer
            .fit(&[0, 1], &corpus(&["shared rare", "shared common"]))
            .unwrap();
        assert_eq!(matrix.len(), 2);
        // Every idf value is positive under the smoothed formula
        assert!(vectorizer.idf.iter().all(|&v| v > 0.0));
        // A term in every document weighs less than a term in one
        let shared = vectorizer.vocabulary["shared"] as usize;
        let rare = vectorizer.vocabulary["rare"] as usize;
        assert!(vectorizer.idf[rare] > vectorizer.idf[shared]);
    }

    #[test]
    fn test_deterministic_across_fits() {
        let docs = corpus(&["alpha beta gamma", "beta gamma delta", "gamma delta alpha"]);
        let mut first = TfidfVectorizer::new();
        let mut second = TfidfVectorizer::new();
        let m1 = first.fit(&[0, 1, 2], &docs).unwrap();
        let m2 = second.fit(&[0, 1, 2], &docs).unwrap();
        assert_eq!(m1, m2);
    }

    #[test]
    fn test_vector_for_requires_fit() {
        let vectorizer = TfidfVectorizer::new();
        assert!(vectorizer.vector_for("anything").is_err());
    }

    #[test]
    fn test_vector_for_out_of_vocabulary_terms_ignored() {
        let mut vectorizer = TfidfVectorizer::new().with_ngram_range(1, 1);
        vectorizer.fit(&[0], &corpus(&["known words"])).unwrap();
        let v = vectorizer.vector_for("unknown token").unwrap();
        assert_eq!(v.norm(), 0.0);
        let v = vectorizer.vector_for("known unknown").unwrap();
        assert!(v.norm() > 0.0);
    }

    #[test]
    fn test_row_ids_carried() {
        let mut vectorizer = TfidfVectorizer::new();
        let matrix = vectorizer
            .fit(&[10, 20], &corpus(&["one doc", "another doc"]))
            .unwrap();
        assert_eq!(matrix.ids(), &[10, 20]);
    }
}

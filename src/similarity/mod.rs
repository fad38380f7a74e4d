//! Cosine similarity and nearest-neighbor extraction.
//!
//! Works on a fitted [`FeatureMatrix`] regardless of which backend
//! produced it. Ranking ties are broken by ascending record id so that a
//! ranking is reproducible across reloads rather than inheriting
//! incidental corpus order.

use rayon::prelude::*;

use crate::catalog::RecordId;
use crate::error::{Result, SugerirError};
use crate::vectorize::{FeatureMatrix, FeatureVector};

/// One ranked neighbor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Row position within the queried matrix.
    pub position: usize,
    /// Stable record id of that row.
    pub id: RecordId,
    /// Cosine similarity to the query.
    pub score: f32,
}

/// Cosine similarity between two feature vectors.
///
/// Zero-norm vectors are orthogonal to everything.
///
/// # Examples
///
/// ```
/// use sugerir::similarity::cosine;
/// use sugerir::vectorize::FeatureVector;
///
/// let a = FeatureVector::Dense(vec![1.0, 2.0, 3.0]);
/// let b = FeatureVector::Dense(vec![2.0, 4.0, 6.0]);
/// assert!((cosine(&a, &b) - 1.0).abs() < 1e-6);
///
/// let zero = FeatureVector::Dense(vec![0.0, 0.0, 0.0]);
/// assert_eq!(cosine(&a, &zero), 0.0);
/// ```
#[must_use]
pub fn cosine(a: &FeatureVector, b: &FeatureVector) -> f32 {
    let denominator = a.norm() * b.norm();
    if denominator == 0.0 {
        return 0.0;
    }
    a.dot(b) / denominator
}

/// Top-k most similar rows to the row at `query`, excluding the query row
/// itself.
///
/// Returns fewer than `k` entries when the rest of the matrix is smaller
/// than `k`.
///
/// # Errors
///
/// [`SugerirError::InvalidParameter`] when `query` is out of bounds.
pub fn top_k(matrix: &FeatureMatrix, query: usize, k: usize) -> Result<Vec<Neighbor>> {
    if query >= matrix.len() {
        return Err(SugerirError::invalid_parameter(
            "query",
            query,
            &format!("row position < {}", matrix.len()),
        ));
    }

    let query_row = matrix.row(query);
    let query_norm = matrix.norm(query);

    let mut neighbors: Vec<Neighbor> = (0..matrix.len())
        .filter(|&position| position != query)
        .map(|position| Neighbor {
            position,
            id: matrix.id_at(position),
            score: scaled_dot(query_row, query_norm, matrix, position),
        })
        .collect();

    rank(&mut neighbors, k);
    Ok(neighbors)
}

/// Top-k most similar rows to an out-of-corpus query vector. No row is
/// excluded.
#[must_use]
pub fn top_k_vector(matrix: &FeatureMatrix, query: &FeatureVector, k: usize) -> Vec<Neighbor> {
    let query_norm = query.norm();
    let mut neighbors: Vec<Neighbor> = (0..matrix.len())
        .map(|position| Neighbor {
            position,
            id: matrix.id_at(position),
            score: scaled_dot(query, query_norm, matrix, position),
        })
        .collect();

    rank(&mut neighbors, k);
    neighbors
}

/// Similarity matrix between two position subsets of one feature matrix:
/// one row per query position, one column per reference position.
///
/// This is the evaluation-mode batch operation: memory is O(m·n), so the
/// caller bounds the query sample size. Rows are independent and computed
/// in parallel; the output is identical to the sequential computation.
#[must_use]
pub fn batch_similarity(
    matrix: &FeatureMatrix,
    queries: &[usize],
    references: &[usize],
) -> Vec<Vec<f32>> {
    queries
        .par_iter()
        .map(|&q| {
            let query_row = matrix.row(q);
            let query_norm = matrix.norm(q);
            references
                .iter()
                .map(|&r| scaled_dot(query_row, query_norm, matrix, r))
                .collect()
        })
        .collect()
}

fn scaled_dot(query: &FeatureVector, query_norm: f32, matrix: &FeatureMatrix, position: usize) -> f32 {
    let denominator = query_norm * matrix.norm(position);
    if denominator == 0.0 {
        return 0.0;
    }
    query.dot(matrix.row(position)) / denominator
}

/// Sort by descending score with ascending id as the tie-break, keep `k`.
fn rank(neighbors: &mut Vec<Neighbor>, k: usize) {
    neighbors.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    neighbors.truncate(k);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorize::FeatureMatrix;

    fn dense_matrix(rows: &[&[f32]]) -> FeatureMatrix {
        let dim = rows[0].len();
        let ids = (0..rows.len() as u32).collect();
        let rows = rows
            .iter()
            .map(|r| FeatureVector::Dense(r.to_vec()))
            .collect();
        FeatureMatrix::new(ids, rows, dim).unwrap()
    }

    #[test]
    fn test_cosine_orthogonal() {
        let a = FeatureVector::Dense(vec![1.0, 0.0]);
        let b = FeatureVector::Dense(vec![0.0, 1.0]);
        assert_eq!(cosine(&a, &b), 0.0);
    }

    #[test]
    fn test_top_k_excludes_query_row() {
        let matrix = dense_matrix(&[&[1.0, 0.0], &[1.0, 0.1], &[0.0, 1.0]]);
        let neighbors = top_k(&matrix, 0, 10).unwrap();
        assert_eq!(neighbors.len(), 2);
        assert!(neighbors.iter().all(|n| n.position != 0));
    }

    #[test]
    fn test_top_k_descending_order() {
        let matrix = dense_matrix(&[&[1.0, 0.0], &[0.0, 1.0], &[1.0, 0.2], &[1.0, 1.0]]);
        let neighbors = top_k(&matrix, 0, 3).unwrap();
        assert_eq!(neighbors[0].position, 2);
        assert_eq!(neighbors[1].position, 3);
        assert_eq!(neighbors[2].position, 1);
        assert!(neighbors[0].score >= neighbors[1].score);
    }

    #[test]
    fn test_top_k_truncates_to_k() {
        let matrix = dense_matrix(&[&[1.0, 0.0], &[1.0, 0.1], &[1.0, 0.2], &[1.0, 0.3]]);
        assert_eq!(top_k(&matrix, 0, 2).unwrap().len(), 2);
    }

    #[test]
    fn test_top_k_out_of_bounds_query() {
        let matrix = dense_matrix(&[&[1.0, 0.0]]);
        assert!(top_k(&matrix, 5, 1).is_err());
    }

    #[test]
    fn test_tie_break_by_ascending_id() {
        // Rows 1 and 2 are identical, so they tie exactly
        let matrix = dense_matrix(&[&[1.0, 0.0], &[1.0, 1.0], &[1.0, 1.0]]);
        let neighbors = top_k(&matrix, 0, 2).unwrap();
        assert_eq!(neighbors[0].id, 1);
        assert_eq!(neighbors[1].id, 2);
        assert_eq!(neighbors[0].score, neighbors[1].score);
    }

    #[test]
    fn test_zero_norm_rows_score_zero() {
        let matrix = dense_matrix(&[&[1.0, 0.0], &[0.0, 0.0]]);
        let neighbors = top_k(&matrix, 0, 1).unwrap();
        assert_eq!(neighbors[0].score, 0.0);
    }

    #[test]
    fn test_top_k_vector_does_not_exclude() {
        let matrix = dense_matrix(&[&[1.0, 0.0], &[0.0, 1.0]]);
        let query = FeatureVector::Dense(vec![1.0, 0.0]);
        let neighbors = top_k_vector(&matrix, &query, 2);
        assert_eq!(neighbors.len(), 2);
        assert_eq!(neighbors[0].position, 0);
        assert!((neighbors[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_batch_matches_single_queries() {
        let matrix = dense_matrix(&[
            &[1.0, 0.0, 0.0],
            &[0.5, 0.5, 0.0],
            &[0.0, 1.0, 0.0],
            &[0.0, 0.0, 1.0],
        ]);
        let queries = vec![0, 2];
        let references = vec![1, 3];
        let sim = batch_similarity(&matrix, &queries, &references);

        assert_eq!(sim.len(), 2);
        assert_eq!(sim[0].len(), 2);
        for (row, &q) in sim.iter().zip(&queries) {
            for (value, &r) in row.iter().zip(&references) {
                let expected = cosine(matrix.row(q), matrix.row(r));
                assert!((value - expected).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_sparse_rows_supported() {
        use crate::vectorize::SparseVector;

        let rows = vec![
            FeatureVector::Sparse(SparseVector::from_pairs(vec![(0, 1.0), (1, 1.0)])),
            FeatureVector::Sparse(SparseVector::from_pairs(vec![(0, 1.0)])),
            FeatureVector::Sparse(SparseVector::from_pairs(vec![(2, 1.0)])),
        ];
        let matrix = FeatureMatrix::new(vec![0, 1, 2], rows, 3).unwrap();
        let neighbors = top_k(&matrix, 0, 2).unwrap();
        assert_eq!(neighbors[0].id, 1);
        assert!(neighbors[0].score > neighbors[1].score);
        assert_eq!(neighbors[1].score, 0.0);
    }
}

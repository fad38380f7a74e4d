//! Offline evaluation of recommendation quality.
//!
//! The corpus is partitioned into train and test subsets with a seeded
//! shuffle. Each test record's rating is predicted as the
//! similarity-weighted mean of its k nearest rated train neighbors, and
//! the predictions are scored both as a thresholded classification
//! (accuracy, precision, recall, F1) and as a regression (MSE, RMSE).
//! A fixed seed makes two runs over the same corpus produce identical
//! metrics.

pub mod metrics;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

use crate::catalog::Catalog;
use crate::error::{Result, SugerirError};
use crate::recommend::Recommender;
use crate::similarity;
use crate::vectorize::FeatureMatrix;

/// Evaluation parameters with the pipeline's defaults.
///
/// # Examples
///
/// ```
/// use sugerir::evaluate::EvaluationConfig;
///
/// let config = EvaluationConfig::new().with_k(5).with_threshold(6.0);
/// assert_eq!(config.k, 5);
/// assert_eq!(config.test_size, 0.2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationConfig {
    /// Fraction of the corpus held out for testing.
    pub test_size: f32,
    /// Neighbor count for rating prediction.
    pub k: usize,
    /// Rating cutoff separating positive from negative labels.
    pub threshold: f32,
    /// Shuffle seed; fixing it makes the split reproducible.
    pub seed: u64,
}

impl EvaluationConfig {
    /// The default 80/20 split, 10 neighbors, threshold 5.0, seed 42.
    #[must_use]
    pub fn new() -> Self {
        Self {
            test_size: 0.2,
            k: 10,
            threshold: 5.0,
            seed: 42,
        }
    }

    /// Set the held-out fraction.
    #[must_use]
    pub fn with_test_size(mut self, test_size: f32) -> Self {
        self.test_size = test_size;
        self
    }

    /// Set the neighbor count.
    #[must_use]
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Set the classification threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the shuffle seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Disjoint train/test row positions for one evaluation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationSplit {
    /// Training row positions.
    pub train: Vec<usize>,
    /// Held-out row positions.
    pub test: Vec<usize>,
}

/// All evaluation metrics of one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationReport {
    /// Thresholded classification accuracy.
    pub accuracy: f32,
    /// Thresholded precision.
    pub precision: f32,
    /// Thresholded recall.
    pub recall: f32,
    /// Thresholded F1 score.
    pub f1: f32,
    /// Mean squared rating error.
    pub mse: f32,
    /// Root mean squared rating error.
    pub rmse: f32,
}

/// Partition `0..n` into disjoint train/test position sets.
///
/// # Errors
///
/// [`SugerirError::InvalidParameter`] when `test_size` is outside (0, 1)
/// or either side of the split would be empty.
///
/// # Examples
///
/// ```
/// use sugerir::evaluate::train_test_split;
///
/// let split = train_test_split(10, 0.2, 42).unwrap();
/// assert_eq!(split.train.len(), 8);
/// assert_eq!(split.test.len(), 2);
///
/// // Same seed, same split
/// assert_eq!(split, train_test_split(10, 0.2, 42).unwrap());
/// ```
pub fn train_test_split(n: usize, test_size: f32, seed: u64) -> Result<EvaluationSplit> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(SugerirError::invalid_parameter(
            "test_size",
            test_size,
            "0 < test_size < 1",
        ));
    }

    let n_test = (n as f32 * test_size).round() as usize;
    let n_train = n.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(SugerirError::invalid_parameter(
            "test_size",
            test_size,
            &format!("a non-empty split of {n} records"),
        ));
    }

    let mut positions: Vec<usize> = (0..n).collect();
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    positions.shuffle(&mut rng);

    let test = positions.split_off(n_train);
    Ok(EvaluationSplit {
        train: positions,
        test,
    })
}

/// Evaluate rating prediction over a fitted corpus.
///
/// Train neighbors without a rating carry no signal and are excluded from
/// the pool; test records without a true rating are discarded before
/// metrics. When a test record's neighbor similarities sum to zero, the
/// prediction falls back to the plain mean of the neighbors' ratings.
///
/// # Errors
///
/// [`SugerirError::InvalidParameter`] on a bad configuration,
/// [`SugerirError::Other`] when no rated train records exist.
pub fn evaluate(
    catalog: &Catalog,
    matrix: &FeatureMatrix,
    config: &EvaluationConfig,
) -> Result<EvaluationReport> {
    if config.k == 0 {
        return Err(SugerirError::invalid_parameter("k", config.k, "k >= 1"));
    }

    let split = train_test_split(matrix.len(), config.test_size, config.seed)?;

    let rating_of = |position: usize| -> Option<f32> {
        catalog
            .get(matrix.id_at(position))
            .and_then(|record| record.vote_average)
    };

    let rated_train: Vec<usize> = split
        .train
        .iter()
        .copied()
        .filter(|&position| rating_of(position).is_some())
        .collect();
    if rated_train.is_empty() {
        return Err(SugerirError::Other(
            "evaluation requires rated training records".to_string(),
        ));
    }

    // The m×n batch; memory is bounded by the caller's sample size
    let sim = similarity::batch_similarity(matrix, &split.test, &rated_train);

    let mut actual = Vec::new();
    let mut predicted = Vec::new();
    for (row, &test_position) in sim.iter().zip(&split.test) {
        let Some(true_rating) = rating_of(test_position) else {
            continue;
        };
        predicted.push(predict_rating(row, &rated_train, config.k, &rating_of));
        actual.push(true_rating);
    }

    info!(
        train = rated_train.len(),
        test = actual.len(),
        k = config.k,
        "evaluated rating predictions"
    );

    let actual_bin: Vec<bool> = actual.iter().map(|&r| r > config.threshold).collect();
    let predicted_bin: Vec<bool> = predicted.iter().map(|&r| r > config.threshold).collect();

    Ok(EvaluationReport {
        accuracy: metrics::accuracy(&predicted_bin, &actual_bin),
        precision: metrics::precision(&predicted_bin, &actual_bin),
        recall: metrics::recall(&predicted_bin, &actual_bin),
        f1: metrics::f1_score(&predicted_bin, &actual_bin),
        mse: metrics::mse(&predicted, &actual),
        rmse: metrics::rmse(&predicted, &actual),
    })
}

/// Similarity-weighted mean of the k nearest neighbors' ratings, with the
/// unweighted mean as the zero-similarity fallback.
fn predict_rating(
    similarities: &[f32],
    train_positions: &[usize],
    k: usize,
    rating_of: &dyn Fn(usize) -> Option<f32>,
) -> f32 {
    let mut order: Vec<usize> = (0..similarities.len()).collect();
    order.sort_by(|&a, &b| {
        similarities[b]
            .partial_cmp(&similarities[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| train_positions[a].cmp(&train_positions[b]))
    });
    order.truncate(k);

    let mut sim_sum = 0.0;
    let mut weighted_sum = 0.0;
    let mut rating_sum = 0.0;
    for &column in &order {
        // The pool is pre-filtered to rated records
        let rating = rating_of(train_positions[column]).unwrap_or(0.0);
        sim_sum += similarities[column];
        weighted_sum += similarities[column] * rating;
        rating_sum += rating;
    }

    if sim_sum == 0.0 {
        rating_sum / order.len() as f32
    } else {
        weighted_sum / sim_sum
    }
}

impl Recommender {
    /// Evaluate this recommender's fitted corpus.
    pub fn evaluate(&self, config: &EvaluationConfig) -> Result<EvaluationReport> {
        evaluate(self.catalog(), self.matrix(), config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ContentRecord, ContentType};
    use crate::vectorize::VectorizerKind;

    fn rated_catalog(n: usize) -> Catalog {
        let plots = [
            "a detective hunts a killer through the rainy city",
            "a detective chases a thief across the old city",
            "a wizard studies ancient spells in a tower",
            "a wizard battles a dragon over a mountain keep",
            "a crew explores a derelict ship near saturn",
            "a crew survives a breach on a mars station",
        ];
        let records = (0..n)
            .map(|i| {
                let content_type = if i % 2 == 0 {
                    ContentType::Movie
                } else {
                    ContentType::Book
                };
                ContentRecord::new(i as u32, format!("Title {i}"), content_type)
                    .with_plot(plots[i % plots.len()])
                    .with_vote_average(4.0 + (i % 5) as f32)
            })
            .collect();
        Catalog::from_records(records)
    }

    fn fitted(n: usize) -> Recommender {
        Recommender::new(rated_catalog(n), &VectorizerKind::Lexical).unwrap()
    }

    #[test]
    fn test_split_is_disjoint_and_complete() {
        let split = train_test_split(20, 0.25, 7).unwrap();
        assert_eq!(split.train.len(), 15);
        assert_eq!(split.test.len(), 5);
        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_rejects_bad_test_size() {
        assert!(train_test_split(10, 0.0, 1).is_err());
        assert!(train_test_split(10, 1.0, 1).is_err());
        assert!(train_test_split(10, -0.5, 1).is_err());
    }

    #[test]
    fn test_split_rejects_empty_side() {
        assert!(train_test_split(1, 0.2, 1).is_err());
    }

    #[test]
    fn test_split_seed_reproducible() {
        let a = train_test_split(50, 0.2, 42).unwrap();
        let b = train_test_split(50, 0.2, 42).unwrap();
        assert_eq!(a, b);
        let c = train_test_split(50, 0.2, 43).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_evaluate_idempotent_for_fixed_seed() {
        let rec = fitted(24);
        let config = EvaluationConfig::new().with_k(3);
        let first = rec.evaluate(&config).unwrap();
        let second = rec.evaluate(&config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_evaluate_rejects_zero_k() {
        let rec = fitted(12);
        let err = rec.evaluate(&EvaluationConfig::new().with_k(0)).unwrap_err();
        assert!(matches!(err, SugerirError::InvalidParameter { .. }));
    }

    #[test]
    fn test_predictions_within_rating_domain() {
        let rec = fitted(24);
        let report = rec.evaluate(&EvaluationConfig::new().with_k(3)).unwrap();
        // Ratings span 4..=8, so squared error can never exceed the range
        assert!(report.mse <= 16.0);
        assert!(report.rmse <= 4.0);
        for metric in [report.accuracy, report.precision, report.recall, report.f1] {
            assert!((0.0..=1.0).contains(&metric));
        }
    }

    #[test]
    fn test_zero_similarity_falls_back_to_mean() {
        let ratings = |position: usize| -> Option<f32> { Some([2.0, 4.0, 6.0][position]) };
        let similarities = vec![0.0, 0.0, 0.0];
        let predicted = predict_rating(&similarities, &[0, 1, 2], 3, &ratings);
        assert_eq!(predicted, 4.0);
    }

    #[test]
    fn test_weighted_prediction() {
        let ratings = |position: usize| -> Option<f32> { Some([10.0, 0.0][position]) };
        let similarities = vec![0.75, 0.25];
        let predicted = predict_rating(&similarities, &[0, 1], 2, &ratings);
        assert_eq!(predicted, 7.5);
    }

    #[test]
    fn test_unrated_records_excluded() {
        let mut records: Vec<ContentRecord> = rated_catalog(12).records().to_vec();
        // Strip ratings from a third of the corpus
        for record in records.iter_mut().step_by(3) {
            record.vote_average = None;
        }
        let rec = Recommender::new(Catalog::from_records(records), &VectorizerKind::Lexical)
            .unwrap();
        let report = rec.evaluate(&EvaluationConfig::new().with_k(2)).unwrap();
        assert!(report.mse.is_finite());
        assert!(report.rmse.is_finite());
    }
}

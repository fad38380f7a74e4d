//! Type-balanced selection over a raw similarity ranking.

use crate::catalog::ContentType;
use crate::recommend::Recommendation;

/// Rebalance a ranked list so books and movies appear in equal numbers.
///
/// The list is partitioned by content type with rank order preserved
/// inside each partition; each type then contributes its first
/// `min(available_books, available_movies, min_per_type)` entries, books
/// first. The guarantee is *equal* counts per type, capped by
/// availability — a single trending type must not crowd out a scarce one.
///
/// # Examples
///
/// ```
/// use sugerir::catalog::ContentType;
/// use sugerir::recommend::{balance, Recommendation};
///
/// let rec = |title: &str, t| Recommendation {
///     title: title.to_string(),
///     content_type: t,
///     score: 0.0,
/// };
/// let ranked = vec![
///     rec("m1", ContentType::Movie),
///     rec("m2", ContentType::Movie),
///     rec("b1", ContentType::Book),
///     rec("m3", ContentType::Movie),
/// ];
///
/// let balanced = balance(&ranked, 2);
/// // Only one book is available, so movies are capped to one as well
/// assert_eq!(balanced.len(), 2);
/// assert_eq!(balanced[0].title, "b1");
/// assert_eq!(balanced[1].title, "m1");
/// ```
#[must_use]
pub fn balance(ranked: &[Recommendation], min_per_type: usize) -> Vec<Recommendation> {
    let books: Vec<&Recommendation> = ranked
        .iter()
        .filter(|r| r.content_type == ContentType::Book)
        .collect();
    let movies: Vec<&Recommendation> = ranked
        .iter()
        .filter(|r| r.content_type == ContentType::Movie)
        .collect();

    let take = books.len().min(movies.len()).min(min_per_type);

    books
        .into_iter()
        .take(take)
        .chain(movies.into_iter().take(take))
        .cloned()
        .collect()
}

//! The recommendation engine service.
//!
//! [`Recommender`] owns the loaded catalog, the derived tag corpus, and
//! the fitted feature matrix, and exposes the query operations on top of
//! them. Callers hold the service by reference instead of reaching into
//! ambient module state, and a corpus refresh is a new `Recommender`.

pub mod balance;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cache::{CachedRecord, VectorCache};
use crate::catalog::{Catalog, ContentType, SourceTable, TitleMatcher};
use crate::error::{Result, SugerirError};
use crate::similarity;
use crate::text::TagBuilder;
use crate::vectorize::{FeatureMatrix, VectorizerKind};

pub use balance::balance;

/// Raw ranking depth per requested balanced slot: the similarity list is
/// oversampled before balancing so the scarcer type has entries to draw
/// from.
pub const OVERSAMPLE_FACTOR: usize = 20;

/// One recommended title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Title of the recommended record.
    pub title: String,
    /// Its content type.
    pub content_type: ContentType,
    /// Cosine similarity to the query record.
    pub score: f32,
}

/// Content-based recommendation engine over one fitted corpus.
///
/// # Examples
///
/// ```
/// use sugerir::catalog::{Catalog, ContentRecord, ContentType};
/// use sugerir::recommend::Recommender;
/// use sugerir::vectorize::VectorizerKind;
///
/// let catalog = Catalog::from_records(vec![
///     ContentRecord::new(0, "Alien", ContentType::Movie)
///         .with_plot("Crew of a space freighter hunted by a creature")
///         .with_genres(["science fiction", "horror"]),
///     ContentRecord::new(1, "Aliens", ContentType::Movie)
///         .with_plot("Marines return to the creature infested space colony")
///         .with_genres(["science fiction", "action"]),
///     ContentRecord::new(2, "Emma", ContentType::Book)
///         .with_plot("Matchmaking in a quiet regency village")
///         .with_genres(["romance"]),
/// ]);
///
/// let recommender = Recommender::new(catalog, &VectorizerKind::Lexical).unwrap();
/// let results = recommender.recommend("Alien", 2);
///
/// assert_eq!(results.len(), 2);
/// assert_eq!(results[0].title, "Aliens");
/// // The query record itself never appears
/// assert!(results.iter().all(|r| r.title != "Alien"));
/// ```
#[derive(Debug)]
pub struct Recommender {
    catalog: Catalog,
    tags: Vec<String>,
    matrix: FeatureMatrix,
    matcher: TitleMatcher,
}

impl Recommender {
    /// Run the full pipeline (tag building, fitting) over a catalog.
    ///
    /// # Errors
    ///
    /// [`SugerirError::Vectorization`] when the catalog is empty or
    /// produces a degenerate vocabulary.
    pub fn new(catalog: Catalog, kind: &VectorizerKind) -> Result<Self> {
        let tags = TagBuilder::new().build_corpus(&catalog)?;
        let ids: Vec<_> = catalog.records().iter().map(|r| r.id).collect();

        let mut backend = kind.build();
        let matrix = backend.fit(&ids, &tags)?;
        info!(
            records = catalog.len(),
            dim = matrix.dim(),
            "fitted recommendation corpus"
        );

        Ok(Self {
            catalog,
            tags,
            matrix,
            matcher: TitleMatcher::new(),
        })
    }

    /// Assemble a recommender from previously derived parts (a cache
    /// hit), skipping tag building and fitting.
    ///
    /// # Errors
    ///
    /// [`SugerirError::Serialization`] when the matrix rows do not pair
    /// one-to-one with the catalog records.
    pub fn from_parts(catalog: Catalog, tags: Vec<String>, matrix: FeatureMatrix) -> Result<Self> {
        if tags.len() != catalog.len() || !matrix.is_aligned_with(&catalog) {
            return Err(SugerirError::Serialization(
                "vector rows are not aligned with the catalog records".to_string(),
            ));
        }
        Ok(Self {
            catalog,
            tags,
            matrix,
            matcher: TitleMatcher::new(),
        })
    }

    /// Load sources through the vector cache: reuse the last saved
    /// generation when present, otherwise run the pipeline and persist it.
    pub fn from_cache_or_load(
        sources: &[SourceTable],
        kind: &VectorizerKind,
        cache: &VectorCache,
    ) -> Result<Self> {
        if let Some((cached, matrix)) = cache.load()? {
            info!(records = cached.len(), "vector cache hit");
            let mut records = Vec::with_capacity(cached.len());
            let mut tags = Vec::with_capacity(cached.len());
            for entry in cached {
                records.push(entry.record);
                tags.push(entry.tags);
            }
            return Self::from_parts(Catalog::from_records(records), tags, matrix);
        }

        info!("vector cache miss; running the full pipeline");
        let recommender = Self::new(Catalog::load(sources)?, kind)?;
        cache.save(&recommender.cached_records(), &recommender.matrix)?;
        Ok(recommender)
    }

    /// Replace the title-matching policy.
    #[must_use]
    pub fn with_title_matcher(mut self, matcher: TitleMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// The owned catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The fitted feature matrix.
    #[must_use]
    pub fn matrix(&self) -> &FeatureMatrix {
        &self.matrix
    }

    /// Derived tag text, in catalog order.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Catalog records paired with their tags, as persisted by the cache.
    #[must_use]
    pub fn cached_records(&self) -> Vec<CachedRecord> {
        self.catalog
            .records()
            .iter()
            .zip(&self.tags)
            .map(|(record, tags)| CachedRecord {
                record: record.clone(),
                tags: tags.clone(),
            })
            .collect()
    }

    /// Top-k titles most similar to the given one.
    ///
    /// An unresolved title is recovered locally: it logs a warning and
    /// returns an empty list. The query record itself is never included,
    /// and at most `k` entries come back.
    #[must_use]
    pub fn recommend(&self, title: &str, k: usize) -> Vec<Recommendation> {
        let Some(resolved) = self.matcher.resolve(&self.catalog, title) else {
            warn!(title, "query title not found in corpus");
            return Vec::new();
        };
        let Some(position) = self.matrix.position_of(resolved.id) else {
            warn!(title, id = resolved.id, "no vector row for resolved title");
            return Vec::new();
        };

        // Position validity is guaranteed by the alignment invariant
        let neighbors = match similarity::top_k(&self.matrix, position, k) {
            Ok(neighbors) => neighbors,
            Err(_) => return Vec::new(),
        };

        neighbors
            .into_iter()
            .filter_map(|n| self.catalog.get(n.id).map(|record| Recommendation {
                title: record.title.clone(),
                content_type: record.content_type,
                score: n.score,
            }))
            .collect()
    }

    /// Type-balanced recommendations: an oversampled raw ranking,
    /// rebalanced to equal book/movie counts capped by availability.
    #[must_use]
    pub fn balanced_recommend(&self, title: &str, min_per_type: usize) -> Vec<Recommendation> {
        let raw = self.recommend(title, min_per_type.saturating_mul(OVERSAMPLE_FACTOR));
        balance(&raw, min_per_type)
    }
}

//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use sugerir::prelude::*;
//! ```

pub use crate::cache::VectorCache;
pub use crate::catalog::{
    Catalog, ContentRecord, ContentType, RatingScale, RecordId, SourceTable, TitleMatcher,
};
pub use crate::error::{Result, SugerirError};
pub use crate::evaluate::{EvaluationConfig, EvaluationReport};
pub use crate::recommend::{Recommendation, Recommender};
pub use crate::vectorize::{FeatureMatrix, FeatureVector, VectorizerKind};

//! Sugerir: content-based recommendations across mixed book/movie
//! catalogs.
//!
//! The engine normalizes heterogeneous source tables into one canonical
//! catalog, derives a tag text per record, vectorizes the corpus (sparse
//! TF-IDF or dense hashed embeddings), ranks records by cosine
//! similarity, balances results across content types, and evaluates
//! rating prediction offline. HTTP routing, account persistence, and
//! dataset scraping are external collaborators: they hand the engine a
//! content table and consume ranked titles.
//!
//! # Quick Start
//!
//! ```
//! use sugerir::prelude::*;
//!
//! let catalog = Catalog::from_records(vec![
//!     ContentRecord::new(0, "The Hobbit", ContentType::Book)
//!         .with_author("J. R. R. Tolkien")
//!         .with_plot("A hobbit joins dwarves to reclaim a dragon hoard")
//!         .with_genres(["fantasy", "adventure"]),
//!     ContentRecord::new(1, "The Fellowship of the Ring", ContentType::Movie)
//!         .with_plot("A hobbit carries a ring of power toward a dark land")
//!         .with_genres(["fantasy", "adventure"]),
//!     ContentRecord::new(2, "Gone Girl", ContentType::Book)
//!         .with_plot("A wife disappears and a marriage unravels")
//!         .with_genres(["thriller"]),
//! ]);
//!
//! let recommender = Recommender::new(catalog, &VectorizerKind::Lexical).unwrap();
//! let similar = recommender.recommend("The Hobbit", 2);
//!
//! assert_eq!(similar[0].title, "The Fellowship of the Ring");
//! ```
//!
//! # Modules
//!
//! - [`catalog`]: source-table normalization and title resolution
//! - [`text`]: tag-text building (tokenize, stop words, stemming)
//! - [`vectorize`]: TF-IDF and hashed-embedding backends
//! - [`similarity`]: cosine similarity and top-k extraction
//! - [`recommend`]: the recommender service and type balancing
//! - [`evaluate`]: train/test rating-prediction evaluation
//! - [`cache`]: persisted corpus + vector artifacts
//! - [`error`]: the crate error type

pub mod cache;
pub mod catalog;
pub mod error;
pub mod evaluate;
pub mod prelude;
pub mod recommend;
pub mod similarity;
pub mod text;
pub mod vectorize;

pub use error::{Result, SugerirError};

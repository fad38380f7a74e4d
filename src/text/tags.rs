//! Tag-text construction for catalog records.
//!
//! A record's "tags" are the single normalized string that feeds the
//! vectorization backend: author, plot, content-type label, and flattened
//! genres, run through the lowercase → tokenize → stop-word → stem
//! pipeline and rejoined with single spaces. Missing optional fields
//! contribute an empty string, never an error.

use rayon::prelude::*;

use crate::catalog::{Catalog, ContentRecord};
use crate::error::Result;
use crate::text::{PorterStemmer, Stemmer, StopWordsFilter, Tokenizer, WordTokenizer};

/// Builds normalized tag text from catalog records.
///
/// # Examples
///
/// ```
/// use sugerir::catalog::{ContentRecord, ContentType};
/// use sugerir::text::TagBuilder;
///
/// let record = ContentRecord::new(0, "Heat", ContentType::Movie)
///     .with_author("Michael Mann")
///     .with_genres(["crime", "thriller"]);
///
/// let builder = TagBuilder::new();
/// let tags = builder.build_tags(&record).unwrap();
/// assert!(tags.contains("movi"));
/// assert!(tags.contains("crime"));
/// assert!(!tags.contains("Michael")); // lowercased
/// ```
#[derive(Debug, Clone)]
pub struct TagBuilder {
    tokenizer: WordTokenizer,
    stop_words: StopWordsFilter,
    stemmer: PorterStemmer,
}

impl TagBuilder {
    /// Create a builder with the default English configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tokenizer: WordTokenizer::new(),
            stop_words: StopWordsFilter::english(),
            stemmer: PorterStemmer::new(),
        }
    }

    /// Use a custom stop-word filter.
    #[must_use]
    pub fn with_stop_words(mut self, stop_words: StopWordsFilter) -> Self {
        self.stop_words = stop_words;
        self
    }

    /// Run the normalization pipeline over one piece of raw text.
    ///
    /// Deterministic for a fixed input and configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use sugerir::text::TagBuilder;
    ///
    /// let builder = TagBuilder::new();
    /// let out = builder.normalize("The Haunting of Hill House!").unwrap();
    /// assert_eq!(out, "haunt hill hous");
    /// ```
    pub fn normalize(&self, text: &str) -> Result<String> {
        let tokens = self.tokenizer.tokenize(&text.to_lowercase())?;
        let kept = self.stop_words.retain(&tokens);
        let stemmed = self.stemmer.stem_tokens(&kept)?;
        Ok(stemmed.join(" "))
    }

    /// Build the tag string for a single record.
    ///
    /// Concatenates author, plot, content-type label, and genres; absent
    /// fields contribute nothing.
    pub fn build_tags(&self, record: &ContentRecord) -> Result<String> {
        let mut parts: Vec<&str> = Vec::with_capacity(3 + record.genres.len());
        if let Some(author) = record.author.as_deref() {
            parts.push(author);
        }
        if let Some(plot) = record.plot.as_deref() {
            parts.push(plot);
        }
        parts.push(record.content_type.as_str());
        for genre in &record.genres {
            parts.push(genre);
        }

        self.normalize(&parts.join(" "))
    }

    /// Build tags for every record of a catalog, in catalog order.
    ///
    /// Each record's tags depend only on that record, so the work is
    /// distributed across threads without affecting the output.
    pub fn build_corpus(&self, catalog: &Catalog) -> Result<Vec<String>> {
        catalog
            .records()
            .par_iter()
            .map(|record| self.build_tags(record))
            .collect()
    }
}

impl Default for TagBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//! Stop-word filtering for tag-text preprocessing.
//!
//! Stop words are common words ("the", "is", "at") that carry little
//! discriminating signal between catalog entries and are removed before
//! vectorization. Matching is case-insensitive and O(1) per token.

use std::collections::HashSet;

/// Stop-word filter backed by a `HashSet` of lowercase words.
///
/// # Examples
///
/// ```
/// use sugerir::text::stopwords::StopWordsFilter;
///
/// let filter = StopWordsFilter::english();
/// assert!(filter.is_stop_word("the"));
/// assert!(filter.is_stop_word("The"));
/// assert!(!filter.is_stop_word("heist"));
/// ```
#[derive(Debug, Clone)]
pub struct StopWordsFilter {
    stop_words: HashSet<String>,
}

impl StopWordsFilter {
    /// Create a filter from a custom word list (stored lowercase).
    ///
    /// # Examples
    ///
    /// ```
    /// use sugerir::text::stopwords::StopWordsFilter;
    ///
    /// let filter = StopWordsFilter::new(["foo", "bar"]);
    /// assert!(filter.is_stop_word("FOO"));
    /// assert!(!filter.is_stop_word("baz"));
    /// ```
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stop_words = words
            .into_iter()
            .map(|s| s.as_ref().to_lowercase())
            .collect();

        Self { stop_words }
    }

    /// Create a filter with the default English stop-word list.
    #[must_use]
    pub fn english() -> Self {
        Self::new(ENGLISH_STOP_WORDS)
    }

    /// Check whether a single token is a stop word (case-insensitive).
    #[must_use]
    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(&token.to_lowercase())
    }

    /// Retain the non-stop-word tokens of a list, preserving order.
    ///
    /// # Examples
    ///
    /// ```
    /// use sugerir::text::stopwords::StopWordsFilter;
    ///
    /// let filter = StopWordsFilter::english();
    /// let tokens = vec!["the", "last", "of", "summer"];
    /// assert_eq!(filter.retain(&tokens), vec!["last", "summer"]);
    /// ```
    pub fn retain<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<String> {
        tokens
            .iter()
            .map(|t| t.as_ref().to_string())
            .filter(|t| !self.is_stop_word(t))
            .collect()
    }

    /// Number of words in the filter.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stop_words.len()
    }

    /// Whether the filter is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stop_words.is_empty()
    }
}

impl Default for StopWordsFilter {
    fn default() -> Self {
        Self::english()
    }
}

/// English stop words (the NLTK list the original pipeline loads).
pub const ENGLISH_STOP_WORDS: [&str; 181] = [
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such",
    "no", "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can",
    "will", "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain",
    "aren", "couldn", "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn",
    "mustn", "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn", "also", "one",
    "two", "first", "new", "may", "must", "might", "would", "could", "shall", "upon",
    "within", "without", "among", "along", "across", "behind", "beyond", "however",
    "although", "though", "yet", "still", "ever", "never", "always", "often",
];

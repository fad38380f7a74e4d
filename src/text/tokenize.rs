//! Tokenization for tag-text preprocessing.
//!
//! The feature pipeline tokenizes on word boundaries: any run of
//! alphanumeric characters (plus `_`) is a token, everything else is a
//! separator. This matches the behavior of a `\b\w+\b` scan and means
//! punctuation never survives into the vocabulary.

use crate::error::Result;
use crate::text::Tokenizer;

/// Word-boundary tokenizer.
///
/// Non-word characters are separators, never token content. Empty input
/// produces an empty token list.
///
/// # Examples
///
/// ```
/// use sugerir::text::{Tokenizer, tokenize::WordTokenizer};
///
/// let tokenizer = WordTokenizer::new();
///
/// let tokens = tokenizer.tokenize("Hello, world!").unwrap();
/// assert_eq!(tokens, vec!["Hello", "world"]);
///
/// // Apostrophes and hyphens split words
/// let tokens = tokenizer.tokenize("sci-fi don't").unwrap();
/// assert_eq!(tokens, vec!["sci", "fi", "don", "t"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WordTokenizer;

impl WordTokenizer {
    /// Create a new word-boundary tokenizer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn is_word_char(c: char) -> bool {
        c.is_alphanumeric() || c == '_'
    }
}

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let tokens: Vec<String> = text
            .split(|c| !Self::is_word_char(c))
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect();

        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_tokenization() {
        let tokenizer = WordTokenizer::new();
        let tokens = tokenizer.tokenize("the quick brown fox").unwrap();
        assert_eq!(tokens, vec!["the", "quick", "brown", "fox"]);
    }

    #[test]
    fn test_punctuation_is_separator() {
        let tokenizer = WordTokenizer::new();
        let tokens = tokenizer.tokenize("Crime, Drama; Thriller.").unwrap();
        assert_eq!(tokens, vec!["Crime", "Drama", "Thriller"]);
    }

    #[test]
    fn test_digits_kept() {
        let tokenizer = WordTokenizer::new();
        let tokens = tokenizer.tokenize("Despicable Me 4 (2024)").unwrap();
        assert_eq!(tokens, vec!["Despicable", "Me", "4", "2024"]);
    }

    #[test]
    fn test_empty_input() {
        let tokenizer = WordTokenizer::new();
        let tokens = tokenizer.tokenize("").unwrap();
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_only_separators() {
        let tokenizer = WordTokenizer::new();
        let tokens = tokenizer.tokenize("--- ... !!!").unwrap();
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_unicode_words() {
        let tokenizer = WordTokenizer::new();
        let tokens = tokenizer.tokenize("Amélie à Montmartre").unwrap();
        assert_eq!(tokens, vec!["Amélie", "à", "Montmartre"]);
    }
}

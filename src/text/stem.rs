//! Suffix-stripping stemmer for tag-text normalization.
//!
//! Reduces tokens to a common root form so that "haunting", "haunted" and
//! "haunts" all land on the same vocabulary entry. A simplified Porter
//! stemmer is sufficient here; the vocabulary only has to collapse
//! inflections consistently, not produce dictionary lemmas.
//!
//! # References
//!
//! Porter, M.F. (1980). "An algorithm for suffix stripping."
//! Program, 14(3), 130-137.

use crate::error::Result;

/// Trait for stemming algorithms.
///
/// # Examples
///
/// ```
/// use sugerir::text::stem::{Stemmer, PorterStemmer};
///
/// let stemmer = PorterStemmer::new();
/// assert_eq!(stemmer.stem("running").unwrap(), "run");
/// ```
pub trait Stemmer {
    /// Stem a single word to its root form.
    fn stem(&self, word: &str) -> Result<String>;

    /// Stem a list of tokens, preserving order.
    ///
    /// # Examples
    ///
    /// ```
    /// use sugerir::text::stem::{Stemmer, PorterStemmer};
    ///
    /// let stemmer = PorterStemmer::new();
    /// let stemmed = stemmer.stem_tokens(&["running", "flies"]).unwrap();
    /// assert_eq!(stemmed, vec!["run", "fli"]);
    /// ```
    fn stem_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<String>> {
        tokens
            .iter()
            .map(|token| self.stem(token.as_ref()))
            .collect()
    }
}

/// Step-2 suffix rewrites, applied when the remaining stem has measure > 0.
/// Longest matching suffix wins.
const STEP2_RULES: [(&str, &str); 20] = [
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("abli", "able"),
    ("alli", "al"),
    ("entli", "ent"),
    ("eli", "e"),
    ("ousli", "ous"),
    ("ization", "ize"),
    ("ation", "ate"),
    ("ator", "ate"),
    ("alism", "al"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("biliti", "ble"),
];

/// Step-3 suffix rewrites, same measure condition as step 2.
const STEP3_RULES: [(&str, &str); 7] = [
    ("icate", "ic"),
    ("ative", ""),
    ("alize", "al"),
    ("iciti", "ic"),
    ("ical", "ic"),
    ("ful", ""),
    ("ness", ""),
];

/// Step-4 suffixes, removed outright when the whole word has measure > 1.
/// "ion" is handled separately (requires a preceding s or t).
const STEP4_SUFFIXES: [&str; 18] = [
    "ement", "ance", "ence", "able", "ible", "ment", "ant", "ent", "ism", "ate", "iti", "ous",
    "ive", "ize", "al", "er", "ic", "ou",
];

/// Simplified Porter stemmer.
///
/// Implements the common suffix-removal rules of the classic algorithm.
/// Words of one or two characters pass through unchanged.
///
/// # Examples
///
/// ```
/// use sugerir::text::stem::{Stemmer, PorterStemmer};
///
/// let stemmer = PorterStemmer::new();
///
/// assert_eq!(stemmer.stem("running").unwrap(), "run");
/// assert_eq!(stemmer.stem("studies").unwrap(), "studi");
///
/// // Short words are preserved
/// assert_eq!(stemmer.stem("sky").unwrap(), "sky");
/// assert_eq!(stemmer.stem("is").unwrap(), "is");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    /// Create a new stemmer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn is_vowel(c: char) -> bool {
        matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
    }

    /// Number of vowel-to-consonant transitions, roughly the syllable count.
    fn measure(word: &str) -> usize {
        let mut count = 0;
        let mut prev_is_vowel = false;

        for c in word.chars() {
            let is_vowel = Self::is_vowel(c);
            if !is_vowel && prev_is_vowel {
                count += 1;
            }
            prev_is_vowel = is_vowel;
        }

        count
    }

    fn contains_vowel(word: &str) -> bool {
        word.chars().any(Self::is_vowel)
    }

    fn ends_double_consonant(word: &str) -> bool {
        let chars: Vec<char> = word.chars().collect();
        match chars.as_slice() {
            [.., a, b] => a == b && !Self::is_vowel(*b),
            _ => false,
        }
    }

    /// Consonant-vowel-consonant ending where the final consonant is not
    /// w, x, or y.
    fn ends_cvc(word: &str) -> bool {
        let chars: Vec<char> = word.chars().collect();
        match chars.as_slice() {
            [.., a, b, c] => {
                !Self::is_vowel(*a)
                    && Self::is_vowel(*b)
                    && !Self::is_vowel(*c)
                    && !matches!(*c, 'w' | 'x' | 'y')
            }
            _ => false,
        }
    }

    /// Plurals: -sses, -ies, trailing -s.
    fn step_plurals(word: &mut String) {
        if word.ends_with("sses") || word.ends_with("ies") {
            word.truncate(word.len() - 2);
        } else if !word.ends_with("ss") && word.ends_with('s') {
            word.pop();
        }
    }

    /// Past tense and gerunds: -eed, -ed, -ing.
    fn step_past_tense(word: &mut String) {
        if let Some(stem) = word.strip_suffix("eed") {
            if Self::measure(stem) > 0 {
                word.truncate(word.len() - 1);
            }
            return;
        }

        let stripped = word
            .strip_suffix("ed")
            .or_else(|| word.strip_suffix("ing"))
            .filter(|stem| Self::contains_vowel(stem))
            .map(ToString::to_string);

        if let Some(mut stem) = stripped {
            // Repair the stem the same way the full algorithm does
            if stem.ends_with("at") || stem.ends_with("bl") || stem.ends_with("iz") {
                stem.push('e');
            } else if Self::ends_double_consonant(&stem)
                && !matches!(stem.chars().last(), Some('l' | 's' | 'z'))
            {
                stem.pop();
            } else if Self::measure(&stem) == 1 && Self::ends_cvc(&stem) {
                stem.push('e');
            }
            *word = stem;
        }
    }

    /// Terminal y → i when the stem still contains a vowel.
    fn step_terminal_y(word: &mut String) {
        if word.ends_with('y') && Self::contains_vowel(&word[..word.len() - 1]) {
            word.pop();
            word.push('i');
        }
    }

    /// Apply the longest matching rewrite rule whose stem has measure > 0.
    fn apply_rules(word: &mut String, rules: &[(&str, &str)]) {
        let matched = rules
            .iter()
            .filter(|(suffix, _)| word.ends_with(suffix))
            .max_by_key(|(suffix, _)| suffix.len());

        if let Some((suffix, replacement)) = matched {
            let stem_len = word.len() - suffix.len();
            if Self::measure(&word[..stem_len]) > 0 {
                word.truncate(stem_len);
                word.push_str(replacement);
            }
        }
    }

    /// Strip longer derivational suffixes from words with measure > 1.
    fn step_strip_long_suffixes(word: &mut String) {
        if Self::measure(word) <= 1 {
            return;
        }

        if let Some(stem) = word.strip_suffix("ion") {
            if stem.ends_with('s') || stem.ends_with('t') {
                word.truncate(word.len() - 3);
                return;
            }
        }

        let matched = STEP4_SUFFIXES
            .iter()
            .filter(|suffix| word.ends_with(*suffix))
            .max_by_key(|suffix| suffix.len());

        if let Some(suffix) = matched {
            word.truncate(word.len() - suffix.len());
        }
    }

    /// Tidy the ending: drop a silent e, collapse a final double l.
    fn step_cleanup(word: &mut String) {
        if word.ends_with('e') {
            let stem = &word[..word.len() - 1];
            let m = Self::measure(stem);
            if m > 1 || (m == 1 && !Self::ends_cvc(stem)) {
                word.pop();
            }
        }

        if word.ends_with("ll") && Self::measure(word) > 1 {
            word.pop();
        }
    }
}

impl Stemmer for PorterStemmer {
    fn stem(&self, word: &str) -> Result<String> {
        let mut word = word.to_lowercase();

        if word.len() <= 2 {
            return Ok(word);
        }

        Self::step_plurals(&mut word);
        Self::step_past_tense(&mut word);
        Self::step_terminal_y(&mut word);
        Self::apply_rules(&mut word, &STEP2_RULES);
        Self::apply_rules(&mut word, &STEP3_RULES);
        Self::step_strip_long_suffixes(&mut word);
        Self::step_cleanup(&mut word);

        Ok(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stem(word: &str) -> String {
        PorterStemmer::new().stem(word).unwrap()
    }

    #[test]
    fn test_plurals() {
        assert_eq!(stem("books"), "book");
        assert_eq!(stem("studies"), "studi");
        assert_eq!(stem("flies"), "fli");
        assert_eq!(stem("witness"), "wit");
    }

    #[test]
    fn test_gerunds() {
        assert_eq!(stem("running"), "run");
        assert_eq!(stem("haunting"), "haunt");
        assert_eq!(stem("hoping"), "hope");
    }

    #[test]
    fn test_past_tense() {
        assert_eq!(stem("jumped"), "jump");
        assert_eq!(stem("agreed"), "agree");
    }

    #[test]
    fn test_terminal_y() {
        assert_eq!(stem("story"), "stori");
        assert_eq!(stem("sky"), "sky");
    }

    #[test]
    fn test_short_words_unchanged() {
        assert_eq!(stem("is"), "is");
        assert_eq!(stem("me"), "me");
        assert_eq!(stem("a"), "a");
    }

    #[test]
    fn test_lowercases_input() {
        assert_eq!(stem("Running"), "run");
        assert_eq!(stem("BOOKS"), "book");
    }

    #[test]
    fn test_idempotent_on_roots() {
        let stemmer = PorterStemmer::new();
        for word in ["crime", "heist", "space", "family"] {
            let once = stemmer.stem(word).unwrap();
            let twice = stemmer.stem(&once).unwrap();
            assert_eq!(once, twice, "stemming '{word}' twice diverged");
        }
    }

    #[test]
    fn test_stem_tokens_order() {
        let stemmer = PorterStemmer::new();
        let stemmed = stemmer
            .stem_tokens(&["running", "jumped", "stories"])
            .unwrap();
        assert_eq!(stemmed, vec!["run", "jump", "stori"]);
    }
}

//! Stopword removal for predicates and tag labels.

use std::collections::HashSet;

/// Default English stopwords.
const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "another", "any", "are", "as", "at",
    "be", "because", "been", "before", "being", "between", "both", "but", "by", "came", "can",
    "come", "could", "did", "do", "each", "for", "from", "get", "got", "has", "had", "he", "have",
    "her", "here", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "like",
    "make", "many", "me", "might", "more", "most", "much", "must", "my", "never", "now", "of",
    "on", "only", "or", "other", "our", "out", "over", "said", "same", "see", "should", "since",
    "some", "still", "such", "take", "than", "that", "the", "their", "them", "then", "there",
    "these", "they", "this", "those", "through", "to", "too", "under", "up", "very", "was", "way",
    "we", "well", "were", "what", "where", "which", "while", "who", "with", "would", "you", "your",
];

/// Removes stopwords from a token sequence, preserving order.
pub trait StopwordFilter {
    fn remove_stopwords(&self, tokens: Vec<String>) -> Vec<String>;
}

/// Set-backed stopword filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopwordList {
    words: HashSet<String>,
}

impl StopwordList {
    pub fn english() -> Self {
        Self { words: ENGLISH_STOPWORDS.iter().map(|w| w.to_string()).collect() }
    }

    pub fn empty() -> Self {
        Self { words: HashSet::new() }
    }

    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words.extend(extra.into_iter().map(|w| w.as_ref().trim().to_lowercase()));
        self
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopwordList {
    fn default() -> Self {
        Self::english()
    }
}

impl StopwordFilter for StopwordList {
    fn remove_stopwords(&self, tokens: Vec<String>) -> Vec<String> {
        tokens.into_iter().filter(|t| !self.contains(t)).collect()
    }
}

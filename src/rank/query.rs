//! Query normalization: predicate text to tokens, plus requested tags.

use super::normalize::normalize;
use super::stopwords::StopwordFilter;
use crate::domain::{Query, Tag};

/// Normalized, stopword-filtered, deduplicated tokens of a free-text predicate.
pub fn predicate_tokens(predicate: &str, stopwords: &dyn StopwordFilter) -> Vec<String> {
    let filtered = stopwords.remove_stopwords(normalize(predicate));
    let mut tokens: Vec<String> = Vec::with_capacity(filtered.len());
    for token in filtered {
        let token = token.trim().to_lowercase();
        if !token.is_empty() && !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}

impl<T: Tag> Query<T> {
    pub fn set_predicate(&mut self, predicate: &str, stopwords: &dyn StopwordFilter) {
        self.tokens = predicate_tokens(predicate, stopwords);
    }

    /// Stored verbatim; callers pass a set.
    pub fn set_requested_tags(&mut self, tags: Vec<T>) {
        self.requested_tags = tags;
    }

    pub fn has_query(&self) -> bool {
        !self.is_empty()
    }
}

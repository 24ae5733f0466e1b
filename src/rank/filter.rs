//! Candidate filtering ahead of scoring.

use crate::domain::{Document, Query, Tag};

/// Whether `doc` is a candidate for `query`.
///
/// An empty query admits everything. Otherwise a document passes when any
/// query token is a substring of any of its terms, or when one of its tags
/// was requested.
pub fn matches<T: Tag>(doc: &Document<T>, query: &Query<T>) -> bool {
    if query.is_empty() {
        return true;
    }

    let by_text = query.tokens.first().is_some_and(|first| !first.is_empty())
        && query
            .tokens
            .iter()
            .any(|token| doc.terms.iter().any(|term| term.contains(token.as_str())));

    by_text || doc.tags.iter().any(|tag| query.requests(tag))
}

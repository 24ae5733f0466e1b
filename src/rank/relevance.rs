//! Relevance normalization and result ordering.

use crate::domain::{Document, SortOrder};
use crate::error::RankError;
use std::cmp::Ordering;

/// Ratio of matched to potential mass, when both are present.
pub fn score_ratio<T>(doc: &Document<T>) -> Option<f64> {
    match (doc.scores.idftf, doc.scores.max_score) {
        (Some(idftf), Some(max_score)) => Some(idftf / max_score),
        _ => None,
    }
}

/// Clamp floating point noise into a stable two-decimal value.
pub fn stabilize(ratio: f64) -> f64 {
    ((ratio * 100.0 * 333.0).ceil() / 333.0).floor() / 100.0
}

/// Bounded relevance of a scored document.
///
/// Documents without scores, or with zero potential mass, have no defined
/// relevance; asking for one is a caller error.
pub fn relevance<T>(doc: &Document<T>) -> Result<f64, RankError> {
    match (doc.scores.idftf, doc.scores.max_score) {
        (Some(idftf), Some(max_score)) if max_score != 0.0 => Ok(stabilize(idftf / max_score)),
        _ => Err(RankError::UndefinedRelevance { id: doc.id.clone() }),
    }
}

/// Comparator over documents.
///
/// Scored pairs compare by matched/potential ratio in `order`. Any other pair
/// falls back to the `selector` field's string form, ascending and ignoring
/// case; byte order only breaks ties between case variants.
pub fn sort_comparator<T>(
    selector: &str,
    order: SortOrder,
) -> impl Fn(&Document<T>, &Document<T>) -> Ordering {
    let selector = selector.to_string();
    move |a: &Document<T>, b: &Document<T>| {
        if a.scores.idftf.is_some() && b.scores.idftf.is_some() {
            let left = score_ratio(a).unwrap_or(f64::NAN);
            let right = score_ratio(b).unwrap_or(f64::NAN);
            let ordering = left.partial_cmp(&right).unwrap_or(Ordering::Equal);
            return match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            };
        }
        compare_text(a.field_string(&selector), b.field_string(&selector))
    }
}

fn compare_text(left: &str, right: &str) -> Ordering {
    left.chars()
        .flat_map(char::to_lowercase)
        .cmp(right.chars().flat_map(char::to_lowercase))
        .then_with(|| left.cmp(right))
}

//! Baseline document cache.
//!
//! Holds one entry per document id with every transient scoring field
//! cleared. The cache is rebuilt on load and refreshed at the start of
//! every evaluation so repeated evaluations never see stale scores.

use crate::domain::{Document, ResetPolicy, Scores};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct DocumentCache<T> {
    entries: HashMap<String, Document<T>>,
}

impl<T> Default for DocumentCache<T> {
    fn default() -> Self {
        Self { entries: HashMap::new() }
    }
}

impl<T: Clone> DocumentCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cache contents with the baseline of `documents`.
    pub fn load(&mut self, documents: &[Document<T>]) {
        self.entries.clear();
        for doc in documents {
            self.entries.insert(doc.id.clone(), baseline(doc));
        }
    }

    pub fn get(&self, id: &str) -> Option<&Document<T>> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fresh, cleared copies of `corpus` in corpus order; the cache is updated to match.
    ///
    /// Under [`ResetPolicy::RetainMatchCounts`] the copies keep the
    /// `matching_stemmed_term_count` recorded by the previous evaluation.
    pub fn reset_for_evaluation(
        &mut self,
        corpus: &[Document<T>],
        policy: ResetPolicy,
    ) -> Vec<Document<T>> {
        corpus
            .iter()
            .map(|doc| {
                let mut fresh = baseline(doc);
                if policy == ResetPolicy::RetainMatchCounts {
                    if let Some(previous) = self.entries.get(&doc.id) {
                        fresh.scores.matching_stemmed_term_count =
                            previous.scores.matching_stemmed_term_count;
                    }
                }
                self.entries.insert(fresh.id.clone(), fresh.clone());
                fresh
            })
            .collect()
    }

    /// Remember the stemmed match count of a scored document for the next evaluation.
    pub fn record_match_count(&mut self, id: &str, count: usize) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.scores.matching_stemmed_term_count = count;
        }
    }
}

fn baseline<T: Clone>(doc: &Document<T>) -> Document<T> {
    Document {
        id: doc.id.clone(),
        tags: doc.tags.clone(),
        fields: doc.fields.clone(),
        terms: doc.terms.clone(),
        scores: Scores::default(),
    }
}

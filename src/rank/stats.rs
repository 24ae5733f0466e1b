//! Corpus statistics for the tag and term channels.
//!
//! One scan over the candidate set builds both indices. Each key tracks the
//! distinct documents it occurs in and a breadth-weighted count: seeded with
//! the weight of the first document the key is seen in, then increased by the
//! weight of every further distinct document. `key_count` is the number of
//! distinct keys inserted into either index during the scan.

use super::normalize::normalize;
use crate::domain::{Document, Query, Tag};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedKeyCounter {
    document_ids: BTreeSet<String>,
    weighted_count: usize,
}

impl WeightedKeyCounter {
    fn new(id: &str, seed: usize) -> Self {
        Self { document_ids: BTreeSet::from([id.to_string()]), weighted_count: seed }
    }

    /// Record an occurrence in `id`; only a new document adds `weight`.
    fn observe(&mut self, id: &str, weight: usize) {
        if self.document_ids.insert(id.to_string()) {
            self.weighted_count += weight;
        }
    }

    pub fn document_frequency(&self) -> usize {
        self.document_ids.len()
    }

    pub fn weighted_count(&self) -> usize {
        self.weighted_count
    }

    pub fn contains(&self, id: &str) -> bool {
        self.document_ids.contains(id)
    }
}

/// Key -> counter map that remembers insertion order.
#[derive(Debug, Clone, Default)]
pub struct CorpusIndex {
    order: Vec<String>,
    counters: HashMap<String, WeightedKeyCounter>,
    strongest: Option<String>,
}

impl CorpusIndex {
    /// Returns `true` when `key` was not in the index yet.
    fn observe(&mut self, key: &str, id: &str, weight: usize) -> bool {
        match self.counters.get_mut(key) {
            Some(counter) => {
                counter.observe(id, weight);
                false
            }
            None => {
                self.order.push(key.to_string());
                self.counters.insert(key.to_string(), WeightedKeyCounter::new(id, weight));
                true
            }
        }
    }

    /// First key to reach the running maximum weighted count wins.
    fn settle_strongest(&mut self) {
        let mut max = 0;
        let mut strongest = None;
        for key in &self.order {
            let count = self.counters[key].weighted_count;
            if count > max {
                max = count;
                strongest = Some(key.clone());
            }
        }
        self.strongest = strongest;
    }

    pub fn get(&self, key: &str) -> Option<&WeightedKeyCounter> {
        self.counters.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.counters.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn strongest_key(&self) -> Option<&str> {
        self.strongest.as_deref()
    }

    pub fn strongest(&self) -> Option<&WeightedKeyCounter> {
        self.strongest.as_deref().and_then(|key| self.counters.get(key))
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &WeightedKeyCounter)> {
        self.order.iter().map(|key| (key.as_str(), &self.counters[key]))
    }

    pub fn summary(&self) -> IndexSummary {
        IndexSummary {
            strongest_key: self.strongest.clone(),
            keys: self
                .iter()
                .map(|(key, counter)| KeySummary {
                    key: key.to_string(),
                    document_frequency: counter.document_frequency(),
                    weighted_count: counter.weighted_count(),
                })
                .collect(),
        }
    }
}

/// Both channel indices built over one candidate set.
#[derive(Debug, Clone, Default)]
pub struct CorpusStats {
    pub tags: CorpusIndex,
    pub terms: CorpusIndex,
    /// Distinct keys inserted into either index
    pub key_count: usize,
    /// Number of candidate documents scanned
    pub candidate_count: usize,
}

impl CorpusStats {
    /// Scan `candidates` once, filling both indices and each document's match counts.
    pub fn build<T: Tag>(
        candidates: &mut [Document<T>],
        query: &Query<T>,
        selector: &[String],
    ) -> Self {
        let mut stats = CorpusStats { candidate_count: candidates.len(), ..Self::default() };

        for doc in candidates.iter_mut() {
            let field_tokens: Vec<Vec<String>> =
                doc.selector_values(selector).map(normalize).collect();

            let matching_tags = query
                .requested_tags
                .iter()
                .filter(|requested| doc.tags.iter().any(|tag| tag.same_tag(requested)))
                .count();
            let matching_tokens = query
                .tokens
                .iter()
                .filter(|token| field_tokens.iter().any(|tokens| tokens.contains(token)))
                .count();
            doc.scores.matching_term_count = matching_tags;
            doc.scores.matching_stemmed_term_count += matching_tokens;
            if matching_tags == query.requested_tags.len() {
                doc.scores.has_all_tags = true;
            }

            let tag_weight = doc.tags.len();
            for tag in doc.tags.iter().filter(|tag| query.requests(tag)) {
                if stats.tags.observe(&tag.key(), &doc.id, tag_weight) {
                    stats.key_count += 1;
                }
            }

            for tokens in &field_tokens {
                for token in &query.tokens {
                    for found in tokens.iter().filter(|t| *t == token) {
                        if stats.terms.observe(found, &doc.id, tokens.len()) {
                            stats.key_count += 1;
                        }
                    }
                }
            }
        }

        stats.tags.settle_strongest();
        stats.terms.settle_strongest();

        debug!(
            candidates = stats.candidate_count,
            tag_keys = stats.tags.len(),
            term_keys = stats.terms.len(),
            key_count = stats.key_count,
            strongest_tag = stats.tags.strongest_key().unwrap_or("-"),
            strongest_term = stats.terms.strongest_key().unwrap_or("-"),
            "corpus statistics built"
        );

        stats
    }

    pub fn report(&self) -> StatsReport {
        StatsReport {
            candidate_count: self.candidate_count,
            key_count: self.key_count,
            tags: self.tags.summary(),
            terms: self.terms.summary(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeySummary {
    pub key: String,
    pub document_frequency: usize,
    pub weighted_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexSummary {
    pub strongest_key: Option<String>,
    pub keys: Vec<KeySummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsReport {
    pub candidate_count: usize,
    pub key_count: usize,
    pub tags: IndexSummary,
    pub terms: IndexSummary,
}

//! Relevance ranking over an in-memory, tagged corpus
//!
//! [`RelevanceEngine`] owns the corpus and its baseline cache. Every call to
//! [`RelevanceEngine::evaluate`] filters the corpus against the current query,
//! rebuilds both channel indices over the candidates, and scores each one.

use crate::domain::{
    Document, EngineConfig, Query, ResetPolicy, Scores, SortOrder, Tag, TagLabeler,
};
use crate::error::RankError;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, warn};

pub mod cache;
pub mod filter;
pub mod normalize;
pub mod query;
pub mod relevance;
pub mod scorer;
pub mod stats;
pub mod stopwords;

pub use cache::DocumentCache;
pub use relevance::{relevance, sort_comparator};
pub use scorer::{ChannelScore, Scorer};
pub use stats::{CorpusIndex, CorpusStats, StatsReport, WeightedKeyCounter};
pub use stopwords::{StopwordFilter, StopwordList};

use normalize::unique_tokens;

/// Ranks one in-memory corpus against the current query.
pub struct RelevanceEngine<T> {
    config: EngineConfig,
    corpus: Vec<Document<T>>,
    cache: DocumentCache<T>,
    query: Query<T>,
    stopwords: Box<dyn StopwordFilter>,
    labels: Box<dyn TagLabeler<T>>,
    last_stats: Option<CorpusStats>,
}

impl<T: Tag> RelevanceEngine<T> {
    /// Empty engine using the English stopword list; `labels` names tags for the tag channel.
    pub fn new<L>(config: EngineConfig, labels: L) -> Self
    where
        L: TagLabeler<T> + 'static,
    {
        Self {
            config,
            corpus: Vec::new(),
            cache: DocumentCache::new(),
            query: Query::default(),
            stopwords: Box::new(StopwordList::english()),
            labels: Box::new(labels),
            last_stats: None,
        }
    }

    /// Replace the stopword filter applied to predicates and tag labels.
    pub fn with_stopwords<S>(mut self, stopwords: S) -> Self
    where
        S: StopwordFilter + 'static,
    {
        self.stopwords = Box::new(stopwords);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn query(&self) -> &Query<T> {
        &self.query
    }

    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }

    /// Replace the corpus. Transient fields are cleared and terms derived from
    /// the selector fields. A repeated id replaces the earlier document in place.
    pub fn load(&mut self, documents: Vec<Document<T>>) {
        let mut corpus: Vec<Document<T>> = Vec::with_capacity(documents.len());
        let mut positions: HashMap<String, usize> = HashMap::new();

        for mut doc in documents {
            doc.scores = Scores::default();
            doc.terms = unique_tokens(doc.selector_values(&self.config.selector));
            match positions.get(&doc.id) {
                Some(&pos) => {
                    warn!(id = %doc.id, "duplicate document id replaces earlier entry");
                    corpus[pos] = doc;
                }
                None => {
                    positions.insert(doc.id.clone(), corpus.len());
                    corpus.push(doc);
                }
            }
        }

        self.cache.load(&corpus);
        self.corpus = corpus;
        self.last_stats = None;
        debug!(documents = self.corpus.len(), "corpus loaded");
    }

    /// Change the selector fields and re-derive every document's terms.
    pub fn set_selector<I, S>(&mut self, selector: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.selector = selector.into_iter().map(Into::into).collect();
        let documents = std::mem::take(&mut self.corpus);
        self.load(documents);
    }

    /// Normalize `predicate` into the query's tokens, dropping stopwords.
    pub fn set_predicate(&mut self, predicate: &str) {
        self.query.set_predicate(predicate, self.stopwords.as_ref());
        debug!(tokens = ?self.query.tokens, "predicate set");
    }

    /// Tags the tag channel scores against. Pass each tag once.
    pub fn set_requested_tags(&mut self, tags: Vec<T>) {
        self.query.set_requested_tags(tags);
    }

    /// Whether either a predicate token or a requested tag is set.
    pub fn has_query(&self) -> bool {
        self.query.has_query()
    }

    /// Filter, score and return the matching documents.
    ///
    /// Without a query every document passes through unscored. With one, documents
    /// that pass the filter but carry no matched mass are dropped.
    pub fn evaluate(&mut self) -> Vec<Document<T>> {
        let fresh = self.cache.reset_for_evaluation(&self.corpus, self.config.reset_policy);
        let total = fresh.len();
        let mut candidates: Vec<Document<T>> =
            fresh.into_iter().filter(|doc| filter::matches(doc, &self.query)).collect();

        if !self.query.has_query() {
            self.last_stats = None;
            debug!(documents = total, "empty query, corpus passed through");
            return candidates;
        }

        let stats = CorpusStats::build(&mut candidates, &self.query, &self.config.selector);
        let candidate_count = candidates.len();
        let mut results = Vec::with_capacity(candidate_count);
        {
            let scorer =
                Scorer::new(&stats, &self.query, self.stopwords.as_ref(), self.labels.as_ref());
            for mut doc in candidates {
                let has_signal = scorer.score(&mut doc);
                if self.config.reset_policy == ResetPolicy::RetainMatchCounts {
                    self.cache.record_match_count(&doc.id, doc.scores.matching_stemmed_term_count);
                }
                if has_signal {
                    results.push(doc);
                }
            }
        }

        debug!(
            documents = total,
            candidates = candidate_count,
            results = results.len(),
            dropped = candidate_count - results.len(),
            "evaluation complete"
        );
        self.last_stats = Some(stats);
        results
    }

    /// Channel indices built by the most recent scored evaluation.
    pub fn statistics(&self) -> Option<&CorpusStats> {
        self.last_stats.as_ref()
    }

    /// Baseline entry for `id`.
    pub fn get_cached_by_id(&self, id: &str) -> Option<&Document<T>> {
        self.cache.get(id)
    }

    /// Ratio order for scored pairs, case-insensitive selector field order otherwise.
    pub fn sort_comparator(
        selector: &str,
        order: SortOrder,
    ) -> impl Fn(&Document<T>, &Document<T>) -> Ordering {
        relevance::sort_comparator(selector, order)
    }

    /// Two-decimal matched/potential ratio of a scored document.
    pub fn relevance(doc: &Document<T>) -> Result<f64, RankError> {
        relevance::relevance(doc)
    }
}

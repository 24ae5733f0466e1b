//! Two-channel IDF-TF scoring.
//!
//! For a key `k` in a channel with strongest key `s`, `N` candidates and `C`
//! distinct keys across both indices:
//!
//! ```text
//! IDF(k)     = 1 / (ln(N / df(k)) + 1) * (ln(df(s) / df(k)) + 1)
//! TFrel(k)   = C / weighted(k)
//! TF(k, doc) = 0.5 + 0.5 * (1 / local(doc)) * (1 / TFrel(k)) * (1 / TFrel(s))
//! ```
//!
//! A key absent from the index uses `df(k) = N` in the first IDF factor,
//! `df(k) = df(s)` in the second and `TFrel(k) = 1`. An empty index has no
//! strongest key; its normalization factor and `TFrel(s)` are both 1.

use super::stats::{CorpusIndex, CorpusStats};
use super::stopwords::StopwordFilter;
use crate::domain::{Document, Query, Tag, TagLabeler};

/// Matched and potential score mass of one channel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChannelScore {
    pub matched: f64,
    pub potential: f64,
}

impl ChannelScore {
    /// Term channel wins whenever it carries signal; each mass falls back independently.
    pub fn compose(term: ChannelScore, tag: ChannelScore) -> ChannelScore {
        ChannelScore {
            matched: if term.matched != 0.0 { term.matched } else { tag.matched },
            potential: if term.potential != 0.0 { term.potential } else { tag.potential },
        }
    }
}

/// IDF-TF evaluation against a single channel index.
pub struct ChannelScorer<'a> {
    index: &'a CorpusIndex,
    candidate_count: f64,
    key_count: f64,
}

impl<'a> ChannelScorer<'a> {
    pub fn new(index: &'a CorpusIndex, candidate_count: usize, key_count: usize) -> Self {
        Self { index, candidate_count: candidate_count as f64, key_count: key_count as f64 }
    }

    fn tf_relevance(&self, weighted_count: Option<usize>) -> f64 {
        match weighted_count {
            Some(w) if w > 0 => self.key_count / w as f64,
            _ => 1.0,
        }
    }

    pub fn score(&self, key: &str, local_cardinality: usize) -> f64 {
        let counter = self.index.get(key);
        let strongest = self.index.strongest();

        let df = counter.map(|c| c.document_frequency() as f64);
        let rarity = 1.0 / ((self.candidate_count / df.unwrap_or(self.candidate_count)).ln() + 1.0);
        let anchor = match strongest {
            Some(s) => {
                let df_strongest = s.document_frequency() as f64;
                (df_strongest / df.unwrap_or(df_strongest)).ln() + 1.0
            }
            None => 1.0,
        };
        let idf = rarity * anchor;

        let tf_rel_key = self.tf_relevance(counter.map(|c| c.weighted_count()));
        let tf_rel_strongest = self.tf_relevance(strongest.map(|s| s.weighted_count()));
        let local = if local_cardinality == 0 { 0.0 } else { 1.0 / local_cardinality as f64 };
        let tf = 0.5 + 0.5 * local * (1.0 / tf_rel_key) * (1.0 / tf_rel_strongest);

        idf * tf
    }

    /// Sum scores over `keys`; only keys present in the index count as matched.
    pub fn accumulate<'k, I>(&self, keys: I, local_cardinality: usize) -> ChannelScore
    where
        I: IntoIterator<Item = &'k str>,
    {
        keys.into_iter().fold(ChannelScore::default(), |acc, key| {
            let score = self.score(key, local_cardinality);
            ChannelScore {
                matched: acc.matched + if self.index.contains(key) { score } else { 0.0 },
                potential: acc.potential + score,
            }
        })
    }
}

/// Scores documents of one evaluation against its corpus statistics.
pub struct Scorer<'a, T> {
    stats: &'a CorpusStats,
    query: &'a Query<T>,
    stopwords: &'a dyn StopwordFilter,
    labels: &'a dyn TagLabeler<T>,
}

impl<'a, T: Tag> Scorer<'a, T> {
    pub fn new(
        stats: &'a CorpusStats,
        query: &'a Query<T>,
        stopwords: &'a dyn StopwordFilter,
        labels: &'a dyn TagLabeler<T>,
    ) -> Self {
        Self { stats, query, stopwords, labels }
    }

    /// Candidate keys of the tag channel: terms, label tokens, then tag keys.
    pub fn tag_keys(&self, doc: &Document<T>) -> Vec<String> {
        let mut keys: Vec<String> = doc.terms.clone();
        for tag in &doc.tags {
            let label = self.labels.label(tag).trim().to_lowercase();
            let tokens: Vec<String> = label
                .split(' ')
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
            keys.extend(self.stopwords.remove_stopwords(tokens));
        }
        keys.extend(doc.tags.iter().map(|tag| tag.key().into_owned()));
        dedup_in_order(keys)
    }

    /// Candidate keys of the term channel: terms that are query tokens.
    pub fn term_keys(&self, doc: &Document<T>) -> Vec<String> {
        let keys =
            doc.terms.iter().filter(|term| self.query.tokens.contains(term)).cloned().collect();
        dedup_in_order(keys)
    }

    pub fn tag_channel(&self, doc: &Document<T>) -> ChannelScore {
        let scorer =
            ChannelScorer::new(&self.stats.tags, self.stats.candidate_count, self.stats.key_count);
        let keys = self.tag_keys(doc);
        scorer.accumulate(keys.iter().map(String::as_str), doc.tags.len())
    }

    pub fn term_channel(&self, doc: &Document<T>) -> ChannelScore {
        let scorer =
            ChannelScorer::new(&self.stats.terms, self.stats.candidate_count, self.stats.key_count);
        let keys = self.term_keys(doc);
        scorer.accumulate(keys.iter().map(String::as_str), doc.terms.len())
    }

    /// Write the composed masses onto `doc`. Returns `false` when it carries no matched mass.
    pub fn score(&self, doc: &mut Document<T>) -> bool {
        let composed = ChannelScore::compose(self.term_channel(doc), self.tag_channel(doc));
        doc.scores.idftf = Some(composed.matched);
        doc.scores.max_score = Some(composed.potential);
        composed.matched != 0.0
    }
}

fn dedup_in_order(keys: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(keys.len());
    for key in keys {
        if !out.contains(&key) {
            out.push(key);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{ChannelScore, ChannelScorer, Scorer};
    use crate::domain::{Document, Query};
    use crate::rank::normalize::unique_tokens;
    use crate::rank::stats::{CorpusIndex, CorpusStats};
    use crate::rank::stopwords::StopwordList;

    const EPS: f64 = 1e-9;

    fn selector() -> Vec<String> {
        vec!["text".to_string()]
    }

    fn doc(id: &str, tags: &[&str], text: &str) -> Document<String> {
        let mut doc =
            Document::new(id, tags.iter().map(|t| t.to_string()).collect()).with_field("text", text);
        doc.terms = unique_tokens([text]);
        doc
    }

    fn query(tags: &[&str], tokens: &[&str]) -> Query<String> {
        Query {
            requested_tags: tags.iter().map(|t| t.to_string()).collect(),
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn identity_label(tag: &String) -> String {
        tag.clone()
    }

    #[test]
    fn term_channel_matches_hand_computed_score() {
        let mut docs = vec![doc("a", &["x"], "apple banana"), doc("b", &["x", "y"], "banana cherry")];
        let q = query(&[], &["banana"]);
        let stats = CorpusStats::build(&mut docs, &q, &selector());
        let stopwords = StopwordList::english();
        let scorer = Scorer::new(&stats, &q, &stopwords, &identity_label);

        // df = 2 of N = 2, weighted = 4, C = 1: IDF = 1, TF = 0.5 + 0.5 * 1/2 * 4 * 4
        let a = scorer.term_channel(&docs[0]);
        assert!((a.matched - 4.5).abs() < EPS);
        assert!((a.potential - 4.5).abs() < EPS);
    }

    #[test]
    fn tag_channel_counts_unmatched_keys_only_as_potential() {
        let mut docs = vec![doc("a", &["x"], "apple banana"), doc("b", &["x", "y"], "banana cherry")];
        let q = query(&["x"], &[]);
        let stats = CorpusStats::build(&mut docs, &q, &selector());
        let stopwords = StopwordList::english();
        let scorer = Scorer::new(&stats, &q, &stopwords, &identity_label);

        // a: keys apple, banana, x; unmatched score 2 each, x scores 5
        let a = scorer.tag_channel(&docs[0]);
        assert!((a.matched - 5.0).abs() < EPS);
        assert!((a.potential - 9.0).abs() < EPS);

        // b: keys banana, cherry, x, y; unmatched 1.25 each, x scores 2.75
        let b = scorer.tag_channel(&docs[1]);
        assert!((b.matched - 2.75).abs() < EPS);
        assert!((b.potential - 6.5).abs() < EPS);
    }

    #[test]
    fn tag_keys_include_filtered_label_tokens() {
        let docs = vec![doc("a", &["x"], "apple")];
        let q = query(&["x"], &[]);
        let stats = CorpusStats::default();
        let stopwords = StopwordList::english();
        let labels = |_: &String| "The Fresh  Apple".to_string();
        let scorer = Scorer::new(&stats, &q, &stopwords, &labels);
        assert_eq!(scorer.tag_keys(&docs[0]), vec!["apple", "fresh", "x"]);
    }

    #[test]
    fn term_keys_are_terms_that_are_query_tokens() {
        let docs = vec![doc("a", &[], "kiwi apple kiwi banana")];
        let q = query(&[], &["banana", "kiwi", "plum"]);
        let stats = CorpusStats::default();
        let stopwords = StopwordList::english();
        let scorer = Scorer::new(&stats, &q, &stopwords, &identity_label);
        assert_eq!(scorer.term_keys(&docs[0]), vec!["kiwi", "banana"]);
    }

    #[test]
    fn empty_index_scores_are_finite() {
        let index = CorpusIndex::default();
        let scorer = ChannelScorer::new(&index, 3, 0);
        let score = scorer.score("anything", 2);
        assert!(score.is_finite());
        assert!((score - 0.75).abs() < EPS);
        assert!(scorer.score("anything", 0).is_finite());
    }

    #[test]
    fn composition_prefers_term_channel() {
        let term = ChannelScore { matched: 1.0, potential: 2.0 };
        let tag = ChannelScore { matched: 3.0, potential: 4.0 };
        assert_eq!(ChannelScore::compose(term, tag), term);

        let silent = ChannelScore::default();
        assert_eq!(ChannelScore::compose(silent, tag), tag);
    }

    #[test]
    fn score_reports_documents_without_signal() {
        let mut docs = vec![doc("a", &["x"], "apple"), doc("b", &["y"], "cherry")];
        let q = query(&["x"], &[]);
        let stats = CorpusStats::build(&mut docs, &q, &selector());
        let stopwords = StopwordList::english();
        let scorer = Scorer::new(&stats, &q, &stopwords, &identity_label);

        let (first, second) = docs.split_at_mut(1);
        assert!(scorer.score(&mut first[0]));
        assert!(!scorer.score(&mut second[0]));
        assert_eq!(second[0].scores.idftf, Some(0.0));
    }
}

//! Core domain types and models
//!
//! Defines documents, their transient scoring fields, queries, tags and the
//! engine-level configuration shared by the library and the CLI.

use crate::error::RankError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// Field name that the comparator resolves to the document id.
pub const ID_SELECTOR: &str = "id";

/// Sort direction for relevance comparisons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// How transient scoring fields are treated when the cache is reset before an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ResetPolicy {
    /// Every transient field starts from zero on each evaluation.
    #[default]
    ClearAll,
    /// `matching_stemmed_term_count` is seeded from the previous evaluation's value,
    /// so it accumulates across evaluations with different predicates.
    RetainMatchCounts,
}

/// A tag value from a closed, caller-defined domain.
///
/// `key` is the stable serialization used as the tag-index key and for
/// equality against requested tags.
pub trait Tag: Clone + fmt::Debug {
    fn key(&self) -> Cow<'_, str>;

    fn same_tag(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Tag for String {
    fn key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

/// Human-readable labels for tag values.
pub trait TagLabeler<T> {
    fn label(&self, tag: &T) -> String;
}

impl<T, F> TagLabeler<T> for F
where
    F: Fn(&T) -> String,
{
    fn label(&self, tag: &T) -> String {
        self(tag)
    }
}

/// A tag resolved against a [`TagDomain`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainTag(String);

impl DomainTag {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Tag for DomainTag {
    fn key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.0.as_str())
    }
}

impl fmt::Display for DomainTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Closed tag domain loaded from configuration: tag key -> label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagDomain {
    labels: BTreeMap<String, String>,
}

impl TagDomain {
    pub fn new(labels: BTreeMap<String, String>) -> Self {
        Self { labels }
    }

    /// Domain whose labels are the keys themselves.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels = keys
            .into_iter()
            .map(|k| {
                let key = k.into();
                (key.clone(), key)
            })
            .collect();
        Self { labels }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Resolve a raw key into a tag of this domain.
    pub fn resolve(&self, key: &str) -> Result<DomainTag, RankError> {
        if self.labels.contains_key(key) {
            Ok(DomainTag(key.to_string()))
        } else {
            Err(RankError::UnknownTag { tag: key.to_string() })
        }
    }

    pub fn resolve_all<I, S>(&self, keys: I) -> Result<Vec<DomainTag>, RankError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        keys.into_iter().map(|k| self.resolve(k.as_ref())).collect()
    }
}

impl TagLabeler<DomainTag> for TagDomain {
    fn label(&self, tag: &DomainTag) -> String {
        self.labels.get(tag.as_str()).cloned().unwrap_or_else(|| tag.as_str().to_string())
    }
}

/// Transient per-evaluation scoring fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    /// Matched score mass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idftf: Option<f64>,

    /// Potential score mass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,

    /// Requested tags present on the document
    #[serde(default)]
    pub matching_term_count: usize,

    /// Requested query tokens present among the document's selector tokens
    #[serde(default)]
    pub matching_stemmed_term_count: usize,

    /// Every requested tag is present
    #[serde(default)]
    pub has_all_tags: bool,
}

impl Scores {
    pub fn is_cleared(&self) -> bool {
        *self == Scores::default()
    }
}

/// A tagged free-text document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document<T> {
    /// Unique, immutable id within the corpus
    pub id: String,

    /// Tag values, unique per document
    #[serde(default = "Vec::new")]
    pub tags: Vec<T>,

    /// Free-text fields; the configured selector picks which are tokenized
    #[serde(default)]
    pub fields: BTreeMap<String, String>,

    /// Unique normalized tokens of the selector fields, in first-seen order
    #[serde(default)]
    pub terms: Vec<String>,

    #[serde(default)]
    pub scores: Scores,
}

impl<T> Document<T> {
    pub fn new(id: impl Into<String>, tags: Vec<T>) -> Self {
        Self {
            id: id.into(),
            tags,
            fields: BTreeMap::new(),
            terms: Vec::new(),
            scores: Scores::default(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Values of the selector fields, in selector order. Missing fields are skipped.
    pub fn selector_values<'a>(&'a self, selector: &'a [String]) -> impl Iterator<Item = &'a str> {
        selector.iter().filter_map(|name| self.fields.get(name).map(String::as_str))
    }

    /// String form of a field for lexicographic ordering.
    pub fn field_string(&self, selector: &str) -> &str {
        if selector == ID_SELECTOR {
            return &self.id;
        }
        self.fields.get(selector).map(String::as_str).unwrap_or("")
    }
}

/// A normalized query: requested tags plus stopword-filtered predicate tokens.
#[derive(Debug, Clone)]
pub struct Query<T> {
    pub requested_tags: Vec<T>,
    pub tokens: Vec<String>,
}

impl<T> Default for Query<T> {
    fn default() -> Self {
        Self { requested_tags: Vec::new(), tokens: Vec::new() }
    }
}

impl<T: Tag> Query<T> {
    pub fn is_empty(&self) -> bool {
        self.requested_tags.is_empty() && self.tokens.is_empty()
    }

    pub fn requests(&self, tag: &T) -> bool {
        self.requested_tags.iter().any(|r| r.same_tag(tag))
    }
}

/// Engine-level settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Field names tokenized into each document's terms
    #[serde(default)]
    pub selector: Vec<String>,

    #[serde(default)]
    pub reset_policy: ResetPolicy,
}

impl EngineConfig {
    pub fn with_selector<I, S>(selector: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { selector: selector.into_iter().map(Into::into).collect(), ..Self::default() }
    }
}

/// Stopword settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopwordConfig {
    /// Additional stopwords
    #[serde(default)]
    pub extra: Vec<String>,

    /// Start from an empty list instead of the English defaults
    #[serde(default)]
    pub disable_defaults: bool,
}

/// Configuration loaded from file and environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Fields tokenized into document terms
    #[serde(default = "default_selector")]
    pub selector: Vec<String>,

    /// Closed tag domain: tag key -> label. Empty means inferred from the corpus.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,

    #[serde(default)]
    pub stopwords: StopwordConfig,

    #[serde(default)]
    pub reset_policy: ResetPolicy,

    /// Relevance sort direction
    #[serde(default)]
    pub order: SortOrder,

    /// Field compared when a pair of results carries no scores
    #[serde(default = "default_sort_field")]
    pub sort_field: String,

    /// Maximum results to display
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            selector: default_selector(),
            tags: BTreeMap::new(),
            stopwords: StopwordConfig::default(),
            reset_policy: ResetPolicy::default(),
            order: SortOrder::default(),
            sort_field: default_sort_field(),
            limit: default_limit(),
        }
    }
}

impl Config {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig { selector: self.selector.clone(), reset_policy: self.reset_policy }
    }

    pub fn tag_domain(&self) -> TagDomain {
        TagDomain::new(self.tags.clone())
    }
}

fn default_selector() -> Vec<String> {
    vec!["title".to_string(), "description".to_string()]
}
fn default_sort_field() -> String {
    ID_SELECTOR.to_string()
}
fn default_limit() -> usize {
    20
}

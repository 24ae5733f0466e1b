//! idftf-rank: two-channel IDF-TF relevance ranking for tagged documents
//!
//! Documents carry free-text fields and tags from a closed domain. A query of
//! predicate text plus requested tags is scored through a term channel and a
//! tag channel; results are ordered by bounded relevance.

pub mod cli;
pub mod config;
pub mod corpus;
pub mod domain;
pub mod error;
pub mod rank;

pub use domain::{Document, DomainTag, Query, ResetPolicy, Scores, SortOrder, Tag, TagDomain};
pub use error::RankError;
pub use rank::RelevanceEngine;

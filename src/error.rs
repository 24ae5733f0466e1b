//! Library error type

use thiserror::Error;

/// Errors surfaced by the ranking engine and its loaders
#[derive(Debug, Error)]
pub enum RankError {
    /// Tag not part of the configured tag domain
    #[error("Unknown tag: {tag}")]
    UnknownTag { tag: String },

    /// Relevance requested for a document without matched or potential mass
    #[error("Relevance undefined for document {id}: no score or zero potential mass")]
    UndefinedRelevance { id: String },

    /// Corpus input could not be parsed
    #[error("Corpus parse error at record {record}: {message}")]
    CorpusParse { record: usize, message: String },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<figment::Error> for RankError {
    fn from(e: figment::Error) -> Self {
        RankError::Config(e.to_string())
    }
}

//! Arguments and setup shared by the `rank` and `stats` commands

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::corpus::{infer_domain, into_documents, parse_records};
use crate::domain::{Config, DomainTag, ResetPolicy};
use crate::rank::{RelevanceEngine, StopwordList};

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Corpus file: a JSON array of documents or JSON Lines
    #[arg(long, value_name = "FILE")]
    pub corpus: PathBuf,

    /// Path to config file (idftf-rank.toml or idftf-rank.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Free-text predicate
    #[arg(short = 'q', long, value_name = "TEXT")]
    pub query: Option<String>,

    /// Requested tag key (repeatable)
    #[arg(short = 't', long = "tag", value_name = "KEY")]
    pub tags: Vec<String>,

    /// Field tokenized into document terms (repeatable, replaces the configured selector)
    #[arg(short = 's', long = "selector", value_name = "FIELD")]
    pub selector: Vec<String>,

    /// Additional stopword (repeatable)
    #[arg(long = "stopword", value_name = "WORD")]
    pub stopwords: Vec<String>,

    /// How transient match counts are reset between evaluations
    #[arg(long, value_name = "POLICY")]
    pub reset_policy: Option<ResetPolicyArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResetPolicyArg {
    ClearAll,
    RetainMatchCounts,
}

impl From<ResetPolicyArg> for ResetPolicy {
    fn from(arg: ResetPolicyArg) -> Self {
        match arg {
            ResetPolicyArg::ClearAll => ResetPolicy::ClearAll,
            ResetPolicyArg::RetainMatchCounts => ResetPolicy::RetainMatchCounts,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl InputArgs {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            selector: (!self.selector.is_empty()).then(|| self.selector.clone()),
            extra_stopwords: (!self.stopwords.is_empty()).then(|| self.stopwords.clone()),
            reset_policy: self.reset_policy.map(Into::into),
            ..CliOverrides::default()
        }
    }
}

/// Load config and corpus, then build an engine with the query applied.
pub fn prepare(
    args: &InputArgs,
    overrides: CliOverrides,
) -> Result<(Config, RelevanceEngine<DomainTag>)> {
    let cwd = std::env::current_dir().context("Failed to resolve current directory")?;
    let config = load_config(&cwd, args.config.as_deref())?;
    let config = merge_cli_with_config(config, overrides);

    let text = fs::read_to_string(&args.corpus)
        .with_context(|| format!("Failed to read corpus at {}", args.corpus.display()))?;
    let records = parse_records(&text)
        .with_context(|| format!("Invalid corpus file {}", args.corpus.display()))?;

    let domain = if config.tags.is_empty() {
        debug!("no tag domain configured, inferring from corpus");
        infer_domain(&records)
    } else {
        config.tag_domain()
    };
    let documents = into_documents(records, &domain)
        .with_context(|| format!("Corpus {} uses a tag outside the domain", args.corpus.display()))?;

    let stopwords = if config.stopwords.disable_defaults {
        StopwordList::empty()
    } else {
        StopwordList::english()
    }
    .with_extra(&config.stopwords.extra);

    let requested = domain.resolve_all(&args.tags)?;

    let mut engine =
        RelevanceEngine::new(config.engine_config(), domain).with_stopwords(stopwords);
    engine.load(documents);
    if let Some(predicate) = &args.query {
        engine.set_predicate(predicate);
    }
    engine.set_requested_tags(requested);

    info!(
        documents = engine.len(),
        tokens = engine.query().tokens.len(),
        tags = engine.query().requested_tags.len(),
        "engine ready"
    );

    Ok((config, engine))
}

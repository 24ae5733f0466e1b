//! Rank command implementation

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::collections::BTreeMap;

use super::input::{prepare, InputArgs, OutputFormat};
use crate::domain::{Document, DomainTag, SortOrder, Tag};
use crate::rank::RelevanceEngine;

#[derive(Args)]
pub struct RankArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Relevance sort direction
    #[arg(long, value_name = "ORDER")]
    pub order: Option<OrderArg>,

    /// Field used to order unscored results
    #[arg(long, value_name = "FIELD")]
    pub sort_field: Option<String>,

    /// Max results to display
    #[arg(short = 'n', long, value_name = "COUNT")]
    pub limit: Option<usize>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => SortOrder::Asc,
            OrderArg::Desc => SortOrder::Desc,
        }
    }
}

#[derive(Debug, Serialize)]
struct RankOutput<'a> {
    query: Option<&'a str>,
    tags: &'a [String],
    total: usize,
    results: Vec<RankedDocument<'a>>,
}

#[derive(Debug, Serialize)]
struct RankedDocument<'a> {
    id: &'a str,
    relevance: Option<f64>,
    idftf: Option<f64>,
    max_score: Option<f64>,
    matching_term_count: usize,
    matching_stemmed_term_count: usize,
    has_all_tags: bool,
    tags: Vec<&'a str>,
    fields: &'a BTreeMap<String, String>,
}

impl<'a> RankedDocument<'a> {
    fn from_document(doc: &'a Document<DomainTag>) -> Self {
        Self {
            id: &doc.id,
            relevance: RelevanceEngine::<DomainTag>::relevance(doc).ok(),
            idftf: doc.scores.idftf,
            max_score: doc.scores.max_score,
            matching_term_count: doc.scores.matching_term_count,
            matching_stemmed_term_count: doc.scores.matching_stemmed_term_count,
            has_all_tags: doc.scores.has_all_tags,
            tags: doc.tags.iter().map(DomainTag::as_str).collect(),
            fields: &doc.fields,
        }
    }
}

pub fn run(args: RankArgs) -> Result<()> {
    let mut overrides = args.input.overrides();
    overrides.order = args.order.map(Into::into);
    overrides.sort_field = args.sort_field.clone();
    overrides.limit = args.limit;

    let (config, mut engine) = prepare(&args.input, overrides)?;
    let scored = engine.has_query();

    let mut results = engine.evaluate();
    let total = results.len();
    results.sort_by(RelevanceEngine::<DomainTag>::sort_comparator(&config.sort_field, config.order));
    results.truncate(config.limit.max(1));

    match args.format {
        OutputFormat::Json => {
            let output = RankOutput {
                query: args.input.query.as_deref(),
                tags: &args.input.tags,
                total,
                results: results.iter().map(RankedDocument::from_document).collect(),
            };
            let json =
                serde_json::to_string_pretty(&output).context("Failed to serialize results")?;
            println!("{json}");
        }
        OutputFormat::Text => print_text(&args.input, &results, total, scored),
    }

    Ok(())
}

fn print_text(input: &InputArgs, results: &[Document<DomainTag>], total: usize, scored: bool) {
    if results.is_empty() {
        println!("No matches found. Try broadening the query.");
        return;
    }

    if scored {
        let mut heading = String::from("Top matches");
        if let Some(query) = &input.query {
            heading.push_str(&format!(" for query: {query}"));
        }
        if !input.tags.is_empty() {
            heading.push_str(&format!(" [tags: {}]", input.tags.join(", ")));
        }
        println!("{heading} ({} of {total})", results.len());
    } else {
        println!("Documents ({} of {total}, no query given)", results.len());
    }

    for doc in results {
        match RelevanceEngine::<DomainTag>::relevance(doc) {
            Ok(relevance) => println!(
                "- {} (relevance {relevance:.2}, idftf {:.3} / {:.3})",
                doc.id,
                doc.scores.idftf.unwrap_or(0.0),
                doc.scores.max_score.unwrap_or(0.0)
            ),
            Err(_) => println!("- {}", doc.id),
        }
        if !doc.tags.is_empty() {
            let keys: Vec<String> = doc.tags.iter().map(|t| t.key().into_owned()).collect();
            println!("  tags: {}", keys.join(", "));
        }
    }
}

//! Stats command implementation

use anyhow::{bail, Context, Result};
use clap::Args;

use super::input::{prepare, InputArgs, OutputFormat};
use crate::rank::stats::IndexSummary;

#[derive(Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub format: OutputFormat,
}

pub fn run(args: StatsArgs) -> Result<()> {
    let (_, mut engine) = prepare(&args.input, args.input.overrides())?;
    if !engine.has_query() {
        bail!("Statistics are built per query. Pass --query or --tag.");
    }

    let results = engine.evaluate();
    let Some(stats) = engine.statistics() else {
        bail!("No statistics were recorded for this evaluation");
    };
    let report = stats.report();

    match args.format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize statistics")?;
            println!("{json}");
        }
        OutputFormat::Text => {
            println!("Statistics:");
            println!("  Candidates: {}", report.candidate_count);
            println!("  Scored results: {}", results.len());
            println!("  Distinct keys: {}", report.key_count);
            print_index("Tag index", &report.tags);
            print_index("Term index", &report.terms);
        }
    }

    Ok(())
}

fn print_index(title: &str, index: &IndexSummary) {
    println!("{title} (strongest: {})", index.strongest_key.as_deref().unwrap_or("-"));
    if index.keys.is_empty() {
        println!("  (empty)");
    }
    for key in &index.keys {
        println!(
            "  {:<20} documents {:>4}  weighted {:>5}",
            key.key, key.document_frequency, key.weighted_count
        );
    }
}

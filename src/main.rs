//! idftf-rank: rank tagged free-text documents from the command line

use anyhow::Result;

fn main() -> Result<()> {
    idftf_rank::cli::run()
}

//! Noticeboard CLI - Command-line interface for campus-notice retrieval.
//!
//! # Usage
//!
//! ```bash
//! # Search a corpus file
//! nb "registration deadline" --corpus notices.json
//! nb "scholarship" -n 3 --json
//!
//! # Inspect query expansion
//! nb "semester timetable" --expand
//! nb "registration deadline" --stats --json
//!
//! # Show help
//! nb --help
//! ```

mod output;
mod search;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Noticeboard retrieval CLI.
///
/// Ranks campus notices from a JSON corpus file against a free-text query
/// using hybrid keyword search, query expansion, and re-ranking.
#[derive(Parser)]
#[command(name = "nb", version, about)]
struct Cli {
    /// Search query
    query: Option<String>,

    /// Maximum number of results to return
    #[arg(short = 'n', long, default_value = "5")]
    limit: usize,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Path to the JSON corpus file (array of documents)
    #[arg(long, default_value = "notices.json")]
    corpus: PathBuf,

    /// Print query expansion variants instead of searching
    #[arg(long)]
    expand: bool,

    /// Print query expansion statistics instead of searching
    #[arg(long)]
    stats: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let Some(query) = &cli.query else {
        eprintln!("No query provided. Use --help for usage information.");
        std::process::exit(1);
    };

    // Expansion modes need no corpus
    if cli.stats {
        let stats = search::build_expansion().expansion_statistics(query);
        println!("{}", output::format_stats(&stats, cli.json));
        return Ok(());
    }
    if cli.expand {
        let set = search::build_expansion().expand(query);
        println!("{}", output::format_expansion(&set, cli.json));
        return Ok(());
    }

    let results = search::execute_search(query, cli.limit, &cli.corpus).await?;
    let rendered = if cli.json {
        output::format_json(query, &results)
    } else {
        output::format_human(query, &results)
    };
    println!("{}", rendered);

    Ok(())
}

//! Ezhuthu main entry point
//!
//! Command-line interface for the Malayalam text harvester.

use anyhow::Context;
use clap::Parser;
use ezhuthu::config::load_config_with_hash;
use ezhuthu::crawler::CrawlEngine;
use ezhuthu::output::print_summary;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Ezhuthu: a Malayalam text harvester
///
/// Crawls the web from seed URLs, extracts Malayalam-script text,
/// OCRs linked PDF documents, and records scrape metadata to CSV.
#[derive(Parser, Debug)]
#[command(name = "ezhuthu")]
#[command(version = "1.0.0")]
#[command(about = "A Malayalam text harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded (hash: {})", config_hash);

    if cli.dry_run {
        print_dry_run(&config);
        return Ok(());
    }

    let engine = CrawlEngine::new(config).context("failed to initialize crawl engine")?;

    // Ctrl-C stops new dispatch; in-flight pages finish and are recorded.
    let cancel = engine.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Cancellation requested, letting in-flight work drain");
            cancel.cancel();
        }
    });

    let summary = engine.run().await.context("crawl run failed")?;
    print_summary(&summary);

    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ezhuthu=info,warn"),
            1 => EnvFilter::new("ezhuthu=debug,info"),
            2 => EnvFilter::new("ezhuthu=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Prints the configuration that a real run would use
fn print_dry_run(config: &ezhuthu::config::Config) {
    println!("=== Ezhuthu Dry Run ===\n");

    println!("Crawler:");
    println!("  Workers: {}", config.crawler.workers);
    println!("  Minimum text length: {}", config.crawler.min_text_length);
    if config.crawler.max_depth > 0 {
        println!("  Max depth: {}", config.crawler.max_depth);
    } else {
        println!("  Max depth: unbounded");
    }
    println!(
        "  Scope: {}",
        if config.crawler.follow_external {
            "all domains (external following enabled)"
        } else {
            "seed domains only"
        }
    );

    println!("\nOCR:");
    println!("  Languages: {}", config.ocr.language_spec());
    println!("  Render width: {}px", config.ocr.render_width);
    println!("  Max concurrent documents: {}", config.ocr.max_concurrent);

    println!("\nOutput:");
    println!("  Text directory: {}", config.output.text_dir);
    println!("  Metadata table: {}", config.output.metadata_path);

    println!("\nSeeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        println!("  - {}", seed);
    }

    if !config.deny.is_empty() {
        println!("\nDenied domains ({}):", config.deny.len());
        for entry in &config.deny {
            println!("  - {}", entry.domain);
        }
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling with {} seed URLs", config.seeds.len());
}

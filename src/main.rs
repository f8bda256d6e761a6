// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap and set up logging
// 2. Get the URL (argument or interactive prompt) and validate it
// 3. Run the download job into <out-dir>/<site name>/
// 4. Print a summary (table or JSON)
// 5. Exit with proper code (0 = everything saved, 1 = some resources missing, 2 = error)
// =============================================================================

mod cli;
mod config;
mod error;
mod extract;
mod fetch;
mod mirror;

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::Config;
use mirror::{JobReport, SiteDownloader};

#[tokio::main]
async fn main() {
    // Parse arguments before logging is set up so --help stays clean
    let cli = Cli::parse();

    // RUST_LOG wins over -v / -q when it is set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole error chain on one line
            error!("{:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = page and every resource saved
//   Ok(1) = page saved, some resources failed or were skipped
//   Err   = invalid URL, page fetch failed, or page could not be written
async fn run(cli: Cli) -> Result<i32> {
    let input = match cli.url.clone() {
        Some(url) => url,
        None => prompt_for_url().await?,
    };

    let url = mirror::validate_input_url(&input)?;
    let output_dir = mirror::output_dir_for(&cli.out_dir, &url);
    info!(output_dir = %output_dir.display(), "saving site");

    let config = Config::default();
    debug!(?config, "using configuration");
    let downloader = SiteDownloader::new(config)?;

    let report = downloader.run(&url, &output_dir).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    Ok(if report.is_complete() { 0 } else { 1 })
}

// Asks for the URL on stdin (one line)
async fn prompt_for_url() -> Result<String> {
    print!("URL of the site to download: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("failed to read URL from stdin")?;

    Ok(line.trim().to_string())
}

// Prints what was saved, what failed and what was skipped
fn print_summary(report: &JobReport) {
    println!();
    println!("{:<10} {:<60}", "STATUS", "RESOURCE");
    println!("{}", "=".repeat(72));

    println!("{:<10} {}", "SAVED", report.root_path.display());
    for saved in &report.saved {
        println!("{:<10} {}", "SAVED", saved.path.display());
    }
    for failed in &report.failed {
        println!("{:<10} {} ({})", "FAILED", failed.url, failed.reason);
    }
    for skipped in &report.skipped {
        println!("{:<10} {} ({})", "SKIPPED", skipped.reference, skipped.reason);
    }

    println!();
    println!("Summary ({:?}):", report.state);
    println!("   Saved: {}", report.saved.len() + 1);
    println!("   Failed: {}", report.failed.len());
    println!("   Skipped: {}", report.skipped.len());
    println!("   Files in: {}", report.output_dir.display());
}

// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Usage:
//   site-grabber https://example.com
//   site-grabber https://example.com --out-dir ./downloads --json
//   site-grabber            (asks for the URL interactively)
// =============================================================================

use std::path::PathBuf;

use clap::{ArgAction, Parser};

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
#[derive(Parser, Debug)]
#[command(
    name = "site-grabber",
    version = "0.1.0",
    about = "Download a web page together with its images, stylesheets and scripts",
    long_about = "site-grabber fetches one page, saves it as html/index.html and downloads \
                  every image, stylesheet and script it references into images/, css/, js/ \
                  and others/ inside a folder named after the site."
)]
pub struct Cli {
    /// Page to download (http or https). Asked for interactively when omitted
    pub url: Option<String>,

    /// Folder in which the per-site folder is created
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Print the job report as JSON instead of a summary table
    #[arg(long)]
    pub json: bool,

    /// More log output (-v = debug, -vv = trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    // Log level used when RUST_LOG is not set
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

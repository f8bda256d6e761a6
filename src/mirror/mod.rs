// src/mirror/mod.rs
// =============================================================================
// This module saves a web page and its resources to disk.
//
// Submodules:
// - resolve: Reference -> absolute URL + unique file name
// - output: Input URL checks and the folder layout
// - downloader: The job itself (fetch page, fan out, wait, report)
// =============================================================================

mod downloader;
mod output;
mod resolve;

pub use downloader::{JobReport, SiteDownloader};
pub use output::{output_dir_for, validate_input_url};

// src/extract/mod.rs
// =============================================================================
// This module turns a downloaded page into a list of resources to fetch.
//
// Submodules:
// - html: Parses HTML and classifies <img>, <link>, <script>, ... references
// =============================================================================

mod html;

pub use html::{extract_resources, ResourceCategory, ResourceReference};

// src/extract/html.rs
// =============================================================================
// This module finds the resources a page embeds.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever, so broken markup is still parsed best-effort
//
// Matched elements:
//   <img src>                    -> image
//   <link rel="stylesheet" href> -> stylesheet
//   <script src>                 -> script
//   <source src>, <embed src>    -> other
//
// Nothing here touches the network or the filesystem; the raw attribute value
// is kept as-is and resolved later against the page URL.
// =============================================================================

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

// What kind of resource a reference points at
//
// The category decides the folder the file lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    Image,
    Stylesheet,
    Script,
    Other,
}

impl ResourceCategory {
    /// Folder name under the output directory
    pub fn dir_name(self) -> &'static str {
        match self {
            ResourceCategory::Image => "images",
            ResourceCategory::Stylesheet => "css",
            ResourceCategory::Script => "js",
            ResourceCategory::Other => "others",
        }
    }

    /// Extension used when a URL gives us no file name to work with
    pub fn default_extension(self) -> &'static str {
        match self {
            ResourceCategory::Stylesheet => ".css",
            ResourceCategory::Script => ".js",
            ResourceCategory::Image | ResourceCategory::Other => "",
        }
    }
}

// One embedded resource as written in the markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceReference {
    /// Attribute value, possibly relative (e.g. "/logo.png", "../app.js")
    pub raw_reference: String,
    pub category: ResourceCategory,
}

// Extracts every resource reference from an HTML document
//
// Parameters:
//   html: the raw response body (bytes, since we never assume an encoding)
//
// Returns: references in document order
//
// Example:
//   html = r#"<img src="/logo.png"><script src="app.js"></script>"#
//   result = [("/logo.png", Image), ("app.js", Script)]
pub fn extract_resources(html: &[u8]) -> Vec<ResourceReference> {
    let text = String::from_utf8_lossy(html);
    let document = Html::parse_document(&text);

    // One selector keeps the results in document order
    // The selector is a constant, so a parse failure is a programmer error
    let selector = Selector::parse("img[src], link[href], script[src], source[src], embed[src]")
        .expect("resource selector is valid CSS");

    document
        .select(&selector)
        .filter_map(|element| {
            let category = classify(&element)?;
            let raw_reference = reference_attr(&element)?;
            Some(ResourceReference {
                raw_reference,
                category,
            })
        })
        .collect()
}

// Maps an element to its category, or None for elements we don't download
// (e.g. <link rel="canonical">)
fn classify(element: &ElementRef) -> Option<ResourceCategory> {
    match element.value().name() {
        "img" => Some(ResourceCategory::Image),
        "link" if is_stylesheet(element) => Some(ResourceCategory::Stylesheet),
        "link" => None,
        "script" => Some(ResourceCategory::Script),
        _ => Some(ResourceCategory::Other),
    }
}

// rel is a space separated token list, e.g. rel="preload stylesheet"
fn is_stylesheet(element: &ElementRef) -> bool {
    element
        .value()
        .attr("rel")
        .map(|rel| {
            rel.split_ascii_whitespace()
                .any(|token| token.eq_ignore_ascii_case("stylesheet"))
        })
        .unwrap_or(false)
}

// Reads src, falling back to href; blank values are skipped
fn reference_attr(element: &ElementRef) -> Option<String> {
    let value = element.value();
    [value.attr("src"), value.attr("href")]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

// src/mirror/resolve.rs
// =============================================================================
// Turns a resource reference into "what to download" and "where to put it".
//
// Two steps:
// 1. resolve(): page URL + raw reference -> FetchTarget (absolute URL + name).
//    Pure and deterministic: the same inputs always give the same target.
// 2. NameRegistry::claim(): makes sure two different URLs never end up
//    writing to the same file during one job (logo.png, logo-2.png, ...).
//
// Rust concepts:
// - Url::join: Browser-style resolution of relative references
// - HashSet: Remembering which names and URLs are already taken
// =============================================================================

use std::collections::HashSet;

use url::Url;

use crate::error::MirrorError;
use crate::extract::{ResourceCategory, ResourceReference};

// A resolved resource, ready to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTarget {
    /// Absolute http(s) URL, fragment removed
    pub resolved_url: Url,
    /// Last path segment of the URL, or a generated name
    pub file_name: String,
    pub category: ResourceCategory,
}

impl FetchTarget {
    /// Folder (relative to the output directory) this resource belongs in
    pub fn output_subdirectory(&self) -> &'static str {
        self.category.dir_name()
    }
}

// Resolves a reference found on `base` into a FetchTarget
//
// Handles the usual reference shapes:
//   "/logo.png"                 -> https://example.com/logo.png
//   "img/a.png"                 -> relative to the page's directory
//   "//cdn.example.com/app.js"  -> keeps the page's scheme
//   "https://other.org/x.css"   -> used as-is
//
// Fails with InvalidReference for things like "data:..." or "mailto:..."
pub fn resolve(base: &Url, reference: &ResourceReference) -> Result<FetchTarget, MirrorError> {
    let raw = reference.raw_reference.as_str();

    let mut resolved = base
        .join(raw)
        .map_err(|e| invalid_reference(raw, e.to_string()))?;

    match resolved.scheme() {
        "http" | "https" => {}
        other => {
            return Err(invalid_reference(
                raw,
                format!("unsupported scheme '{}'", other),
            ))
        }
    }

    // The fragment is never sent to the server and must not affect the target
    resolved.set_fragment(None);

    let file_name = resolved
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .map(sanitize_file_name)
        .filter(|name| is_usable_name(name))
        .unwrap_or_else(|| fallback_name(&resolved, reference.category));

    Ok(FetchTarget {
        resolved_url: resolved,
        file_name,
        category: reference.category,
    })
}

fn invalid_reference(raw: &str, reason: String) -> MirrorError {
    MirrorError::InvalidReference {
        reference: raw.to_string(),
        reason,
    }
}

// Replaces characters that are unsafe in a file name on common filesystems
fn sanitize_file_name(segment: &str) -> String {
    segment
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

fn is_usable_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".."
}

// Name for URLs whose path ends in "/" (e.g. https://fonts.example.com/css/)
//
// Derived only from the URL, so different URLs get different names and
// the same URL always gets the same one.
fn fallback_name(url: &Url, category: ResourceCategory) -> String {
    format!(
        "resource-{:08x}{}",
        fnv1a(url.as_str()),
        category.default_extension()
    )
}

// 32-bit FNV-1a; stable across runs and Rust versions, unlike DefaultHasher
fn fnv1a(text: &str) -> u32 {
    text.bytes().fold(0x811c_9dc5_u32, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(0x0100_0193)
    })
}

// Hands out unique file names within one download job
//
// Lives in the dispatching loop only (no locking needed): every name is
// decided before its download task starts.
#[derive(Debug, Default)]
pub struct NameRegistry {
    /// (category, resolved URL) pairs already scheduled
    urls: HashSet<(ResourceCategory, String)>,
    /// (category, lowercase file name) pairs already taken
    names: HashSet<(ResourceCategory, String)>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Reserves a file name for `target`
    //
    // Returns:
    //   Some(name) - the name to write to (may carry a "-N" suffix)
    //   None       - this URL was already claimed in this category
    //
    // Names are compared case-insensitively because macOS and Windows
    // treat "Logo.png" and "logo.png" as the same file.
    pub fn claim(&mut self, target: &FetchTarget) -> Option<String> {
        let url_key = (target.category, target.resolved_url.as_str().to_string());
        if !self.urls.insert(url_key) {
            return None;
        }

        let (stem, extension) = split_extension(&target.file_name);
        let mut candidate = target.file_name.clone();
        let mut counter = 1;

        while !self
            .names
            .insert((target.category, candidate.to_lowercase()))
        {
            counter += 1;
            candidate = format!("{}-{}{}", stem, counter, extension);
        }

        Some(candidate)
    }
}

// "logo.png" -> ("logo", ".png"); ".htaccess" and "README" have no extension
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(index) if index > 0 => name.split_at(index),
        _ => (name, ""),
    }
}

// src/error.rs
// =============================================================================
// Error kinds for a download job.
//
// Two groups:
// - Job-fatal: InvalidInputUrl, RootFetch, Filesystem (while saving the page),
//   Client. These stop the job and end up in main's error handler.
// - Per-resource: InvalidReference, ResourceFetch, Filesystem (while saving a
//   resource). These are caught at the task boundary, logged, and recorded in
//   the job report; they never fail the job.
// =============================================================================

use std::path::PathBuf;

use thiserror::Error;

use crate::fetch::FetchError;

#[derive(Debug, Error)]
pub enum MirrorError {
    /// The URL given by the user is malformed or not http(s)
    #[error("invalid URL '{input}': {reason}")]
    InvalidInputUrl { input: String, reason: String },

    /// The page itself could not be downloaded
    #[error("failed to fetch {url}: {source}")]
    RootFetch {
        url: String,
        #[source]
        source: FetchError,
    },

    /// A resource reference that can't become an http(s) URL
    #[error("invalid reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },

    /// A resource failed on every attempt
    #[error("failed to fetch {url} after {attempts} attempt(s): {source}")]
    ResourceFetch {
        url: String,
        attempts: u32,
        #[source]
        source: FetchError,
    },

    /// Creating a directory or writing a file failed
    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client could not be built (e.g. TLS backend init failure)
    #[error("failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl MirrorError {
    pub fn invalid_input(input: &str, reason: impl Into<String>) -> Self {
        MirrorError::InvalidInputUrl {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MirrorError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

// src/fetch/mod.rs
// =============================================================================
// This module contains everything that talks to the network.
//
// Submodules:
// - http: Single GET requests and the per-resource retry loop
// - limiter: Keeps the number of simultaneous downloads under a ceiling
// =============================================================================

mod http;
mod limiter;

pub use http::{build_client, fetch_once, fetch_with_retry, FetchError, FetchOutcome};
pub use limiter::ConcurrencyLimiter;

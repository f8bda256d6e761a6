// src/config.rs
// =============================================================================
// Fixed settings for a download job.
//
// All the knobs (timeout, retry count, concurrency limit, user agent) live
// here in one immutable value. The downloader receives a Config when it is
// built and hands clones of it to every resource task.
// =============================================================================

use std::time::Duration;

/// Per-request timeout (10 seconds).
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Total attempts per resource: 1 initial try + 2 retries.
pub const MAX_ATTEMPTS: u32 = 3;

/// Maximum number of resource downloads in flight at once.
pub const CONCURRENT_DOWNLOADS: usize = 5;

/// User-Agent header sent with every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; RobustWebsiteDownloader/3.0)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Timeout applied to each individual HTTP request
    pub request_timeout: Duration,
    /// How many times a resource is tried before giving up (always >= 1)
    pub max_attempts: u32,
    /// Concurrency ceiling for resource downloads (always >= 1)
    pub concurrency: usize,
    /// Value of the User-Agent header
    pub user_agent: String,
    /// Pause between attempts; zero means retry immediately
    pub retry_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request_timeout: REQUEST_TIMEOUT,
            max_attempts: MAX_ATTEMPTS,
            concurrency: CONCURRENT_DOWNLOADS,
            user_agent: USER_AGENT.to_string(),
            retry_delay: Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.concurrency, 5);
        assert!(config.user_agent.contains("RobustWebsiteDownloader"));
        assert_eq!(config.retry_delay, Duration::ZERO);
    }
}

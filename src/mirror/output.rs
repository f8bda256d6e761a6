// src/mirror/output.rs
// =============================================================================
// Input validation and the on-disk layout of a download.
//
//   <base>/<sanitized host>/
//       html/index.html
//       images/  css/  js/  others/
// =============================================================================

use std::path::{Path, PathBuf};

use url::Url;

use crate::error::MirrorError;

/// Folder holding the page itself
pub const HTML_DIR: &str = "html";
/// File name of the saved page
pub const INDEX_FILE: &str = "index.html";

// Checks the user's URL before any work starts
//
// Accepts only absolute http/https URLs with a host.
pub fn validate_input_url(input: &str) -> Result<Url, MirrorError> {
    let input = input.trim();
    let url = Url::parse(input).map_err(|e| MirrorError::invalid_input(input, e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(MirrorError::invalid_input(
            input,
            format!("unsupported scheme '{}', use http or https", url.scheme()),
        ));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(MirrorError::invalid_input(input, "URL has no host"));
    }

    Ok(url)
}

// Makes a host name safe to use as a folder name
//
// "www." is dropped and anything outside [A-Za-z0-9.-] becomes "_",
// so "www.exa mple.com" -> "exa_mple.com".
pub fn sanitize_domain_name(host: &str) -> String {
    let host = host.strip_prefix("www.").unwrap_or(host);
    host.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

// Folder a job writes into: <base>/<sanitized host>
pub fn output_dir_for(base: &Path, url: &Url) -> PathBuf {
    let host = url.host_str().unwrap_or("site");
    base.join(sanitize_domain_name(host))
}

// Path of the saved page inside an output directory
pub fn index_path(output_dir: &Path) -> PathBuf {
    output_dir.join(HTML_DIR).join(INDEX_FILE)
}

// Writes `bytes` to `path`, creating missing parent folders first
//
// create_dir_all succeeds when the folder already exists, so concurrent
// tasks racing to create "images/" are fine.
pub async fn write_file(path: &Path, bytes: &[u8]) -> Result<(), MirrorError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| MirrorError::filesystem(parent, e))?;
    }

    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| MirrorError::filesystem(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(validate_input_url("https://example.com").is_ok());
        assert!(validate_input_url("http://example.com/path?q=1").is_ok());
        assert!(validate_input_url("  https://example.com/  ").is_ok());
    }

    #[test]
    fn test_rejects_bad_input() {
        for input in [
            "",
            "example.com",
            "not a url",
            "ftp://example.com/file",
            "file:///etc/passwd",
            "mailto:someone@example.com",
            "javascript:alert(1)",
        ] {
            assert!(
                matches!(
                    validate_input_url(input),
                    Err(MirrorError::InvalidInputUrl { .. })
                ),
                "{:?} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_sanitize_domain_name() {
        assert_eq!(sanitize_domain_name("www.example.com"), "example.com");
        assert_eq!(sanitize_domain_name("sub.example-site.org"), "sub.example-site.org");
        assert_eq!(sanitize_domain_name("[::1]"), "___1_");
    }

    #[test]
    fn test_output_dir_for() {
        let url = Url::parse("https://www.example.com/page").unwrap();
        assert_eq!(
            output_dir_for(Path::new("/tmp/out"), &url),
            PathBuf::from("/tmp/out/example.com")
        );
    }

    #[tokio::test]
    async fn test_write_file_creates_folders_and_is_repeatable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("site").join("images").join("a.png");

        write_file(&path, b"first").await.unwrap();
        write_file(&path, b"second").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_write_file_reports_path_on_failure() {
        let dir = TempDir::new().unwrap();
        // A regular file where a folder is expected
        let blocker = dir.path().join("images");
        std::fs::write(&blocker, b"not a folder").unwrap();

        let result = write_file(&blocker.join("a.png"), b"data").await;
        assert!(matches!(result, Err(MirrorError::Filesystem { .. })));
    }
}

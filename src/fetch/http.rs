// src/fetch/http.rs
// =============================================================================
// This module downloads raw bytes over HTTP.
//
// Key functionality:
// - Builds one shared reqwest client (timeout + User-Agent baked in)
// - Makes a single GET and classifies what went wrong (timeout, connect, status)
// - Retries a resource a bounded number of times before giving up
//
// Rust concepts:
// - async/await: For network I/O without blocking other downloads
// - Result<T, E>: For a single attempt that can fail
// - Enums: To represent the different failure kinds and the final outcome
// =============================================================================

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

// Why a single attempt failed
//
// #[derive(Error)] from thiserror gives us Display + std::error::Error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request did not finish within the configured timeout
    #[error("request timed out")]
    Timeout,
    /// Could not connect (refused, DNS failure, TLS handshake, ...)
    #[error("connection failed: {message}")]
    Connect { message: String },
    /// The server answered with a non-2xx status
    #[error("HTTP {status}")]
    HttpStatus { status: u16 },
    /// Anything else reqwest reported (broken body, bad redirect, ...)
    #[error("request failed: {message}")]
    Request { message: String },
}

// The final result of fetching one resource, after all retries
#[derive(Debug)]
pub enum FetchOutcome {
    /// The exact response body, untouched
    Success(Vec<u8>),
    /// Every attempt failed; `error` is the last failure
    Failure { error: FetchError, attempts: u32 },
}

// Creates the HTTP client shared by every request of a job
//
// Client is cheap to clone (it's an Arc internally), so tasks clone it
// instead of building their own. That also gives us connection pooling.
pub fn build_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(config.request_timeout)
        .user_agent(config.user_agent.clone())
        .build()
}

// Performs one GET request and returns the body bytes
//
// A response only counts as success when the status is 2xx. The body is
// read with .bytes() so binary files (images, fonts) are never re-encoded.
pub async fn fetch_once(client: &Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let response = client.get(url).send().await.map_err(categorize_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus {
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await.map_err(categorize_error)?;
    Ok(body.to_vec())
}

// Fetches a resource, trying up to `max_attempts` times in total
//
// This is a plain loop with a counter, so repeated failures never grow the
// call stack. A success on attempt k returns right away (no attempt k+1).
pub async fn fetch_with_retry(
    client: &Client,
    url: &str,
    max_attempts: u32,
    retry_delay: Duration,
) -> FetchOutcome {
    // A limit of 0 would mean "never try", which makes no sense
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        match fetch_once(client, url).await {
            Ok(body) => {
                debug!(url, attempt, bytes = body.len(), "fetched resource");
                return FetchOutcome::Success(body);
            }
            Err(error) if attempt < max_attempts => {
                warn!(
                    url,
                    error = %error,
                    remaining = max_attempts - attempt,
                    "fetch failed, retrying"
                );
                if !retry_delay.is_zero() {
                    tokio::time::sleep(retry_delay).await;
                }
            }
            Err(error) => {
                debug!(url, attempts = attempt, error = %error, "no attempts left");
                return FetchOutcome::Failure {
                    error,
                    attempts: attempt,
                };
            }
        }
    }
}

// Sorts reqwest errors into our FetchError kinds
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_connect() {
        FetchError::Connect {
            message: error.to_string(),
        }
    } else if let Some(status) = error.status() {
        FetchError::HttpStatus {
            status: status.as_u16(),
        }
    } else {
        FetchError::Request {
            message: error.to_string(),
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why .bytes() instead of .text()?
//    - .text() decodes the body as UTF-8 (lossy for binary data)
//    - .bytes() hands back exactly what the server sent
//    - A PNG saved from .text() would be corrupted
//
// 2. What does `Err(error) if attempt < max_attempts` mean?
//    - It's a match guard: the arm only matches when the condition is true
//    - The next arm `Err(error)` catches the remaining case (no attempts left)
//
// 3. Why retry on every failure?
//    - We can't tell a flaky network from a dead server after one try
//    - The attempt limit keeps the cost bounded either way
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client() -> Client {
        build_client(&Config::default()).unwrap()
    }

    #[tokio::test]
    async fn test_success_on_first_attempt_stops() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/app.js"))
            .respond_with(ResponseTemplate::new(200).set_body_string("console.log(1);"))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/app.js", server.uri());
        let outcome = fetch_with_retry(&test_client(), &url, 3, Duration::ZERO).await;

        match outcome {
            FetchOutcome::Success(body) => assert_eq!(body, b"console.log(1);"),
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_exhausts_all_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/broken.css"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let url = format!("{}/broken.css", server.uri());
        let outcome = fetch_with_retry(&test_client(), &url, 3, Duration::ZERO).await;

        match outcome {
            FetchOutcome::Failure { error, attempts } => {
                assert_eq!(attempts, 3);
                assert_eq!(error, FetchError::HttpStatus { status: 500 });
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_succeeds_on_second_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky.png"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"png".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/flaky.png", server.uri());
        let outcome = fetch_with_retry(&test_client(), &url, 3, Duration::ZERO).await;
        assert!(matches!(outcome, FetchOutcome::Success(ref body) if body == b"png"));
    }

    #[tokio::test]
    async fn test_zero_attempts_still_tries_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/missing.gif", server.uri());
        let outcome = fetch_with_retry(&test_client(), &url, 0, Duration::ZERO).await;

        match outcome {
            FetchOutcome::Failure { attempts, .. } => assert_eq!(attempts, 1),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_binary_body_is_untouched() {
        // PNG signature plus bytes that are not valid UTF-8
        let png: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0xFF, 0xFE];
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/logo.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(png.clone()))
            .mount(&server)
            .await;

        let url = format!("{}/logo.png", server.uri());
        let body = fetch_once(&test_client(), &url).await.unwrap();
        assert_eq!(body, png);
    }

    #[tokio::test]
    async fn test_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", crate::config::USER_AGENT))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let result = fetch_once(&test_client(), &server.uri()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_timeout_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let config = Config {
            request_timeout: Duration::from_millis(50),
            ..Config::default()
        };
        let client = build_client(&config).unwrap();
        let result = fetch_once(&client, &server.uri()).await;
        assert_eq!(result, Err(FetchError::Timeout));
    }

    #[tokio::test]
    async fn test_connection_refused_is_classified() {
        // Bind to learn a free port, then close it so nothing is listening
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let url = format!("http://127.0.0.1:{}/", port);
        let result = fetch_once(&test_client(), &url).await;
        assert!(matches!(result, Err(FetchError::Connect { .. })));
    }
}

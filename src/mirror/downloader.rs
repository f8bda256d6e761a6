// src/mirror/downloader.rs
// =============================================================================
// This module runs one download job from start to finish.
//
// How it works:
// 1. Fetch the page (one try, no retries; failure ends the job)
// 2. Save it to html/index.html
// 3. Extract the resources it references
// 4. Resolve each reference and give it a unique file name
// 5. Spawn a download task per resource through the concurrency limiter
// 6. Wait for every task, collecting what was saved and what failed
//
// A failed resource never fails the job. Only a bad root page (or failing
// to write it) does.
//
// Rust concepts:
// - tokio::spawn: Each resource download is its own task
// - JoinHandle: A handle we can await to get a task's result
// - Serialize: The final report can be printed as JSON
// =============================================================================

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::future::join_all;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::Config;
use crate::error::MirrorError;
use crate::extract::{extract_resources, ResourceCategory};
use crate::fetch::{build_client, fetch_once, fetch_with_retry, ConcurrencyLimiter, FetchOutcome};
use crate::mirror::output::{index_path, write_file};
use crate::mirror::resolve::{resolve, FetchTarget, NameRegistry};

// Where a job is in its lifecycle
//
// Idle -> FetchingRoot -> RootSaved -> ExtractingResources
//      -> DispatchingResources -> AwaitingAll -> Done
// Any root fetch/save failure jumps straight to Failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Idle,
    FetchingRoot,
    RootSaved,
    ExtractingResources,
    DispatchingResources,
    AwaitingAll,
    Done,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct SavedResource {
    pub url: String,
    pub category: ResourceCategory,
    pub path: PathBuf,
    pub bytes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedResource {
    pub url: String,
    pub category: ResourceCategory,
    pub reason: String,
    /// Number of fetch attempts; None when the fetch worked but saving didn't
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedReference {
    pub reference: String,
    pub reason: String,
}

// Everything a finished job produced
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub url: String,
    pub output_dir: PathBuf,
    pub root_path: PathBuf,
    pub state: JobState,
    pub saved: Vec<SavedResource>,
    pub failed: Vec<FailedResource>,
    pub skipped: Vec<SkippedReference>,
}

impl JobReport {
    /// True when every referenced resource made it to disk
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}

// What a single resource task hands back
enum ResourceResult {
    Saved(SavedResource),
    Failed(FailedResource),
}

// Downloads a page and its embedded resources
//
// Build one with a Config, then call run() per page. The HTTP client and the
// limiter are shared by all resource tasks of a job.
pub struct SiteDownloader {
    config: Config,
    client: Client,
    limiter: ConcurrencyLimiter,
}

impl SiteDownloader {
    pub fn new(config: Config) -> Result<Self, MirrorError> {
        let client = build_client(&config)?;
        let limiter = ConcurrencyLimiter::new(config.concurrency);
        Ok(Self {
            config,
            client,
            limiter,
        })
    }

    // Runs a whole job for `url`, writing into `output_dir`
    //
    // Returns:
    //   Ok(report) - the page was saved (resources may still have failed)
    //   Err(e)     - the page could not be fetched or saved; nothing was fetched after it
    pub async fn run(&self, url: &Url, output_dir: &Path) -> Result<JobReport, MirrorError> {
        let mut state = JobState::Idle;

        info!(url = %url, output_dir = %output_dir.display(), "starting download");
        advance(&mut state, JobState::FetchingRoot);

        let body = match fetch_once(&self.client, url.as_str()).await {
            Ok(body) => body,
            Err(source) => {
                advance(&mut state, JobState::Failed);
                return Err(MirrorError::RootFetch {
                    url: url.to_string(),
                    source,
                });
            }
        };

        let root_path = index_path(output_dir);
        if let Err(e) = write_file(&root_path, &body).await {
            advance(&mut state, JobState::Failed);
            return Err(e);
        }
        info!(path = %root_path.display(), bytes = body.len(), "saved page");
        advance(&mut state, JobState::RootSaved);

        advance(&mut state, JobState::ExtractingResources);
        let references = extract_resources(&body);
        info!(count = references.len(), "found resources to download");

        advance(&mut state, JobState::DispatchingResources);
        let mut registry = NameRegistry::new();
        let mut skipped = Vec::new();
        let mut tasks = Vec::new();

        for reference in references {
            let target = match resolve(url, &reference) {
                Ok(target) => target,
                Err(e) => {
                    warn!(error = %e, "skipping reference");
                    skipped.push(SkippedReference {
                        reference: reference.raw_reference,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let Some(file_name) = registry.claim(&target) else {
                debug!(url = %target.resolved_url, "already scheduled, skipping duplicate");
                continue;
            };

            let path = output_dir
                .join(target.output_subdirectory())
                .join(file_name);

            let url = target.resolved_url.to_string();
            let category = target.category;
            let task = download_resource(
                self.client.clone(),
                target,
                path,
                self.config.max_attempts,
                self.config.retry_delay,
            );
            let handle = self.limiter.spawn(task).await;
            tasks.push(((url, category), handle));
        }

        advance(&mut state, JobState::AwaitingAll);
        debug!(
            tasks = tasks.len(),
            limit = self.limiter.limit(),
            free_slots = self.limiter.available(),
            "waiting for resource downloads"
        );

        let (sources, handles): (Vec<_>, Vec<_>) = tasks.into_iter().unzip();
        let mut saved = Vec::new();
        let mut failed = Vec::new();
        for ((url, category), result) in sources.into_iter().zip(join_all(handles).await) {
            match result {
                Ok(ResourceResult::Saved(resource)) => saved.push(resource),
                Ok(ResourceResult::Failed(resource)) => failed.push(resource),
                Err(e) => {
                    error!(url = %url, error = %e, "resource task crashed");
                    failed.push(FailedResource {
                        url,
                        category,
                        reason: e.to_string(),
                        attempts: None,
                    });
                }
            }
        }

        advance(&mut state, JobState::Done);
        info!(
            saved = saved.len(),
            failed = failed.len(),
            skipped = skipped.len(),
            "download complete"
        );

        Ok(JobReport {
            url: url.to_string(),
            output_dir: output_dir.to_path_buf(),
            root_path,
            state,
            saved,
            failed,
            skipped,
        })
    }
}

fn advance(state: &mut JobState, next: JobState) {
    debug!(from = ?state, to = ?next, "job state");
    *state = next;
}

// Fetches one resource (with retries) and writes it to `path`
//
// All errors stop here: they are logged and turned into a FailedResource.
async fn download_resource(
    client: Client,
    target: FetchTarget,
    path: PathBuf,
    max_attempts: u32,
    retry_delay: Duration,
) -> ResourceResult {
    let url = target.resolved_url.to_string();

    match fetch_with_retry(&client, &url, max_attempts, retry_delay).await {
        FetchOutcome::Success(body) => match write_file(&path, &body).await {
            Ok(()) => {
                info!(url = %url, path = %path.display(), "saved resource");
                ResourceResult::Saved(SavedResource {
                    url,
                    category: target.category,
                    path,
                    bytes: body.len(),
                })
            }
            Err(e) => {
                error!(url = %url, error = %e, "could not save resource");
                ResourceResult::Failed(FailedResource {
                    url,
                    category: target.category,
                    reason: e.to_string(),
                    attempts: None,
                })
            }
        },
        FetchOutcome::Failure { error, attempts } => {
            let e = MirrorError::ResourceFetch {
                url: url.clone(),
                attempts,
                source: error,
            };
            error!(error = %e, "giving up on resource");
            ResourceResult::Failed(FailedResource {
                url,
                category: target.category,
                reason: e.to_string(),
                attempts: Some(attempts),
            })
        }
    }
}

//! HTTP client for the GitHub Actions workflow dispatch API.

use crate::error::DispatchError;
use crate::request::{DispatchRequest, DispatchTarget};
use crate::retry::{AttemptVerdict, DispatchAttempt, Sleeper, TokioSleeper};
use collection_trigger_core::Result;
use reqwest::Url;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Span, debug, info, instrument, warn};

/// Public GitHub REST API.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Upper bound on a single dispatch call, connection included.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
const JSON_MEDIA_TYPE: &str = "application/json";
const CLIENT_USER_AGENT: &str = "collection-trigger-dispatch";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";

#[derive(Debug, Serialize)]
struct DispatchPayload<'a> {
    #[serde(rename = "ref")]
    git_ref: &'a str,
}

/// Outcome of a successful dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReceipt {
    /// Number of HTTP calls made, including the successful one.
    pub attempts: u32,
}

/// Triggers `workflow_dispatch` events with bounded retry.
///
/// Attempts are strictly sequential. Each one performs exactly one POST,
/// and the only other suspension point is the backoff wait between them.
#[derive(Clone)]
pub struct DispatchClient {
    http: reqwest::Client,
    api_base: String,
    sleeper: Arc<dyn Sleeper>,
}

impl DispatchClient {
    /// Creates a client against the public GitHub API with the default
    /// request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Transport`] if the HTTP client cannot be
    /// built (for example when no TLS backend is available).
    pub fn new() -> std::result::Result<Self, DispatchError> {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Creates a client whose requests are abandoned after `timeout`.
    ///
    /// A timed-out request fails the dispatch as a transport error; it is
    /// not retried.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Transport`] if the HTTP client cannot be
    /// built.
    pub fn with_timeout(timeout: Duration) -> std::result::Result<Self, DispatchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DispatchError::Transport {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self::with_http_client(http))
    }

    /// Creates a client that sends requests through `http`.
    #[must_use]
    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self {
            http,
            api_base: DEFAULT_API_BASE.to_string(),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Points the client at a different API root, such as a GitHub
    /// Enterprise Server (`https://github.example.com/api/v3`).
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Replaces the backoff sleeper.
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Returns the API root requests are sent to.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Builds the dispatch URL for `target`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the API base is not a usable URL.
    pub fn endpoint(&self, target: &DispatchTarget) -> std::result::Result<Url, DispatchError> {
        let invalid_base = |reason: String| DispatchError::Configuration {
            field: "api_base",
            reason,
        };

        let mut url = Url::parse(&self.api_base).map_err(|e| invalid_base(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid_base("URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend([
                "repos",
                target.owner.as_str(),
                target.repo.as_str(),
                "actions",
                "workflows",
                target.workflow.as_str(),
                "dispatches",
            ]);
        Ok(url)
    }

    /// Dispatches the configured workflow.
    ///
    /// Status 204 is success. 429 and 5xx are retried after a linear
    /// backoff while the retry budget lasts; any other status, or a
    /// transient one with no retries left, fails with the status and body.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::Configuration`] before any request if a
    ///   mandatory field is missing.
    /// - [`DispatchError::Rejected`] on a terminal response.
    /// - [`DispatchError::Transport`] if a request produced no response.
    #[instrument(skip_all, fields(owner, repo, workflow, git_ref, max_attempts))]
    pub async fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchReceipt, DispatchError> {
        let target = request.validate()?;
        let url = self.endpoint(&target)?;

        let span = Span::current();
        span.record("owner", target.owner.as_str());
        span.record("repo", target.repo.as_str());
        span.record("workflow", target.workflow.as_str());
        span.record("git_ref", target.git_ref.as_str());
        span.record("max_attempts", target.max_attempts());

        let mut attempt_index = 0;
        loop {
            let attempt = self.send(&url, &target, attempt_index).await?;

            if attempt.verdict() == AttemptVerdict::Success {
                let attempts = attempt_index + 1;
                info!(
                    attempts,
                    "dispatched {} on {}/{}@{}",
                    target.workflow,
                    target.owner,
                    target.repo,
                    target.git_ref
                );
                return Ok(DispatchReceipt { attempts });
            }

            let Some(backoff) = attempt.retry_after(target.max_retries) else {
                return Err(DispatchError::rejected(attempt.status, attempt.body).into());
            };

            warn!(
                status = attempt.status,
                attempt = attempt_index + 1,
                backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
                "dispatch failed with {}, retrying",
                attempt.status
            );
            self.sleeper.sleep(backoff).await;
            attempt_index += 1;
        }
    }

    async fn send(
        &self,
        url: &Url,
        target: &DispatchTarget,
        attempt_index: u32,
    ) -> std::result::Result<DispatchAttempt, DispatchError> {
        let response = self
            .http
            .post(url.clone())
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .bearer_auth(&target.token)
            .header(CONTENT_TYPE, JSON_MEDIA_TYPE)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .header(API_VERSION_HEADER, API_VERSION)
            .json(&DispatchPayload {
                git_ref: &target.git_ref,
            })
            .send()
            .await
            .map_err(|e| DispatchError::Transport {
                reason: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body = if status == crate::retry::SUCCESS_STATUS {
            String::new()
        } else {
            response.text().await.unwrap_or_else(|e| {
                debug!(error = %e, "failed to read dispatch response body");
                String::new()
            })
        };

        Ok(DispatchAttempt {
            attempt_index,
            status,
            body,
        })
    }
}

impl fmt::Debug for DispatchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchClient")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

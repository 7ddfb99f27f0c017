//! Trigger configuration.
//!
//! Loaded via the `config` crate from environment variables. The GitHub
//! variables keep the names the dispatch target has always been configured
//! with (`GITHUB_OWNER`, `GITHUB_TOKEN`, ...).

use collection_trigger_dispatch::{
    DEFAULT_API_BASE, DEFAULT_REQUEST_TIMEOUT, DispatchClient, DispatchError, DispatchRequest,
};
use serde::Deserialize;
use std::time::Duration;

/// Configuration for one trigger process.
///
/// Mandatory dispatch fields are optional here: their absence is reported
/// by the dispatch itself as a configuration error, before any request.
#[derive(Deserialize)]
pub struct TriggerConfig {
    #[serde(default)]
    pub github_owner: Option<String>,
    #[serde(default)]
    pub github_repo: Option<String>,
    /// Workflow file name or numeric ID.
    #[serde(default)]
    pub github_workflow: Option<String>,
    #[serde(default)]
    pub github_ref: Option<String>,
    #[serde(default)]
    pub github_token: Option<String>,
    #[serde(default)]
    pub github_dispatch_max_retries: Option<i64>,

    /// API root; override for GitHub Enterprise Server.
    #[serde(default = "default_api_base")]
    pub github_api_base: String,

    /// Per-request deadline for dispatch calls. Zero or unset uses the
    /// client default.
    #[serde(default)]
    pub github_request_timeout_seconds: Option<u64>,

    /// When set, run as a long-lived process firing every N seconds
    /// instead of handling a single event and exiting.
    #[serde(default)]
    pub trigger_interval_seconds: Option<u64>,

    /// Dispatch regardless of the collection window.
    #[serde(default)]
    pub trigger_force: bool,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

/// How the process is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Handle one event, then exit. For cron or a platform scheduler.
    Once,
    /// Fire on a fixed period until interrupted.
    Every(Duration),
}

impl TriggerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be parsed into its field type.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(None)
    }

    fn from_source(
        source: Option<config::Map<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .ignore_empty(true)
                    .source(source),
            )
            .build()?
            .try_deserialize()
    }

    /// Builds the dispatch request from the GitHub settings.
    #[must_use]
    pub fn dispatch_request(&self) -> DispatchRequest {
        DispatchRequest {
            owner: self.github_owner.clone(),
            repo: self.github_repo.clone(),
            workflow: self.github_workflow.clone(),
            git_ref: self.github_ref.clone(),
            token: self.github_token.clone(),
            max_retries: self.github_dispatch_max_retries,
        }
    }

    /// Builds a dispatch client against the configured API root.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn dispatch_client(&self) -> Result<DispatchClient, DispatchError> {
        Ok(DispatchClient::with_timeout(self.request_timeout())?
            .with_api_base(self.github_api_base.clone()))
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        match self.github_request_timeout_seconds {
            Some(seconds) if seconds > 0 => Duration::from_secs(seconds),
            _ => DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// A zero interval means one-shot.
    #[must_use]
    pub fn run_mode(&self) -> RunMode {
        match self.trigger_interval_seconds {
            Some(seconds) if seconds > 0 => RunMode::Every(Duration::from_secs(seconds)),
            _ => RunMode::Once,
        }
    }
}

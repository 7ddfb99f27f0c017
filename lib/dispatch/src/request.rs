//! Dispatch request parameters and their validation.

use crate::error::DispatchError;
use std::fmt;

/// Git ref dispatched when none is configured.
pub const DEFAULT_REF: &str = "main";

/// Retries allowed after the first attempt when none is configured.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Parameters for a workflow dispatch, as supplied by configuration.
///
/// Owner, repo, workflow, and token are mandatory. They are optional here
/// so that their absence can be reported as a configuration error by
/// [`DispatchRequest::validate`] rather than at construction.
#[derive(Clone, Default)]
pub struct DispatchRequest {
    pub owner: Option<String>,
    pub repo: Option<String>,
    /// Workflow file name (e.g. `scheduled-update.yml`) or numeric ID.
    pub workflow: Option<String>,
    pub git_ref: Option<String>,
    pub token: Option<String>,
    /// Negative values are clamped to zero.
    pub max_retries: Option<i64>,
}

impl DispatchRequest {
    /// Creates a request with all mandatory fields set.
    #[must_use]
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        workflow: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            owner: Some(owner.into()),
            repo: Some(repo.into()),
            workflow: Some(workflow.into()),
            token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Sets the git ref to dispatch on.
    #[must_use]
    pub fn with_ref(mut self, git_ref: impl Into<String>) -> Self {
        self.git_ref = Some(git_ref.into());
        self
    }

    /// Sets the number of retries allowed after the first attempt.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: i64) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Checks mandatory fields and applies defaults.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Configuration`] naming the first mandatory
    /// field that is missing or empty.
    pub fn validate(&self) -> Result<DispatchTarget, DispatchError> {
        let owner = required(self.owner.as_deref(), "owner")?;
        let repo = required(self.repo.as_deref(), "repo")?;
        let workflow = required(self.workflow.as_deref(), "workflow")?;
        let token = required(self.token.as_deref(), "token")?;

        let git_ref = self
            .git_ref
            .as_deref()
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_REF)
            .to_string();

        let max_retries = self.max_retries.map_or(DEFAULT_MAX_RETRIES, |value| {
            u32::try_from(value.max(0)).unwrap_or(u32::MAX)
        });

        Ok(DispatchTarget {
            owner,
            repo,
            workflow,
            git_ref,
            token,
            max_retries,
        })
    }
}

fn required(value: Option<&str>, field: &'static str) -> Result<String, DispatchError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(DispatchError::missing(field)),
    }
}

impl fmt::Debug for DispatchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchRequest")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("workflow", &self.workflow)
            .field("git_ref", &self.git_ref)
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// A validated dispatch request with defaults applied.
#[derive(Clone, PartialEq, Eq)]
pub struct DispatchTarget {
    pub owner: String,
    pub repo: String,
    pub workflow: String,
    pub git_ref: String,
    pub token: String,
    pub max_retries: u32,
}

impl DispatchTarget {
    /// Total number of attempts the retry budget allows.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl fmt::Debug for DispatchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTarget")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("workflow", &self.workflow)
            .field("git_ref", &self.git_ref)
            .field("token", &"[redacted]")
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> DispatchRequest {
        DispatchRequest::new("octo", "tracker", "scheduled-update.yml", "ghp_secret")
    }

    #[test]
    fn defaults_are_applied() {
        let target = complete().validate().expect("valid request");
        assert_eq!(target.git_ref, "main");
        assert_eq!(target.max_retries, 2);
        assert_eq!(target.max_attempts(), 3);
    }

    #[test]
    fn explicit_values_are_kept() {
        let target = complete()
            .with_ref("release")
            .with_max_retries(5)
            .validate()
            .expect("valid request");
        assert_eq!(target.git_ref, "release");
        assert_eq!(target.max_retries, 5);
    }

    #[test]
    fn empty_ref_falls_back_to_main() {
        let target = complete().with_ref("").validate().expect("valid request");
        assert_eq!(target.git_ref, DEFAULT_REF);
    }

    #[test]
    fn negative_retries_clamp_to_zero() {
        let target = complete()
            .with_max_retries(-3)
            .validate()
            .expect("valid request");
        assert_eq!(target.max_retries, 0);
        assert_eq!(target.max_attempts(), 1);
    }

    #[test]
    fn missing_token_is_rejected() {
        let request = DispatchRequest {
            token: None,
            ..complete()
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err, DispatchError::missing("token"));
    }

    #[test]
    fn empty_owner_is_rejected() {
        let request = DispatchRequest {
            owner: Some(String::new()),
            ..complete()
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err, DispatchError::missing("owner"));
    }

    #[test]
    fn first_missing_field_is_reported() {
        let err = DispatchRequest::default().validate().unwrap_err();
        assert_eq!(err, DispatchError::missing("owner"));
    }

    #[test]
    fn debug_redacts_token() {
        let request = complete();
        let rendered = format!("{request:?}");
        assert!(!rendered.contains("ghp_secret"));
        assert!(rendered.contains("[redacted]"));

        let target = request.validate().expect("valid request");
        assert!(!format!("{target:?}").contains("ghp_secret"));
    }
}

//! Error types for the dispatch crate.
//!
//! Errors are designed for layered context using rootcause. Callers receive
//! a `Report<DispatchError>` and add their own context on top.

use std::fmt;

/// Placeholder used when a failed response carried no body.
pub const EMPTY_BODY_PLACEHOLDER: &str = "no response body";

/// Errors from a workflow dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// A required parameter is missing or unusable. Raised before any
    /// request is sent and never retried.
    Configuration { field: &'static str, reason: String },
    /// The API answered with a non-204 status that was either terminal or
    /// transient with no retries left.
    Rejected { status: u16, body: String },
    /// The request never produced an HTTP status.
    Transport { reason: String },
}

impl DispatchError {
    /// Creates a configuration error for a missing or empty field.
    #[must_use]
    pub fn missing(field: &'static str) -> Self {
        Self::Configuration {
            field,
            reason: "missing required value".to_string(),
        }
    }

    /// Creates a rejection, substituting a placeholder for an empty body.
    #[must_use]
    pub fn rejected(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let body = if body.is_empty() {
            EMPTY_BODY_PLACEHOLDER.to_string()
        } else {
            body
        };
        Self::Rejected { status, body }
    }

    /// Returns the HTTP status for rejections.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Configuration { .. } | Self::Transport { .. } => None,
        }
    }

    /// Returns true for errors raised before any network call.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { field, reason } => {
                write!(f, "invalid dispatch configuration for {field}: {reason}")
            }
            Self::Rejected { status, body } => {
                write!(f, "dispatch failed ({status}): {body}")
            }
            Self::Transport { reason } => {
                write!(f, "dispatch request failed: {reason}")
            }
        }
    }
}

impl std::error::Error for DispatchError {}

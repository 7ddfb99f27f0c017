//! Error types for the scheduler crate.
//!
//! Errors are designed for layered context using rootcause: the dispatch
//! report is kept as the cause and `TriggerError` is added on top.

use collection_trigger_core::InvocationId;
use std::fmt;

/// Errors from handling a scheduled event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerError {
    /// The invocation was inside the window but the dispatch failed.
    DispatchFailed {
        invocation: InvocationId,
        /// HTTP status of the final attempt, if one was received.
        status: Option<u16>,
        reason: String,
    },
}

impl fmt::Display for TriggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DispatchFailed {
                invocation, reason, ..
            } => {
                write!(f, "invocation {invocation} failed to dispatch: {reason}")
            }
        }
    }
}

impl std::error::Error for TriggerError {}

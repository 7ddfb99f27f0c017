//! GitHub Actions workflow dispatch.
//!
//! This crate provides:
//!
//! - **Dispatch Request**: the configured target and its validation
//! - **Retry Policy**: status classification and linear backoff
//! - **Dispatch Client**: the bounded attempt loop over the HTTP API

pub mod client;
pub mod error;
pub mod request;
pub mod retry;

pub use client::{DEFAULT_API_BASE, DEFAULT_REQUEST_TIMEOUT, DispatchClient, DispatchReceipt};
pub use error::DispatchError;
pub use request::{DEFAULT_MAX_RETRIES, DEFAULT_REF, DispatchRequest, DispatchTarget};
pub use retry::{AttemptVerdict, DispatchAttempt, Sleeper, TokioSleeper, backoff_for_attempt};

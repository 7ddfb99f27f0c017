//! Core types and utilities for collection-trigger.
//!
//! This crate provides the error-handling foundation and the identifiers
//! shared by the window, dispatch, and scheduler crates.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{InvocationId, ParseIdError};

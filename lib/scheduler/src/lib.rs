//! Scheduled trigger handling.
//!
//! This crate provides:
//!
//! - **Scheduled Event**: the host scheduler's firing, stamped with a time
//! - **Trigger Handler**: window gate evaluation followed by dispatch

pub mod error;
pub mod event;
pub mod handler;

pub use error::TriggerError;
pub use event::{ScheduledEvent, TriggerSource};
pub use handler::{TriggerHandler, TriggerOutcome};

//! Collection window evaluation.
//!
//! This crate decides whether an instant falls inside the collection
//! window. The window is a fixed calendar policy resolved in Singapore
//! time (UTC+8), independent of the host machine's local zone.

pub mod gate;
pub mod parts;

pub use gate::{WindowGate, is_within_collection_window};
pub use parts::{LocalDateParts, SINGAPORE_OFFSET, SINGAPORE_OFFSET_SECONDS};

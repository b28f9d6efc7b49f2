//! # Barline Common Library
//!
//! Shared code for the Barline transport/resolver stack:
//! - Error type used across crates
//! - Transport event types and wire-level note events
//! - Configuration loading
//! - Musical time conversions (beats, bars, seconds)

pub mod config;
pub mod error;
pub mod events;
pub mod time;

pub use error::{Error, Result};

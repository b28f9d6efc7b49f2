//! # Barline Engine
//!
//! The live transport: converts wall-clock audio time into bar-quantized
//! compile requests against an external compile service, and schedules the
//! returned events on the audio engine at absolute output-clock timestamps.
//!
//! Core pieces:
//! - [`scheduler::TransportScheduler`]: lookahead windowing, exactly-once
//!   per-bar dispatch, session-token invalidation
//! - [`compile`]: the compile-service wire contract and HTTP client
//! - [`payload`]: flow-graph walk that normalizes and resolves every
//!   thought node into the compile payload
//! - [`audio`]: the audio engine seam the scheduler drives

pub mod audio;
pub mod compile;
pub mod error;
pub mod graph;
pub mod payload;
pub mod scheduler;
pub mod state;

pub use error::{Error, Result};

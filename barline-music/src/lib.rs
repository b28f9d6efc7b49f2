//! # Barline Music Library
//!
//! Pure musical-intent machinery:
//! - Static catalogs (styles, moods, patterns, progressions, instruments)
//! - Seeded deterministic RNG primitives
//! - Thought parameter normalization (legacy-flat → canonical nested)
//! - The style resolver: a pure function from declared intent to concrete
//!   performance parameters
//!
//! Nothing in this crate performs I/O or holds mutable state; every public
//! operation is a deterministic function of its inputs.

pub mod catalog;
pub mod resolver;
pub mod rng;
pub mod thought;

/// Resolver algorithm version, embedded in every resolved view so that
/// downstream consumers can detect artifacts produced by an older resolver.
pub const RESOLVER_VERSION: &str = "1.0.0";

pub use resolver::{resolve, ResolveInput, ResolvedStyle};
pub use thought::{normalize_thought, MoodMode, Thought};

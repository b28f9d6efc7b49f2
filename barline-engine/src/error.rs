//! Error types for the transport engine

use thiserror::Error;

/// Main error type for barline-engine
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Compile service returned a failure status or malformed body
    #[error("Compile error: {0}")]
    Compile(String),

    /// Network-level failure talking to the compile service
    #[error("Compile transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// No audio engine attached, or the engine refused to start
    #[error("Audio engine error: {0}")]
    AudioEngine(String),

    /// JSON encode/decode errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Operation not valid in the current transport state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Shared error types from barline-common
    #[error(transparent)]
    Common(#[from] barline_common::Error),
}

/// Result type alias for barline-engine operations
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for the ideaforge pipeline.
//!
//! The taxonomy follows the run model: a fatal startup error (missing
//! credential) halts before any input is accepted, and the first generation
//! error of a run aborts the remaining stages while completed outputs stay
//! available for display.

use crate::stages::StageName;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The top-level error type for ideaforge operations.
#[derive(Debug, Error)]
pub enum IdeaforgeError {
    /// Configuration failed to load at startup.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// A generation call failed.
    #[error("{0}")]
    Generation(#[from] GenerationError),

    /// The stage catalog is mis-wired.
    #[error("{0}")]
    Wiring(#[from] WiringError),

    /// IO error while writing an artifact.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading configuration at startup.
///
/// These are fatal: the session reports them and accepts no input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The generation-service API key is absent or blank.
    #[error("API key not found: set the `{var}` environment variable")]
    MissingApiKey {
        /// The environment variable that was consulted.
        var: String,
    },
}

impl ConfigError {
    /// Creates a missing-API-key error.
    #[must_use]
    pub fn missing_api_key(var: impl Into<String>) -> Self {
        Self::MissingApiKey { var: var.into() }
    }
}

/// Errors raised by a text-generation call.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The generation service returned a non-success status.
    #[error("generation API error (status {status}): {message}")]
    Api {
        /// The HTTP status code.
        status: u16,
        /// The response body, verbatim.
        message: String,
    },

    /// A streamed event could not be parsed.
    #[error("malformed stream event: {0}")]
    MalformedEvent(String),

    /// A scripted failure raised by a mock generator.
    #[error("scripted failure: {0}")]
    Scripted(String),
}

impl GenerationError {
    /// Creates an API error from a status code and response body.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}

/// The first failure of a pipeline run.
///
/// A run surfaces exactly one of these; stages after the failing one are
/// never invoked.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("stage '{stage}' failed: {message}")]
pub struct StageFailure {
    /// The stage that failed.
    pub stage: StageName,
    /// Description of the underlying error.
    pub message: String,
}

impl StageFailure {
    /// Creates a new stage failure.
    #[must_use]
    pub fn new(stage: StageName, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

/// Error raised when a stage catalog consumes an output that does not
/// precede it in declaration order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("stage '{stage}' consumes the output of '{input}', which does not precede it")]
pub struct WiringError {
    /// The mis-wired stage.
    pub stage: StageName,
    /// The input stage it tried to consume.
    pub input: StageName,
}

impl WiringError {
    /// Creates a new wiring error.
    #[must_use]
    pub fn new(stage: StageName, input: StageName) -> Self {
        Self { stage, input }
    }
}

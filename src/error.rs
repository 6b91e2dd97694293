//! Error types for pipeforge operations.
//!
//! Defines error types for the major subsystems:
//! - Configuration loading and dotted-path lookup
//! - Artifact reference naming rules
//! - Step selection validation and external step execution

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or querying configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config document: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Config key '{0}' not found")]
    MissingKey(String),

    #[error("Config key '{key}' has the wrong type: expected {expected}")]
    WrongType { key: String, expected: &'static str },
}

/// Errors that can occur while forming artifact references.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact name '{0}' is empty once the version qualifier is stripped")]
    EmptyName(String),
}

/// Errors that can occur while resolving or running the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Step '{0}' is not in the registry")]
    UnknownStep(String),

    #[error("Step '{step}' was requested before '{dependency}', which produces an artifact it consumes")]
    DependencyOrder { step: String, dependency: String },

    #[error("Step '{step}' failed with {status}")]
    StepFailed {
        step: String,
        status: std::process::ExitStatus,
    },

    #[error("Failed to launch step '{step}': {source}")]
    Spawn {
        step: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

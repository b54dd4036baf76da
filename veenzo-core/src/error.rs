//! Error types for the veenzo ecosystem.

use thiserror::Error;

use crate::event_spec::ValidationError;

/// Errors that can occur in veenzo operations.
#[derive(Error, Debug)]
pub enum VeenzoError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Remote calendar error: {0}")]
    Remote(String),

    #[error("Remote calendar rejected credentials: {0}")]
    RemoteAuth(String),

    #[error("Invalid remote payload: {0}")]
    InvalidPayload(String),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("No remote calendar connected to project '{0}'")]
    NoRemoteConfigured(String),
}

/// Result type alias for veenzo operations.
pub type VeenzoResult<T> = Result<T, VeenzoError>;

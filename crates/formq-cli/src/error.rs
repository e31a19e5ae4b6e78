use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] formq_core::Error),
    #[error(transparent)]
    Transport(#[from] formq_core::transport::TransportError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No form fields provided")]
    EmptyPayload,
    #[error("Invalid field '{0}': expected NAME=VALUE")]
    InvalidField(String),
    #[error("Invalid attachment '{0}': expected FIELD=PATH")]
    InvalidAttachment(String),
    #[error("Submission failed: {0}")]
    SubmissionFailed(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(
        "Submission endpoint is not configured. Run `formq config init --set-endpoint URL`, pass --endpoint, or set FORMQ_ENDPOINT."
    )]
    EndpointNotConfigured,
}

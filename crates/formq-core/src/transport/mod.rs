//! Delivery of payloads to the remote endpoint.

mod http;

use thiserror::Error;

use crate::models::FormPayload;

pub use http::HttpTransport;

/// Marker the endpoint writes into the body of an accepted submission
pub const SUCCESS_MARKER: &str = "SUCCESS";

/// Marker the endpoint writes when it already holds the submission
pub const DUPLICATE_MARKER: &str = "DUPLICATE";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Invalid transport configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Submission HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Submission transport I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type TransportResult<T> = Result<T, TransportError>;

/// Sends one payload and returns the endpoint's plain-text response body.
#[allow(async_fn_in_trait)]
pub trait SubmissionTransport {
    async fn deliver(&self, payload: &FormPayload) -> TransportResult<String>;
}

/// How the endpoint answered a delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryResponse {
    Success,
    Duplicate,
    Rejected,
}

impl DeliveryResponse {
    /// Classify a response body by substring; `SUCCESS` wins over `DUPLICATE`.
    pub fn classify(body: &str) -> Self {
        if body.contains(SUCCESS_MARKER) {
            Self::Success
        } else if body.contains(DUPLICATE_MARKER) {
            Self::Duplicate
        } else {
            Self::Rejected
        }
    }

    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

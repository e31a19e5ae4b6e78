//! Queue configuration.
//!
//! `QueueConfig` names the remote endpoint and how payloads are encoded on
//! the wire. Clients build it from flags, environment or a profile file and
//! validate it once before constructing a transport.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

/// Wire encoding of a submitted payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormEncoding {
    /// `multipart/form-data`
    #[default]
    Multipart,
    /// `application/x-www-form-urlencoded`
    UrlEncoded,
}

impl fmt::Display for FormEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Multipart => f.write_str("multipart"),
            Self::UrlEncoded => f.write_str("urlencoded"),
        }
    }
}

impl FromStr for FormEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "multipart" | "form-data" => Ok(Self::Multipart),
            "urlencoded" | "url-encoded" | "form" => Ok(Self::UrlEncoded),
            other => Err(Error::InvalidInput(format!(
                "unknown form encoding '{other}' (expected multipart or urlencoded)"
            ))),
        }
    }
}

/// Endpoint and delivery settings for a submission queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// Remote endpoint receiving form POSTs
    pub endpoint: String,
    /// Payload encoding
    pub encoding: FormEncoding,
    /// Per-request timeout; `None` leaves the transport default in place
    pub request_timeout: Option<Duration>,
    /// Ask notifiers for a haptic cue on confirmed delivery
    pub haptic: bool,
}

impl QueueConfig {
    /// Create a configuration for an endpoint, validating its URL
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Ok(Self {
            endpoint: normalize_endpoint(endpoint.into())?,
            encoding: FormEncoding::default(),
            request_timeout: None,
            haptic: false,
        })
    }

    /// Set the payload encoding
    #[must_use]
    pub const fn with_encoding(mut self, encoding: FormEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set a per-request timeout
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Enable or disable the haptic cue
    #[must_use]
    pub const fn with_haptic(mut self, haptic: bool) -> Self {
        self.haptic = haptic;
        self
    }
}

/// Trim an endpoint URL and require an http(s) scheme.
pub fn normalize_endpoint(raw: String) -> Result<String> {
    let endpoint = normalize_text_option(Some(raw))
        .ok_or_else(|| Error::InvalidInput("endpoint must not be empty".to_string()))?;
    if is_http_url(&endpoint) {
        Ok(endpoint.trim_end_matches('/').to_string())
    } else {
        Err(Error::InvalidInput(
            "endpoint must include http:// or https://".to_string(),
        ))
    }
}

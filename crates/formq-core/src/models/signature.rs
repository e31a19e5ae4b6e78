//! Canonical content signature for payloads
//!
//! The signature is part of the queue's contract: two payloads with the same
//! fields and values collapse into one queued record, whatever their field
//! order.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::FormPayload;

/// SHA-256 of a payload's canonical encoding, as 64 lowercase hex characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentSignature(String);

impl ContentSignature {
    /// Compute the signature of a payload
    #[must_use]
    pub fn of(payload: &FormPayload) -> Self {
        Self(hex::encode(Sha256::digest(
            canonical_encoding(payload).as_bytes(),
        )))
    }

    /// Wrap a signature previously read back from storage
    pub(crate) const fn from_stored(value: String) -> Self {
        Self(value)
    }

    /// Get the hex representation of this signature
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable text form of a payload.
///
/// Fields are sorted by name (byte order), and each one is written as
/// `<name length>:<name><value length>:<value>` with lengths in bytes.
/// Length prefixes keep `{"a": "b:c"}` and `{"a:b": "c"}` apart.
#[must_use]
pub fn canonical_encoding(payload: &FormPayload) -> String {
    let mut fields: Vec<(&str, &str)> = payload.iter().collect();
    fields.sort_unstable_by(|left, right| left.0.cmp(right.0));

    fields
        .into_iter()
        .map(|(name, value)| format!("{}:{name}{}:{value}", name.len(), value.len()))
        .collect()
}

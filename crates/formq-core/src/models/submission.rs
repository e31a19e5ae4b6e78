//! Pending submission model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{ContentSignature, FormPayload};

/// Store-assigned identifier of a queued submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(i64);

impl SubmissionId {
    pub(crate) const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw row id
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SubmissionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// A form submission waiting in the local queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSubmission {
    /// Store-assigned identifier
    pub id: SubmissionId,
    /// Submitted fields, never modified after insert
    pub payload: FormPayload,
    /// Queue timestamp (Unix ms)
    pub captured_at: i64,
    /// Content signature computed at enqueue time
    pub signature: ContentSignature,
}

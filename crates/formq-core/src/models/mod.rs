//! Data models for formq

mod payload;
mod signature;
mod submission;

pub use payload::{attachment_fields, FormPayload};
pub use signature::{canonical_encoding, ContentSignature};
pub use submission::{PendingSubmission, SubmissionId};

//! formq-core - Core library for formq
//!
//! This crate contains the payload model, the local submission store, the
//! HTTP transport and the resync queue used by the `formq` command-line
//! client.

pub mod config;
pub mod connectivity;
pub mod db;
pub mod error;
pub mod form;
pub mod models;
pub mod notice;
pub mod queue;
pub mod transport;
pub mod util;

pub use error::{Error, Result};
pub use models::{ContentSignature, FormPayload, PendingSubmission, SubmissionId};
pub use queue::{EnqueueOutcome, ResyncReport, SubmissionQueue, SubmitOutcome};

//! Database layer for formq

mod connection;
mod migrations;
mod submission_store;

pub use connection::Database;
pub use submission_store::{LibSqlSubmissionStore, SubmissionStore};

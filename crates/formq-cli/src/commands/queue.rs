use std::path::Path;

use formq_core::db::SubmissionStore;

use crate::commands::common::{format_queue_lines, open_store, submission_to_item, QueueListItem};
use crate::error::CliError;

pub async fn run_queue_list(as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let store = open_store(db_path).await?;
    let mut submissions = store.list_all().await?;
    submissions.sort_by_key(|submission| submission.captured_at);

    if as_json {
        let items = submissions
            .iter()
            .map(submission_to_item)
            .collect::<Vec<QueueListItem>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if submissions.is_empty() {
        println!("No queued submissions.");
        return Ok(());
    }

    for line in format_queue_lines(&submissions) {
        println!("{line}");
    }
    Ok(())
}

pub async fn run_queue_clear(db_path: &Path) -> Result<(), CliError> {
    let store = open_store(db_path).await?;
    let removed = store.clear().await?;
    println!("Removed {removed} queued submission(s)");
    Ok(())
}

use formq_core::connectivity::ConnectivityMonitor;
use formq_core::form::{check_phone, PhoneCheck, DEFAULT_COUNTRY};
use formq_core::queue::SkipReason;
use formq_core::{FormPayload, SubmitOutcome};

use crate::commands::common::{
    format_resync_report, open_queue, parse_attachment, parse_field, resolve_queue_config,
    CliContext,
};
use crate::error::CliError;

pub async fn run_submit(
    ctx: &CliContext,
    fields: &[String],
    attachments: &[String],
    offline: bool,
) -> Result<(), CliError> {
    let payload = build_payload(fields, attachments)?;
    warn_on_invalid_phone(&payload);

    let config = resolve_queue_config(ctx)?;
    let (queue, report) = open_queue(ctx, &config, ConnectivityMonitor::new(!offline)).await?;
    if report.attempted > 0 || report.skipped == Some(SkipReason::StoreReadFailed) {
        println!("{}", format_resync_report(&report));
    }

    match queue.submit(&payload).await {
        SubmitOutcome::Delivered | SubmitOutcome::Duplicate => Ok(()),
        SubmitOutcome::Queued { id, .. } => {
            println!("{id}");
            Ok(())
        }
        SubmitOutcome::Failed { reason } => Err(CliError::SubmissionFailed(reason)),
    }
}

pub fn build_payload(fields: &[String], attachments: &[String]) -> Result<FormPayload, CliError> {
    let mut payload = FormPayload::new();
    for raw in fields {
        let (name, value) = parse_field(raw)?;
        payload.insert(name, value);
    }

    for raw in attachments {
        let (field, path) = parse_attachment(raw)?;
        let bytes = std::fs::read(&path)?;
        let filename = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().to_string());
        payload.attach(&field, &filename, &bytes);
    }

    if payload.is_empty() {
        return Err(CliError::EmptyPayload);
    }
    Ok(payload)
}

fn warn_on_invalid_phone(payload: &FormPayload) {
    let Some(phone) = payload.get("phone") else {
        return;
    };
    let country = payload.get("country").unwrap_or(DEFAULT_COUNTRY);
    if check_phone(country, phone) == PhoneCheck::Invalid {
        tracing::warn!("Phone number '{phone}' is not a valid {country} number");
    }
}

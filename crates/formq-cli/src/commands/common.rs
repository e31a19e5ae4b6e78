use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use formq_core::config::{FormEncoding, QueueConfig};
use formq_core::connectivity::ConnectivityMonitor;
use formq_core::db::LibSqlSubmissionStore;
use formq_core::transport::HttpTransport;
use formq_core::{FormPayload, PendingSubmission, ResyncReport, SubmissionQueue};
use serde::Serialize;

use crate::config_profiles::{normalize_text_option, CliProfilesConfig};
use crate::error::CliError;
use crate::notifier::TerminalNotifier;

pub type CliQueue =
    SubmissionQueue<LibSqlSubmissionStore, HttpTransport, ConnectivityMonitor, TerminalNotifier>;

/// Options shared by every command
#[derive(Debug, Clone)]
pub struct CliContext {
    pub db_path: PathBuf,
    pub profile: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
    pub bell: bool,
}

#[derive(Debug, Serialize)]
pub struct QueueListItem {
    pub id: i64,
    pub captured_at: i64,
    pub captured_at_iso: String,
    pub preview: String,
    pub fields: FormPayload,
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os("FORMQ_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| panic!("Failed to resolve CLI data directory"))
        .join("formq")
        .join("queue.db")
}

/// Pick the endpoint: explicit flag, then environment, then profile.
pub fn resolve_endpoint(
    explicit: Option<String>,
    from_env: Option<String>,
    from_profile: Option<String>,
) -> Option<String> {
    normalize_text_option(explicit)
        .or_else(|| normalize_text_option(from_env))
        .or_else(|| normalize_text_option(from_profile))
}

/// Pick the request timeout: explicit flag, then profile. Zero means none.
pub fn resolve_request_timeout(
    explicit: Option<u64>,
    from_profile: Option<u64>,
) -> Option<Duration> {
    explicit
        .or(from_profile)
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

pub fn resolve_queue_config(ctx: &CliContext) -> Result<QueueConfig, CliError> {
    let profiles = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = profiles.resolve_profile_name(ctx.profile.as_deref());
    let profile = profiles.profile(&profile_name).cloned().unwrap_or_default();

    let endpoint = resolve_endpoint(
        ctx.endpoint.clone(),
        env::var("FORMQ_ENDPOINT").ok(),
        profile.endpoint(),
    )
    .ok_or(CliError::EndpointNotConfigured)?;

    let encoding = match normalize_text_option(env::var("FORMQ_ENCODING").ok()) {
        Some(raw) => raw.parse::<FormEncoding>()?,
        None => profile.encoding.unwrap_or_default(),
    };

    let mut config = QueueConfig::new(endpoint)?
        .with_encoding(encoding)
        .with_haptic(ctx.bell);
    if let Some(timeout) = resolve_request_timeout(ctx.timeout_secs, profile.timeout_secs) {
        config = config.with_request_timeout(timeout);
    }
    Ok(config)
}

pub async fn open_store(db_path: &Path) -> Result<LibSqlSubmissionStore, CliError> {
    Ok(LibSqlSubmissionStore::open(db_path).await?)
}

/// Build the queue, attach the store and return the first pass report.
pub async fn open_queue(
    ctx: &CliContext,
    config: &QueueConfig,
    monitor: ConnectivityMonitor,
) -> Result<(CliQueue, ResyncReport), CliError> {
    let transport = HttpTransport::new(config)?;
    let queue = SubmissionQueue::new(transport, monitor)
        .with_notifier(TerminalNotifier)
        .with_haptic(config.haptic);

    let store = open_store(&ctx.db_path).await?;
    let report = queue.initialize(store).await?;
    Ok((queue, report))
}

pub fn parse_field(raw: &str) -> Result<(String, String), CliError> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| CliError::InvalidField(raw.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::InvalidField(raw.to_string()));
    }
    Ok((name.to_string(), value.to_string()))
}

pub fn parse_attachment(raw: &str) -> Result<(String, PathBuf), CliError> {
    let (field, path) = raw
        .split_once('=')
        .ok_or_else(|| CliError::InvalidAttachment(raw.to_string()))?;
    let field = field.trim();
    let path = path.trim();
    if field.is_empty() || path.is_empty() {
        return Err(CliError::InvalidAttachment(raw.to_string()));
    }
    Ok((field.to_string(), PathBuf::from(path)))
}

/// One-line summary of a payload; base64 attachment data is shown as a size.
pub fn payload_preview(payload: &FormPayload, max_chars: usize) -> String {
    let preview = payload
        .iter()
        .map(|(name, value)| {
            if name.ends_with("Base64") {
                format!("{name}=<{} chars>", value.len())
            } else {
                format!("{name}={value}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ");

    if preview.chars().count() > max_chars {
        let truncated: String = preview.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{truncated}...")
    } else {
        preview
    }
}

pub fn format_timestamp(timestamp_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .map_or_else(|| timestamp_ms.to_string(), |time| time.to_rfc3339())
}

pub fn submission_to_item(submission: &PendingSubmission) -> QueueListItem {
    QueueListItem {
        id: submission.id.get(),
        captured_at: submission.captured_at,
        captured_at_iso: format_timestamp(submission.captured_at),
        preview: payload_preview(&submission.payload, 80),
        fields: submission.payload.clone(),
    }
}

pub fn format_queue_lines(submissions: &[PendingSubmission]) -> Vec<String> {
    submissions
        .iter()
        .map(|submission| {
            format!(
                "{:>5}  {}  {}",
                submission.id,
                format_timestamp(submission.captured_at),
                payload_preview(&submission.payload, 80)
            )
        })
        .collect()
}

pub fn format_resync_report(report: &ResyncReport) -> String {
    if let Some(reason) = report.skipped {
        return format!("Resync skipped: {reason}");
    }
    if report.attempted == 0 {
        return "Nothing queued".to_string();
    }

    let mut summary = format!(
        "Resync finished: {} delivered, {} still queued",
        report.delivered.len(),
        report.retained.len()
    );
    if !report.remove_failed.is_empty() {
        summary.push_str(&format!(
            ", {} confirmed but not removed (will be sent again)",
            report.remove_failed.len()
        ));
    }
    if report.duplicates_skipped > 0 {
        summary.push_str(&format!(
            " ({} duplicate copies skipped)",
            report.duplicates_skipped
        ));
    }
    summary
}

//! User-facing notices emitted by the submission queue.

use crate::models::SubmissionId;

/// What happened to a submission, as shown to the person filling the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeKind {
    /// The endpoint confirmed a delivery; `id` is set for queued records
    Delivered { id: Option<SubmissionId> },
    /// Kept locally for a later resync pass
    Queued { reason: String },
    /// The endpoint already holds this entry
    Duplicate,
    /// Could neither deliver nor keep the submission
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    /// Request a haptic cue alongside the message
    pub haptic: bool,
}

impl Notice {
    pub const fn new(kind: NoticeKind) -> Self {
        Self {
            kind,
            haptic: false,
        }
    }

    #[must_use]
    pub const fn with_haptic(mut self, haptic: bool) -> Self {
        self.haptic = haptic;
        self
    }

    /// Short message suitable for a toast or a status line
    pub fn message(&self) -> String {
        match &self.kind {
            NoticeKind::Delivered { id: Some(id) } => {
                format!("Queued submission {id} delivered successfully")
            }
            NoticeKind::Delivered { id: None } => "Form submitted successfully".to_string(),
            NoticeKind::Queued { reason } => {
                format!("Saved offline; will retry when back online ({reason})")
            }
            NoticeKind::Duplicate => "Duplicate entry detected".to_string(),
            NoticeKind::Failed { reason } => format!("Submission failed: {reason}"),
        }
    }

    pub const fn is_error(&self) -> bool {
        matches!(
            self.kind,
            NoticeKind::Duplicate | NoticeKind::Failed { .. }
        )
    }
}

/// Receives queue notices
pub trait SubmissionNotifier {
    fn notify(&self, notice: &Notice);
}

/// Notifier that writes notices to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl SubmissionNotifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        if notice.is_error() {
            tracing::warn!("{}", notice.message());
        } else {
            tracing::info!("{}", notice.message());
        }
    }
}

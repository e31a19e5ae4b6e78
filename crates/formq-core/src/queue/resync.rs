//! Resync agent: flushes queued submissions to the endpoint.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use crate::connectivity::ConnectivityProvider;
use crate::db::SubmissionStore;
use crate::models::{PendingSubmission, SubmissionId};
use crate::notice::{NoticeKind, SubmissionNotifier};
use crate::transport::{DeliveryResponse, SubmissionTransport};
use crate::util::compact_text;

use super::SubmissionQueue;

/// Why a resync pass did not run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Offline,
    StoreUnavailable,
    AlreadyRunning,
    StoreReadFailed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offline => f.write_str("offline"),
            Self::StoreUnavailable => f.write_str("store not initialized"),
            Self::AlreadyRunning => f.write_str("another pass is running"),
            Self::StoreReadFailed => f.write_str("queued submissions could not be read"),
        }
    }
}

/// Summary of one resync pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResyncReport {
    /// Deliveries attempted
    pub attempted: usize,
    /// Records confirmed by the endpoint, in delivery order
    pub delivered: Vec<SubmissionId>,
    /// Records kept for a later pass
    pub retained: Vec<SubmissionId>,
    /// Records the endpoint confirmed but the store failed to delete; the
    /// next pass sends them again
    pub remove_failed: Vec<SubmissionId>,
    /// Stored copies of an already-seen payload, not sent in this pass
    pub duplicates_skipped: usize,
    /// Set when the pass did not run
    pub skipped: Option<SkipReason>,
}

impl ResyncReport {
    pub fn skipped(reason: SkipReason) -> Self {
        Self {
            skipped: Some(reason),
            ..Self::default()
        }
    }

    pub const fn ran(&self) -> bool {
        self.skipped.is_none()
    }
}

/// Holds the single-flight flag for the length of a pass
struct ResyncGuard<'a>(&'a AtomicBool);

impl<'a> ResyncGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for ResyncGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Keep the first record for each content signature, oldest capture first.
fn deliverable_order(records: Vec<PendingSubmission>) -> (Vec<PendingSubmission>, usize) {
    let mut seen = HashSet::new();
    let mut duplicates = 0;
    let mut unique: Vec<PendingSubmission> = records
        .into_iter()
        .filter(|record| {
            let first = seen.insert(record.payload.signature());
            if !first {
                duplicates += 1;
            }
            first
        })
        .collect();

    unique.sort_by_key(|record| record.captured_at);
    (unique, duplicates)
}

impl<S, T, C, N> SubmissionQueue<S, T, C, N>
where
    S: SubmissionStore,
    T: SubmissionTransport,
    C: ConnectivityProvider,
    N: SubmissionNotifier,
{
    /// Run one resync pass over a snapshot of the queue.
    ///
    /// Records are sent oldest first, one at a time. A record is removed
    /// only when the response body contains `SUCCESS`; anything else,
    /// including a transport error, leaves it for the next pass. A failed
    /// snapshot read ends the pass with [`SkipReason::StoreReadFailed`].
    pub async fn resync(&self) -> ResyncReport {
        if !self.connectivity.is_online() {
            tracing::debug!("Skipping resync: offline");
            return ResyncReport::skipped(SkipReason::Offline);
        }
        let Some(store) = self.store.get() else {
            tracing::debug!("Skipping resync: store not initialized");
            return ResyncReport::skipped(SkipReason::StoreUnavailable);
        };
        let Some(_guard) = ResyncGuard::acquire(&self.resync_running) else {
            tracing::debug!("Skipping resync: another pass is running");
            return ResyncReport::skipped(SkipReason::AlreadyRunning);
        };

        let records = match store.list_all().await {
            Ok(records) => records,
            Err(error) => {
                tracing::warn!("Failed to read pending submissions: {error}");
                return ResyncReport::skipped(SkipReason::StoreReadFailed);
            }
        };

        let (records, duplicates_skipped) = deliverable_order(records);
        let mut report = ResyncReport {
            duplicates_skipped,
            ..ResyncReport::default()
        };

        for record in records {
            report.attempted += 1;
            match self.transport.deliver(&record.payload).await {
                Ok(body) if DeliveryResponse::classify(&body).is_success() => {
                    match store.remove(record.id).await {
                        Ok(()) => report.delivered.push(record.id),
                        Err(error) => {
                            tracing::warn!(
                                "Submission {} was delivered but could not be removed: {error}",
                                record.id
                            );
                            report.remove_failed.push(record.id);
                        }
                    }
                    self.notify(NoticeKind::Delivered { id: Some(record.id) }, self.haptic);
                }
                Ok(body) => {
                    tracing::debug!(
                        "Endpoint did not confirm submission {}: {}",
                        record.id,
                        compact_text(&body)
                    );
                    report.retained.push(record.id);
                }
                Err(error) => {
                    tracing::warn!("Delivery of submission {} failed: {error}", record.id);
                    report.retained.push(record.id);
                }
            }
        }

        if report.attempted > 0 {
            tracing::info!(
                "Resync pass finished: {} delivered, {} retained, {} not removed",
                report.delivered.len(),
                report.retained.len(),
                report.remove_failed.len()
            );
        }
        report
    }

    /// Run a resync pass on every offline to online transition.
    ///
    /// Returns when the connectivity provider stops publishing.
    pub async fn resync_on_reconnect(&self) {
        let mut changes = self.connectivity.subscribe();
        let mut was_online = *changes.borrow_and_update();

        while changes.changed().await.is_ok() {
            let online = *changes.borrow_and_update();
            if online && !was_online {
                tracing::info!("Connectivity restored; resyncing pending submissions");
                self.resync().await;
            }
            was_online = online;
        }
    }
}

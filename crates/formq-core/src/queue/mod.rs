//! Offline submission queue.
//!
//! [`SubmissionQueue`] owns the local store handle, the transport and the
//! connectivity provider. A client constructs one at startup, attaches the
//! store with [`SubmissionQueue::initialize`] once it is open, and shares it
//! by reference with whatever triggers a resync.
//!
//! Writes that arrive before the store is attached are dropped with a
//! warning. Every failure on the submit path degrades to "retry later";
//! nothing here returns an error to the form.

mod resync;

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::OnceCell;

use crate::connectivity::ConnectivityProvider;
use crate::db::SubmissionStore;
use crate::error::{Error, Result};
use crate::models::{FormPayload, PendingSubmission, SubmissionId};
use crate::notice::{Notice, NoticeKind, SubmissionNotifier, TracingNotifier};
use crate::transport::{DeliveryResponse, SubmissionTransport};
use crate::util::{compact_text, unix_millis_now};

pub use resync::{ResyncReport, SkipReason};

/// Result of [`SubmissionQueue::enqueue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// Inserted as a new record
    Stored(SubmissionId),
    /// A record with the same content was already queued
    Duplicate(SubmissionId),
    /// The store was unavailable or the insert failed
    Dropped,
}

/// Result of [`SubmissionQueue::submit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The endpoint confirmed the submission
    Delivered,
    /// The endpoint already holds this entry; nothing was queued
    Duplicate,
    /// Kept locally for the next resync pass
    Queued { id: SubmissionId, reason: String },
    /// Neither delivered nor kept
    Failed { reason: String },
}

/// Local submission queue with a single-flight resync agent
pub struct SubmissionQueue<S, T, C, N = TracingNotifier> {
    store: OnceCell<S>,
    transport: T,
    connectivity: C,
    notifier: N,
    haptic: bool,
    resync_running: AtomicBool,
}

impl<S, T, C> SubmissionQueue<S, T, C, TracingNotifier> {
    /// Create a queue without a store; attach one with `initialize`
    pub fn new(transport: T, connectivity: C) -> Self {
        Self {
            store: OnceCell::new(),
            transport,
            connectivity,
            notifier: TracingNotifier,
            haptic: false,
            resync_running: AtomicBool::new(false),
        }
    }
}

impl<S, T, C, N> SubmissionQueue<S, T, C, N> {
    /// Replace the notifier receiving user-facing notices
    pub fn with_notifier<M>(self, notifier: M) -> SubmissionQueue<S, T, C, M> {
        SubmissionQueue {
            store: self.store,
            transport: self.transport,
            connectivity: self.connectivity,
            notifier,
            haptic: self.haptic,
            resync_running: self.resync_running,
        }
    }

    /// Request a haptic cue with each confirmed delivery
    #[must_use]
    pub fn with_haptic(mut self, haptic: bool) -> Self {
        self.haptic = haptic;
        self
    }

    /// The attached store, if `initialize` has run
    pub fn store(&self) -> Option<&S> {
        self.store.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.store.initialized()
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub const fn connectivity(&self) -> &C {
        &self.connectivity
    }

    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Whether a resync pass is running right now
    pub fn is_resyncing(&self) -> bool {
        self.resync_running.load(Ordering::Acquire)
    }
}

impl<S, T, C, N> SubmissionQueue<S, T, C, N>
where
    S: SubmissionStore,
    T: SubmissionTransport,
    C: ConnectivityProvider,
    N: SubmissionNotifier,
{
    /// Attach the opened store and run a first resync pass.
    pub async fn initialize(&self, store: S) -> Result<ResyncReport> {
        self.store
            .set(store)
            .map_err(|_| Error::InvalidInput("submission store already initialized".to_string()))?;
        tracing::debug!("Submission store attached");
        Ok(self.resync().await)
    }

    /// Queue a payload unless a record with the same content is already queued.
    ///
    /// Never fails: an unavailable store drops the write with a warning, and
    /// a failed duplicate check falls back to an unconditional insert.
    pub async fn enqueue(&self, payload: &FormPayload) -> EnqueueOutcome {
        let Some(store) = self.store.get() else {
            tracing::warn!("Submission store not initialized yet; dropping queued submission");
            return EnqueueOutcome::Dropped;
        };

        let signature = payload.signature();
        match store.find_by_signature(&signature).await {
            Ok(Some(existing)) => {
                tracing::debug!("Submission already queued as {existing}; skipping insert");
                return EnqueueOutcome::Duplicate(existing);
            }
            Ok(None) => {}
            Err(error) => {
                tracing::warn!("Duplicate check failed, storing submission anyway: {error}");
            }
        }

        match store.insert(payload, &signature, unix_millis_now()).await {
            Ok(id) => EnqueueOutcome::Stored(id),
            Err(error) => {
                tracing::warn!("Failed to store pending submission: {error}");
                EnqueueOutcome::Dropped
            }
        }
    }

    /// Every queued record; empty while the store is not attached
    pub async fn list_all(&self) -> Result<Vec<PendingSubmission>> {
        match self.store.get() {
            Some(store) => store.list_all().await,
            None => Ok(Vec::new()),
        }
    }

    /// Delete a queued record; absent ids are ignored
    pub async fn remove(&self, id: SubmissionId) -> Result<()> {
        match self.store.get() {
            Some(store) => store.remove(id).await,
            None => Ok(()),
        }
    }

    /// Drop every queued record
    pub async fn clear(&self) -> Result<usize> {
        match self.store.get() {
            Some(store) => store.clear().await,
            None => Ok(0),
        }
    }

    /// Deliver a payload now, or queue it when that is not possible.
    pub async fn submit(&self, payload: &FormPayload) -> SubmitOutcome {
        if !self.connectivity.is_online() {
            return self.queue_for_later(payload, "offline".to_string()).await;
        }

        match self.transport.deliver(payload).await {
            Ok(body) => match DeliveryResponse::classify(&body) {
                DeliveryResponse::Success => {
                    self.notify(NoticeKind::Delivered { id: None }, self.haptic);
                    SubmitOutcome::Delivered
                }
                DeliveryResponse::Duplicate => {
                    self.notify(NoticeKind::Duplicate, false);
                    SubmitOutcome::Duplicate
                }
                DeliveryResponse::Rejected => {
                    let reason = format!("endpoint answered: {}", compact_text(&body));
                    self.queue_for_later(payload, reason).await
                }
            },
            Err(error) => self.queue_for_later(payload, error.to_string()).await,
        }
    }

    async fn queue_for_later(&self, payload: &FormPayload, reason: String) -> SubmitOutcome {
        match self.enqueue(payload).await {
            EnqueueOutcome::Stored(id) | EnqueueOutcome::Duplicate(id) => {
                self.notify(
                    NoticeKind::Queued {
                        reason: reason.clone(),
                    },
                    false,
                );
                SubmitOutcome::Queued { id, reason }
            }
            EnqueueOutcome::Dropped => {
                self.notify(
                    NoticeKind::Failed {
                        reason: reason.clone(),
                    },
                    false,
                );
                SubmitOutcome::Failed { reason }
            }
        }
    }

    fn notify(&self, kind: NoticeKind, haptic: bool) {
        self.notifier.notify(&Notice::new(kind).with_haptic(haptic));
    }
}

#[cfg(test)]
mod tests;

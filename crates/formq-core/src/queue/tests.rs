use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::sync::Notify;

use super::*;
use crate::connectivity::ConnectivityMonitor;
use crate::db::LibSqlSubmissionStore;
use crate::models::ContentSignature;
use crate::transport::{TransportError, TransportResult};

/// Transport answering by the payload's `name` field and recording call order
#[derive(Default)]
struct ScriptedTransport {
    responses: HashMap<String, String>,
    unreachable: bool,
    calls: Mutex<Vec<String>>,
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl ScriptedTransport {
    fn answering(responses: &[(&str, &str)]) -> Self {
        Self {
            responses: responses
                .iter()
                .map(|(name, body)| ((*name).to_string(), (*body).to_string()))
                .collect(),
            ..Self::default()
        }
    }

    fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl SubmissionTransport for ScriptedTransport {
    async fn deliver(&self, payload: &FormPayload) -> TransportResult<String> {
        let name = payload.get("name").unwrap_or_default().to_string();
        self.calls.lock().unwrap().push(name.clone());

        if let Some((entered, release)) = &self.gate {
            entered.notify_one();
            release.notified().await;
        }

        if self.unreachable {
            return Err(TransportError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }
        Ok(self.responses.get(&name).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    fn kinds(&self) -> Vec<NoticeKind> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .map(|notice| notice.kind.clone())
            .collect()
    }
}

impl SubmissionNotifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Fault {
    Lookup,
    List,
    Remove,
}

/// In-memory store with one operation that always fails
struct FaultyStore {
    inner: LibSqlSubmissionStore,
    fault: Fault,
}

impl FaultyStore {
    async fn open(fault: Fault) -> Self {
        Self {
            inner: LibSqlSubmissionStore::open_in_memory().await.unwrap(),
            fault,
        }
    }

    fn check(&self, operation: Fault) -> Result<()> {
        if self.fault == operation {
            return Err(Error::Database("store unavailable".to_string()));
        }
        Ok(())
    }
}

impl SubmissionStore for FaultyStore {
    async fn find_by_signature(
        &self,
        signature: &ContentSignature,
    ) -> Result<Option<SubmissionId>> {
        self.check(Fault::Lookup)?;
        self.inner.find_by_signature(signature).await
    }

    async fn insert(
        &self,
        payload: &FormPayload,
        signature: &ContentSignature,
        captured_at: i64,
    ) -> Result<SubmissionId> {
        self.inner.insert(payload, signature, captured_at).await
    }

    async fn list_all(&self) -> Result<Vec<PendingSubmission>> {
        self.check(Fault::List)?;
        self.inner.list_all().await
    }

    async fn remove(&self, id: SubmissionId) -> Result<()> {
        self.check(Fault::Remove)?;
        self.inner.remove(id).await
    }

    async fn count(&self) -> Result<usize> {
        self.inner.count().await
    }

    async fn clear(&self) -> Result<usize> {
        self.inner.clear().await
    }
}

type TestQueue<S = LibSqlSubmissionStore> =
    SubmissionQueue<S, ScriptedTransport, ConnectivityMonitor, RecordingNotifier>;

fn visitor(name: &str, phone: &str) -> FormPayload {
    FormPayload::new()
        .with_field("name", name)
        .with_field("phone", phone)
}

async fn queue_with(transport: ScriptedTransport, monitor: &ConnectivityMonitor) -> TestQueue {
    let queue = SubmissionQueue::new(transport, monitor.clone())
        .with_notifier(RecordingNotifier::default());
    queue
        .initialize(LibSqlSubmissionStore::open_in_memory().await.unwrap())
        .await
        .unwrap();
    queue
}

async fn faulty_queue(
    transport: ScriptedTransport,
    monitor: &ConnectivityMonitor,
    fault: Fault,
) -> TestQueue<FaultyStore> {
    let queue = SubmissionQueue::new(transport, monitor.clone())
        .with_notifier(RecordingNotifier::default());
    queue
        .initialize(FaultyStore::open(fault).await)
        .await
        .unwrap();
    queue
}

async fn stored_count<S: SubmissionStore, N: SubmissionNotifier>(
    queue: &SubmissionQueue<S, ScriptedTransport, ConnectivityMonitor, N>,
) -> usize {
    queue.store().unwrap().count().await.unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn enqueue_twice_stores_one_record() {
    let monitor = ConnectivityMonitor::new(false);
    let queue = queue_with(ScriptedTransport::default(), &monitor).await;
    let payload = visitor("A", "1");

    let first = queue.enqueue(&payload).await;
    let second = queue.enqueue(&payload).await;

    let EnqueueOutcome::Stored(id) = first else {
        panic!("expected first enqueue to store, got {first:?}");
    };
    assert_eq!(second, EnqueueOutcome::Duplicate(id));
    assert_eq!(stored_count(&queue).await, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn enqueue_ignores_field_order() {
    let monitor = ConnectivityMonitor::new(false);
    let queue = queue_with(ScriptedTransport::default(), &monitor).await;

    queue
        .enqueue(&FormPayload::new().with_field("name", "A").with_field("phone", "1"))
        .await;
    queue
        .enqueue(&FormPayload::new().with_field("phone", "1").with_field("name", "A"))
        .await;

    assert_eq!(stored_count(&queue).await, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn enqueue_before_initialize_is_dropped() {
    let monitor = ConnectivityMonitor::new(false);
    let queue: TestQueue = SubmissionQueue::new(ScriptedTransport::default(), monitor)
        .with_notifier(RecordingNotifier::default());

    assert_eq!(
        queue.enqueue(&visitor("A", "1")).await,
        EnqueueOutcome::Dropped
    );
    assert!(queue.list_all().await.unwrap().is_empty());

    queue
        .initialize(LibSqlSubmissionStore::open_in_memory().await.unwrap())
        .await
        .unwrap();
    assert_eq!(stored_count(&queue).await, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_duplicate_check_inserts_anyway() {
    let monitor = ConnectivityMonitor::new(false);
    let queue = faulty_queue(ScriptedTransport::default(), &monitor, Fault::Lookup).await;

    let payload = visitor("A", "1");
    assert!(matches!(
        queue.enqueue(&payload).await,
        EnqueueOutcome::Stored(_)
    ));
    assert!(matches!(
        queue.enqueue(&payload).await,
        EnqueueOutcome::Stored(_)
    ));
    assert_eq!(stored_count(&queue).await, 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn initialize_twice_is_rejected() {
    let monitor = ConnectivityMonitor::new(false);
    let queue = queue_with(ScriptedTransport::default(), &monitor).await;

    let error = queue
        .initialize(LibSqlSubmissionStore::open_in_memory().await.unwrap())
        .await
        .unwrap_err();
    assert!(error.to_string().contains("already initialized"));
}

#[tokio::test(flavor = "multi_thread")]
async fn resync_removes_only_confirmed_records() {
    let monitor = ConnectivityMonitor::new(false);
    let transport = ScriptedTransport::answering(&[("first", "SUCCESS"), ("second", "FAIL")]);
    let queue = queue_with(transport, &monitor).await;

    queue.enqueue(&visitor("first", "1")).await;
    let EnqueueOutcome::Stored(second_id) = queue.enqueue(&visitor("second", "2")).await else {
        panic!("expected second enqueue to store");
    };

    monitor.set_online(true);
    let report = queue.resync().await;

    assert_eq!(report.attempted, 2);
    assert_eq!(report.delivered.len(), 1);
    assert_eq!(report.retained, vec![second_id]);

    let remaining = queue.list_all().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, second_id);
    assert_eq!(remaining[0].payload.get("name"), Some("second"));
}

#[tokio::test(flavor = "multi_thread")]
async fn resync_keeps_records_on_non_success_and_transport_errors() {
    let monitor = ConnectivityMonitor::new(false);
    let queue = queue_with(ScriptedTransport::unreachable(), &monitor).await;
    queue.enqueue(&visitor("A", "1")).await;
    queue.enqueue(&visitor("B", "2")).await;

    monitor.set_online(true);
    let report = queue.resync().await;

    assert_eq!(report.attempted, 2);
    assert!(report.delivered.is_empty());
    assert_eq!(stored_count(&queue).await, 2);

    let rejected = queue_with(
        ScriptedTransport::answering(&[("A", "ERROR: sheet locked")]),
        &monitor,
    )
    .await;
    rejected.enqueue(&visitor("A", "1")).await;
    rejected.resync().await;
    assert_eq!(stored_count(&rejected).await, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn unreadable_queue_is_reported_not_treated_as_empty() {
    let monitor = ConnectivityMonitor::new(false);
    let queue = faulty_queue(
        ScriptedTransport::answering(&[("A", "SUCCESS")]),
        &monitor,
        Fault::List,
    )
    .await;
    queue.enqueue(&visitor("A", "1")).await;

    monitor.set_online(true);
    let report = queue.resync().await;

    assert!(!report.ran());
    assert_eq!(report.skipped, Some(SkipReason::StoreReadFailed));
    assert_eq!(report.attempted, 0);
    assert!(queue.transport().calls().is_empty());
    assert_eq!(stored_count(&queue).await, 1);
    assert!(!queue.is_resyncing());
}

#[tokio::test(flavor = "multi_thread")]
async fn confirmed_record_that_cannot_be_removed_is_not_counted_as_delivered() {
    let monitor = ConnectivityMonitor::new(false);
    let queue = faulty_queue(
        ScriptedTransport::answering(&[("A", "SUCCESS")]),
        &monitor,
        Fault::Remove,
    )
    .await;
    let EnqueueOutcome::Stored(id) = queue.enqueue(&visitor("A", "1")).await else {
        panic!("expected enqueue to store");
    };

    monitor.set_online(true);
    let report = queue.resync().await;

    assert_eq!(report.attempted, 1);
    assert!(report.delivered.is_empty());
    assert!(report.retained.is_empty());
    assert_eq!(report.remove_failed, vec![id]);
    assert_eq!(stored_count(&queue).await, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn resync_delivers_in_capture_order() {
    let monitor = ConnectivityMonitor::new(false);
    let queue = queue_with(
        ScriptedTransport::answering(&[
            ("late", "SUCCESS"),
            ("early", "SUCCESS"),
            ("middle", "SUCCESS"),
        ]),
        &monitor,
    )
    .await;

    let store = queue.store().unwrap();
    for (name, captured_at) in [("late", 300), ("early", 100), ("middle", 200)] {
        let payload = visitor(name, "1");
        store
            .insert(&payload, &payload.signature(), captured_at)
            .await
            .unwrap();
    }

    monitor.set_online(true);
    let report = queue.resync().await;

    assert_eq!(report.delivered.len(), 3);
    assert_eq!(queue.transport().calls(), vec!["early", "middle", "late"]);
    assert_eq!(stored_count(&queue).await, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn resync_sends_stored_duplicates_once() {
    let monitor = ConnectivityMonitor::new(false);
    let queue = queue_with(ScriptedTransport::answering(&[("A", "SUCCESS")]), &monitor).await;

    let store = queue.store().unwrap();
    let payload = visitor("A", "1");
    store.insert(&payload, &payload.signature(), 1).await.unwrap();
    store.insert(&payload, &payload.signature(), 2).await.unwrap();

    monitor.set_online(true);
    let report = queue.resync().await;

    assert_eq!(report.attempted, 1);
    assert_eq!(report.duplicates_skipped, 1);
    assert_eq!(queue.transport().calls(), vec!["A"]);
    assert_eq!(stored_count(&queue).await, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn resync_skips_when_offline_or_uninitialized() {
    let monitor = ConnectivityMonitor::new(false);
    let queue = queue_with(ScriptedTransport::default(), &monitor).await;
    queue.enqueue(&visitor("A", "1")).await;

    assert_eq!(queue.resync().await.skipped, Some(SkipReason::Offline));
    assert!(queue.transport().calls().is_empty());

    let online = ConnectivityMonitor::new(true);
    let detached: TestQueue = SubmissionQueue::new(ScriptedTransport::default(), online)
        .with_notifier(RecordingNotifier::default());
    assert_eq!(
        detached.resync().await.skipped,
        Some(SkipReason::StoreUnavailable)
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_resync_is_a_noop() {
    let monitor = ConnectivityMonitor::new(false);
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let transport = ScriptedTransport {
        gate: Some((entered.clone(), release.clone())),
        ..ScriptedTransport::answering(&[("A", "SUCCESS")])
    };
    let queue = queue_with(transport, &monitor).await;
    queue.enqueue(&visitor("A", "1")).await;
    monitor.set_online(true);

    let second = async {
        entered.notified().await;
        assert!(queue.is_resyncing());
        let report = queue.resync().await;
        release.notify_one();
        report
    };
    let (first_report, second_report) = tokio::join!(queue.resync(), second);

    assert_eq!(second_report.skipped, Some(SkipReason::AlreadyRunning));
    assert_eq!(second_report.attempted, 0);
    assert_eq!(first_report.delivered.len(), 1);
    assert_eq!(queue.transport().calls().len(), 1);
    assert!(!queue.is_resyncing());
    assert_eq!(stored_count(&queue).await, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn initialize_runs_first_pass() {
    let monitor = ConnectivityMonitor::new(true);
    let store = LibSqlSubmissionStore::open_in_memory().await.unwrap();
    let payload = visitor("A", "1");
    store.insert(&payload, &payload.signature(), 1).await.unwrap();

    let queue: TestQueue = SubmissionQueue::new(
        ScriptedTransport::answering(&[("A", "SUCCESS")]),
        monitor,
    )
    .with_notifier(RecordingNotifier::default())
    .with_haptic(true);
    let report = queue.initialize(store).await.unwrap();

    assert_eq!(report.delivered.len(), 1);
    assert_eq!(stored_count(&queue).await, 0);

    let notices = queue.notifier().notices.lock().unwrap().clone();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].haptic);
    assert_eq!(
        notices[0].kind,
        NoticeKind::Delivered {
            id: Some(report.delivered[0])
        }
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn reconnect_triggers_resync() {
    let monitor = ConnectivityMonitor::new(false);
    let queue = queue_with(ScriptedTransport::answering(&[("A", "SUCCESS")]), &monitor).await;
    queue.enqueue(&visitor("A", "1")).await;

    let driver = async {
        // Let the listener subscribe before flipping state
        tokio::time::sleep(Duration::from_millis(20)).await;
        monitor.set_online(true);
        for _ in 0..100 {
            if stored_count(&queue).await == 0 {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        false
    };

    let drained = tokio::select! {
        () = queue.resync_on_reconnect() => false,
        drained = driver => drained,
    };

    assert!(drained);
    assert_eq!(queue.transport().calls(), vec!["A"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn submit_online_success_is_not_queued() {
    let monitor = ConnectivityMonitor::new(true);
    let queue = queue_with(ScriptedTransport::answering(&[("A", "SUCCESS")]), &monitor).await;

    assert_eq!(
        queue.submit(&visitor("A", "1")).await,
        SubmitOutcome::Delivered
    );
    assert_eq!(stored_count(&queue).await, 0);
    assert_eq!(
        queue.notifier().kinds(),
        vec![NoticeKind::Delivered { id: None }]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn submit_duplicate_response_is_not_queued() {
    let monitor = ConnectivityMonitor::new(true);
    let queue = queue_with(
        ScriptedTransport::answering(&[("A", "DUPLICATE")]),
        &monitor,
    )
    .await;

    assert_eq!(
        queue.submit(&visitor("A", "1")).await,
        SubmitOutcome::Duplicate
    );
    assert_eq!(stored_count(&queue).await, 0);
    assert_eq!(queue.notifier().kinds(), vec![NoticeKind::Duplicate]);
}

#[tokio::test(flavor = "multi_thread")]
async fn submit_queues_on_failure_and_when_offline() {
    let monitor = ConnectivityMonitor::new(true);
    let queue = queue_with(ScriptedTransport::answering(&[("A", "FAIL")]), &monitor).await;

    let outcome = queue.submit(&visitor("A", "1")).await;
    assert!(matches!(outcome, SubmitOutcome::Queued { ref reason, .. } if reason.contains("FAIL")));

    monitor.set_online(false);
    let outcome = queue.submit(&visitor("B", "2")).await;
    assert!(matches!(outcome, SubmitOutcome::Queued { ref reason, .. } if reason == "offline"));

    assert_eq!(stored_count(&queue).await, 2);
    assert_eq!(queue.transport().calls(), vec!["A"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn submit_without_store_reports_failure() {
    let monitor = ConnectivityMonitor::new(false);
    let queue: TestQueue = SubmissionQueue::new(ScriptedTransport::default(), monitor)
        .with_notifier(RecordingNotifier::default());

    let outcome = queue.submit(&visitor("A", "1")).await;
    assert_eq!(
        outcome,
        SubmitOutcome::Failed {
            reason: "offline".to_string()
        }
    );
    assert_eq!(
        queue.notifier().kinds(),
        vec![NoticeKind::Failed {
            reason: "offline".to_string()
        }]
    );
}

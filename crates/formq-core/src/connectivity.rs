//! Connectivity state used to gate and trigger resync passes.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

/// Source of online/offline state.
///
/// `is_online` is a point-in-time check; `subscribe` yields every change so
/// a caller can react to the offline to online transition.
pub trait ConnectivityProvider {
    fn is_online(&self) -> bool;
    fn subscribe(&self) -> watch::Receiver<bool>;
}

/// Settable connectivity state shared between a prober and the queue
#[derive(Clone, Debug)]
pub struct ConnectivityMonitor {
    state: Arc<watch::Sender<bool>>,
}

impl ConnectivityMonitor {
    pub fn new(initially_online: bool) -> Self {
        let (state, _) = watch::channel(initially_online);
        Self {
            state: Arc::new(state),
        }
    }

    /// Publish a new state. Returns `true` when the state actually changed.
    pub fn set_online(&self, online: bool) -> bool {
        let changed = self.state.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
        if changed {
            tracing::info!(
                "Connectivity changed: {}",
                if online { "online" } else { "offline" }
            );
        }
        changed
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ConnectivityProvider for ConnectivityMonitor {
    fn is_online(&self) -> bool {
        *self.state.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }
}

/// Check whether `url` answers at all. Any HTTP response counts as online.
pub async fn probe_endpoint(url: &str, timeout: Duration) -> bool {
    let client = match reqwest::Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(error) => {
            tracing::warn!("Failed to build connectivity probe client: {error}");
            return false;
        }
    };

    match client.head(url).send().await {
        Ok(_) => true,
        Err(error) => {
            tracing::debug!("Connectivity probe to {url} failed: {error}");
            false
        }
    }
}

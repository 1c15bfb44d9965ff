//! Presenter side of the bridge

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, trace};
use tokio::sync::{mpsc, oneshot};

use super::protocol::{PresenterMessage, WindowOp};
use super::{BRIDGE_GLOBAL, EXPOSED_NAMES, verify_exposed};
use crate::utils::BridgeError;

/// Calls waiting for the host to resolve them
#[derive(Clone, Default)]
struct PendingCalls {
    waiters: Arc<Mutex<HashMap<u64, oneshot::Sender<()>>>>,
    next_id: Arc<AtomicU64>,
}

impl PendingCalls {
    fn register(&self) -> (u64, oneshot::Receiver<()>) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        self.waiters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, tx);
        (id, rx)
    }

    fn complete(&self, id: u64) -> bool {
        let waiter = self
            .waiters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        match waiter {
            Some(tx) => {
                // The caller may have stopped waiting
                let _ = tx.send(());
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.waiters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn clear(&self) {
        self.waiters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// The bridge object the presenter sees.
///
/// It carries copies of the host's plain values and can issue exactly the
/// two window-control requests. Every call resolves: once the host has
/// dispatched it, or immediately when the host is gone.
#[derive(Clone)]
pub struct BridgeApi {
    platform: String,
    versions: BTreeMap<String, String>,
    outbound: mpsc::UnboundedSender<PresenterMessage>,
    pending: PendingCalls,
}

impl BridgeApi {
    /// Operating system family of the host
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Component version strings
    pub fn versions(&self) -> &BTreeMap<String, String> {
        &self.versions
    }

    /// Ask the host to minimize the window
    pub async fn minimize_window(&self) {
        self.invoke(WindowOp::MinimizeWindow).await
    }

    /// Ask the host to close the window
    pub async fn close_window(&self) {
        self.invoke(WindowOp::CloseWindow).await
    }

    /// Names reachable through this object
    pub fn exposed_names(&self) -> &'static [&'static str] {
        &EXPOSED_NAMES
    }

    /// Number of calls still waiting on the host
    pub fn pending_calls(&self) -> usize {
        self.pending.len()
    }

    async fn invoke(&self, op: WindowOp) {
        let (id, resolved) = self.pending.register();
        trace!("bridge call #{} {}", id, op.exposed_name());

        if self.outbound.send(PresenterMessage::Invoke { id, op }).is_err() {
            debug!("{} with host disconnected, resolving", op.exposed_name());
            self.pending.complete(id);
            return;
        }

        // A dropped waiter means the host went away; resolve all the same
        let _ = resolved.await;
    }

    /// Resolve call `id`; unknown ids are ignored
    pub(crate) fn resolve(&self, id: u64) -> bool {
        self.pending.complete(id)
    }

    /// Resolve every outstanding call
    pub(crate) fn disconnect(&self) {
        self.pending.clear();
    }
}

/// The presenter's global scope: holds the bridge under its fixed name
#[derive(Clone)]
pub struct GlobalScope {
    name: String,
    bridge: BridgeApi,
}

impl GlobalScope {
    /// Build the scope from an attach message
    pub fn attach(
        global: &str,
        platform: String,
        versions: BTreeMap<String, String>,
        exposed: &[String],
        outbound: mpsc::UnboundedSender<PresenterMessage>,
    ) -> Result<Self, BridgeError> {
        if global != BRIDGE_GLOBAL {
            return Err(BridgeError::Protocol(format!(
                "bridge global must be '{}', got '{}'",
                BRIDGE_GLOBAL, global
            )));
        }
        verify_exposed(exposed)?;

        Ok(Self {
            name: global.to_string(),
            bridge: BridgeApi {
                platform,
                versions,
                outbound,
                pending: PendingCalls::default(),
            },
        })
    }

    /// Look up a global by name
    pub fn get(&self, name: &str) -> Option<&BridgeApi> {
        (name == self.name).then_some(&self.bridge)
    }

    /// Names defined in this scope
    pub fn names(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    /// The bridge object
    pub fn bridge(&self) -> &BridgeApi {
        &self.bridge
    }
}

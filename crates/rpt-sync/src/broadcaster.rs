//! Listener fan-out, cross-session mirroring and cache invalidation.

use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use rpt_model::Scope;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::cache::ScopeInvalidation;
use crate::error::SyncError;
use crate::notification::{Envelope, SyncNotification};
use crate::notifier::ChangeNotifier;

/// Callback invoked for every notification.
pub type Listener = Arc<dyn Fn(&SyncNotification) + Send + Sync>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Delivers change notifications to local listeners and mirrors them to
/// other sessions through a [`ChangeNotifier`].
///
/// Each broadcaster has a random origin id. Envelopes it receives back from
/// the notifier with its own origin are ignored, so local listeners see each
/// announcement exactly once.
pub struct SyncBroadcaster {
    origin: String,
    notifier: Arc<dyn ChangeNotifier>,
    listeners: Mutex<BTreeMap<String, Listener>>,
    caches: Mutex<Vec<Arc<dyn ScopeInvalidation>>>,
    pump: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for SyncBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncBroadcaster")
            .field("origin", &self.origin)
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}

impl SyncBroadcaster {
    pub fn new(notifier: Arc<dyn ChangeNotifier>) -> Arc<Self> {
        Arc::new(Self {
            origin: rpt_model::new_id(),
            notifier,
            listeners: Mutex::default(),
            caches: Mutex::default(),
            pump: Mutex::default(),
        })
    }

    /// Session id stamped on outgoing envelopes.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    // =========================================================================
    // LISTENERS
    // =========================================================================

    /// Register a listener under `id`, replacing any previous one.
    pub fn add_listener<F>(&self, id: impl Into<String>, listener: F)
    where
        F: Fn(&SyncNotification) + Send + Sync + 'static,
    {
        lock(&self.listeners).insert(id.into(), Arc::new(listener));
    }

    pub fn remove_listener(&self, id: &str) -> bool {
        lock(&self.listeners).remove(id).is_some()
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).len()
    }

    /// Register a cache cleared by [`invalidate`](Self::invalidate).
    pub fn register_cache(&self, cache: Arc<dyn ScopeInvalidation>) {
        lock(&self.caches).push(cache);
    }

    // =========================================================================
    // DELIVERY
    // =========================================================================

    /// Deliver to local listeners, then mirror to other sessions.
    pub fn announce(&self, notification: &SyncNotification) {
        self.deliver(notification);

        let envelope = Envelope {
            origin: self.origin.clone(),
            notification: notification.clone(),
        };
        match serde_json::to_string(&envelope) {
            Ok(payload) => self.notifier.publish(&payload),
            Err(e) => error!(error = %e, "failed to encode change notification"),
        }
    }

    /// Handle a payload from the notifier. Returns whether it was delivered.
    ///
    /// Undecodable payloads and own-origin envelopes are dropped.
    pub fn deliver_remote(&self, payload: &str) -> bool {
        let envelope: Envelope = match serde_json::from_str(payload) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "ignoring undecodable change payload");
                return false;
            }
        };
        if envelope.origin == self.origin {
            return false;
        }
        debug!(
            origin = %envelope.origin,
            scope = %envelope.notification.scope,
            "received remote change"
        );
        self.deliver(&envelope.notification);
        true
    }

    /// Call every listener. A panicking listener is logged and skipped.
    fn deliver(&self, notification: &SyncNotification) {
        // Snapshot so listeners may add or remove listeners.
        let listeners: Vec<(String, Listener)> = lock(&self.listeners)
            .iter()
            .map(|(id, l)| (id.clone(), Arc::clone(l)))
            .collect();

        for (id, listener) in listeners {
            if catch_unwind(AssertUnwindSafe(|| listener(notification))).is_err() {
                error!(listener = %id, "change listener panicked");
            }
        }
    }

    /// Clear every registered cache for `scope`.
    pub fn invalidate(&self, scope: &Scope) {
        let caches: Vec<Arc<dyn ScopeInvalidation>> = lock(&self.caches).clone();
        for cache in caches {
            cache.invalidate(scope);
        }
        debug!(scope = %scope, "invalidated scope");
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Spawn the task that feeds notifier payloads into
    /// [`deliver_remote`](Self::deliver_remote). Must run inside a tokio runtime.
    pub fn start(self: &Arc<Self>) -> Result<(), SyncError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| SyncError::NoRuntime)?;
        let mut pump = lock(&self.pump);
        if pump.as_ref().is_some_and(|h| !h.is_finished()) {
            return Err(SyncError::AlreadyStarted);
        }

        let mut receiver = self.notifier.subscribe();
        let weak: Weak<Self> = Arc::downgrade(self);
        *pump = Some(runtime.spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(payload) => {
                        let Some(this) = weak.upgrade() else { break };
                        this.deliver_remote(&payload);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "change pump lagged behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }));
        debug!(origin = %self.origin, "change pump started");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        lock(&self.pump).as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the pump and drop all listeners and caches.
    pub fn shutdown(&self) {
        if let Some(handle) = lock(&self.pump).take() {
            handle.abort();
        }
        lock(&self.listeners).clear();
        lock(&self.caches).clear();
        debug!(origin = %self.origin, "sync broadcaster shut down");
    }
}

//! The configuration controller: one editing session over one scope.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use chrono::{DateTime, Utc};
use rpt_model::{ReportConfiguration, Scope};
use rpt_persistence::{
    AutoSaveConfig, DefaultReportProvider, DraftTracker, PersistenceGateway, ResolvedSource,
    SaveReceipt,
};
use rpt_placement::PlacementOp;
use rpt_sync::{ChangeKind, SyncBroadcaster, SyncNotification};
use rpt_validate::ValidationReport;
use tracing::{debug, info, warn};

use crate::error::{Result, SessionError};
use crate::state::SessionState;

/// Id and timestamp of a save made by this session.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OwnSave {
    config_id: String,
    at: DateTime<Utc>,
}

impl OwnSave {
    fn matches(&self, notification: &SyncNotification) -> bool {
        self.config_id == notification.config_id && self.at == notification.timestamp
    }
}

/// Mutable session data behind the controller's lock.
#[derive(Debug, Default)]
struct Inner {
    state: SessionState,
    buffer: Option<ReportConfiguration>,
    /// Scope the session was opened for.
    requested: Option<Scope>,
    /// Partition the buffer was resolved from.
    resolved_from: Option<Scope>,
    source: Option<ResolvedSource>,
    /// Whether the buffer's id already exists in storage.
    persisted: bool,
    report: ValidationReport,
    last_error: Option<String>,
    tracker: DraftTracker,
    /// Another session changed this scope since the buffer was loaded.
    stale: bool,
    /// Identifies the notification our own last save produced.
    last_saved: Option<OwnSave>,
}

impl Inner {
    fn ensure_idle(&self) -> Result<()> {
        if self.state.is_busy() {
            return Err(SessionError::Busy { state: self.state });
        }
        Ok(())
    }

    fn settled_state(&self) -> SessionState {
        if self.buffer.is_some() {
            SessionState::Ready
        } else {
            SessionState::Empty
        }
    }

    fn concerns(&self, scope: &Scope) -> bool {
        self.requested.as_ref() == Some(scope)
            || self.resolved_from.as_ref() == Some(scope)
            || self.buffer.as_ref().is_some_and(|b| &b.owner_scope == scope)
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Settles the session if a load or save future is dropped while the store
/// call is still running.
///
/// Must be disarmed before the completing command takes the lock.
struct InFlight<'a> {
    inner: &'a Mutex<Inner>,
    saving: bool,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn loading(inner: &'a Mutex<Inner>) -> Self {
        Self {
            inner,
            saving: false,
            armed: true,
        }
    }

    fn saving(inner: &'a Mutex<Inner>) -> Self {
        Self {
            inner,
            saving: true,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = lock(self.inner);
        inner.state = inner.settled_state();
        if self.saving {
            inner.tracker.save_failed();
        }
        debug!(state = %inner.state, "command cancelled before the store answered");
    }
}

/// Owns the edit buffer of one session and orchestrates placement,
/// validation, persistence and change notification around it.
///
/// Commands run one at a time. A load or save that is in flight makes every
/// other command fail with [`SessionError::Busy`]; nothing is queued.
/// Store access happens on tokio's blocking pool, so the async commands must
/// be awaited inside a tokio runtime.
pub struct ConfigurationController {
    session_id: String,
    gateway: PersistenceGateway,
    defaults: Arc<dyn DefaultReportProvider>,
    autosave: AutoSaveConfig,
    broadcaster: Mutex<Option<Arc<SyncBroadcaster>>>,
    inner: Arc<Mutex<Inner>>,
}

impl std::fmt::Debug for ConfigurationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigurationController")
            .field("session_id", &self.session_id)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl ConfigurationController {
    pub fn new(gateway: PersistenceGateway, defaults: Arc<dyn DefaultReportProvider>) -> Self {
        Self {
            session_id: rpt_model::new_id(),
            gateway,
            defaults,
            autosave: AutoSaveConfig::default(),
            broadcaster: Mutex::default(),
            inner: Arc::default(),
        }
    }

    /// Use a custom draft policy.
    pub fn with_autosave(mut self, autosave: AutoSaveConfig) -> Self {
        self.autosave = autosave;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock(&self.inner)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    /// Copy of the edit buffer.
    pub fn configuration(&self) -> Option<ReportConfiguration> {
        self.lock().buffer.clone()
    }

    /// Validation result of the current buffer.
    pub fn report(&self) -> ValidationReport {
        self.lock().report.clone()
    }

    /// Where the last load found its configuration.
    pub fn resolved_source(&self) -> Option<ResolvedSource> {
        self.lock().source
    }

    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    /// Whether the buffer has edits that were not saved.
    pub fn is_dirty(&self) -> bool {
        self.lock().tracker.is_dirty()
    }

    pub fn is_stale(&self) -> bool {
        self.lock().stale
    }

    // =========================================================================
    // COMMANDS
    // =========================================================================

    /// Start a fresh, unsaved configuration for `scope`.
    pub fn create_empty(&self, scope: Scope, name: &str) -> Result<()> {
        let mut inner = self.lock();
        inner.ensure_idle()?;

        let config = ReportConfiguration::new(name, scope.clone());
        info!(session = %self.session_id, scope = %scope, config_id = %config.id, "created empty configuration");
        inner.report = rpt_validate::validate(&config, self.gateway.catalog());
        inner.buffer = Some(config);
        inner.requested = Some(scope.clone());
        inner.resolved_from = Some(scope);
        inner.source = None;
        inner.persisted = false;
        inner.last_error = None;
        inner.stale = false;
        inner.tracker.reset();
        inner.state = SessionState::Ready;
        Ok(())
    }

    /// Load the configuration to edit for `scope` through the resolution
    /// chain. Unsaved edits are discarded.
    pub async fn load_for_scope(&self, scope: Scope) -> Result<ResolvedSource> {
        {
            let mut inner = self.lock();
            inner.ensure_idle()?;
            inner.state = SessionState::Loading;
        }
        let in_flight = InFlight::loading(&self.inner);

        let gateway = self.gateway.clone();
        let defaults = Arc::clone(&self.defaults);
        let client_id = scope.client_id().map(str::to_string);
        let outcome = tokio::task::spawn_blocking(move || {
            gateway.resolve(client_id.as_deref(), defaults.as_ref())
        })
        .await;
        in_flight.disarm();

        let mut inner = self.lock();
        let resolution = match outcome {
            Ok(resolution) => resolution,
            Err(e) => {
                inner.state = inner.settled_state();
                inner.last_error = Some(e.to_string());
                return Err(SessionError::Task(e.to_string()));
            }
        };

        let resolved_from = match resolution.source {
            ResolvedSource::Client | ResolvedSource::Global => {
                resolution.configuration.owner_scope.clone()
            }
            ResolvedSource::BuiltIn => scope.clone(),
        };
        info!(
            session = %self.session_id,
            scope = %scope,
            source = %resolution.source,
            config_id = %resolution.configuration.id,
            "loaded configuration"
        );

        inner.report = rpt_validate::validate(&resolution.configuration, self.gateway.catalog());
        inner.buffer = Some(resolution.configuration);
        inner.requested = Some(scope);
        inner.resolved_from = Some(resolved_from);
        inner.source = Some(resolution.source);
        inner.persisted = resolution.source != ResolvedSource::BuiltIn;
        inner.last_error = None;
        inner.stale = false;
        inner.tracker.reset();
        inner.state = SessionState::Ready;
        Ok(resolution.source)
    }

    /// Apply a placement command to the buffer and re-validate it.
    ///
    /// Validation findings are returned, never raised. A command that names
    /// a missing region or widget, or a rejected drop, leaves the buffer as
    /// it was.
    pub fn apply_placement(&self, op: &PlacementOp) -> Result<ValidationReport> {
        let mut inner = self.lock();
        inner.ensure_idle()?;
        let buffer = inner.buffer.as_ref().ok_or(SessionError::NoConfiguration)?;

        let next = match op.apply(buffer) {
            Ok(next) => next,
            Err(e) => {
                debug!(session = %self.session_id, op = op.name(), error = %e, "placement refused");
                inner.last_error = Some(e.to_string());
                return Err(e.into());
            }
        };

        let report = rpt_validate::validate(&next, self.gateway.catalog());
        debug!(
            session = %self.session_id,
            op = op.name(),
            errors = report.error_count(),
            warnings = report.warning_count(),
            "applied placement"
        );
        inner.buffer = Some(next);
        inner.report = report.clone();
        inner.last_error = None;
        inner.tracker.mark_dirty();
        Ok(report)
    }

    /// Persist the buffer.
    ///
    /// On success the buffer is replaced by the stored copy, other sessions
    /// are notified and caches for the scope are invalidated. On failure the
    /// buffer is kept and the message is available from
    /// [`last_error`](Self::last_error).
    pub async fn save(&self) -> Result<SaveReceipt> {
        let snapshot = {
            let mut inner = self.lock();
            inner.ensure_idle()?;
            let snapshot = inner.buffer.clone().ok_or(SessionError::NoConfiguration)?;
            inner.state = SessionState::Saving;
            inner.tracker.start_save();
            snapshot
        };
        let in_flight = InFlight::saving(&self.inner);

        let gateway = self.gateway.clone();
        let outcome = tokio::task::spawn_blocking(move || gateway.save(&snapshot)).await;
        in_flight.disarm();

        let (receipt, kind) = {
            let mut inner = self.lock();
            inner.state = SessionState::Ready;
            let receipt = match outcome {
                Ok(Ok(receipt)) => receipt,
                Ok(Err(e)) => {
                    warn!(session = %self.session_id, error = %e, "save failed");
                    inner.tracker.save_failed();
                    inner.last_error = Some(e.user_message());
                    return Err(e.into());
                }
                Err(e) => {
                    inner.tracker.save_failed();
                    inner.last_error = Some(e.to_string());
                    return Err(SessionError::Task(e.to_string()));
                }
            };

            let kind = if inner.persisted {
                ChangeKind::Updated
            } else {
                ChangeKind::Created
            };
            inner.report = rpt_validate::validate(&receipt.configuration, self.gateway.catalog());
            inner.buffer = Some(receipt.configuration.clone());
            inner.resolved_from = Some(receipt.scope.clone());
            inner.persisted = true;
            inner.last_error = None;
            inner.tracker.save_complete();
            inner.last_saved = Some(OwnSave {
                config_id: receipt.id.clone(),
                at: receipt.saved_at,
            });
            (receipt, kind)
        };

        // Lock released: local listeners run synchronously inside announce.
        if let Some(broadcaster) = self.broadcaster() {
            broadcaster.announce(&SyncNotification {
                kind,
                scope: receipt.scope.clone(),
                config_id: receipt.id.clone(),
                timestamp: receipt.saved_at,
                message: receipt.message.clone(),
            });
            broadcaster.invalidate(&receipt.scope);
        }
        Ok(receipt)
    }

    /// Write a draft of the buffer if the auto-save policy says one is due.
    ///
    /// Returns whether a draft was written.
    pub async fn autosave_draft(&self) -> Result<bool> {
        let snapshot = {
            let inner = self.lock();
            if inner.state != SessionState::Ready
                || !inner.tracker.should_write_draft(&self.autosave)
            {
                return Ok(false);
            }
            match inner.buffer.clone() {
                Some(buffer) => buffer,
                None => return Ok(false),
            }
        };

        let gateway = self.gateway.clone();
        let outcome = tokio::task::spawn_blocking(move || gateway.save_draft(&snapshot)).await;

        let mut inner = self.lock();
        match outcome {
            Ok(Ok(())) => {
                inner.tracker.draft_written();
                Ok(true)
            }
            Ok(Err(e)) => {
                warn!(session = %self.session_id, error = %e, "draft write failed");
                inner.last_error = Some(e.user_message());
                Err(e.into())
            }
            Err(e) => Err(SessionError::Task(e.to_string())),
        }
    }

    /// Replace the buffer with its stored draft, if any.
    ///
    /// The restored buffer counts as unsaved edits.
    pub async fn restore_draft(&self) -> Result<bool> {
        let config_id = {
            let inner = self.lock();
            inner.ensure_idle()?;
            inner
                .buffer
                .as_ref()
                .map(|b| b.id.clone())
                .ok_or(SessionError::NoConfiguration)?
        };

        let gateway = self.gateway.clone();
        let outcome = tokio::task::spawn_blocking(move || gateway.load_draft(&config_id))
            .await
            .map_err(|e| SessionError::Task(e.to_string()))?;

        let Some(draft) = outcome? else {
            return Ok(false);
        };
        let mut inner = self.lock();
        inner.ensure_idle()?;
        info!(session = %self.session_id, config_id = %draft.id, "restored draft");
        inner.report = rpt_validate::validate(&draft, self.gateway.catalog());
        inner.buffer = Some(draft);
        inner.tracker.mark_dirty();
        Ok(true)
    }

    // =========================================================================
    // SYNCHRONIZATION
    // =========================================================================

    fn broadcaster(&self) -> Option<Arc<SyncBroadcaster>> {
        self.broadcaster
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Connect the session to a broadcaster.
    ///
    /// Saves are announced through it, and changes to this session's scope
    /// made elsewhere mark the session stale.
    pub fn attach(&self, broadcaster: Arc<SyncBroadcaster>) {
        // Listener ids are the session id, so the old registration has to go
        // before the new one is added, even when re-attaching to the same
        // broadcaster.
        let previous = self
            .broadcaster
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(Arc::clone(&broadcaster));
        if let Some(previous) = previous {
            previous.remove_listener(&self.session_id);
        }

        let inner: Weak<Mutex<Inner>> = Arc::downgrade(&self.inner);
        let session_id = self.session_id.clone();
        broadcaster.add_listener(self.session_id.clone(), move |n: &SyncNotification| {
            let Some(inner) = inner.upgrade() else { return };
            let mut inner = lock(&inner);
            if inner
                .last_saved
                .as_ref()
                .is_some_and(|own| own.matches(n))
            {
                return;
            }
            if inner.concerns(&n.scope) {
                debug!(session = %session_id, scope = %n.scope, kind = ?n.kind, "session is stale");
                inner.stale = true;
            }
        });
    }

    /// Disconnect from the broadcaster, if attached.
    pub fn detach(&self) {
        let previous = self
            .broadcaster
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(previous) = previous {
            previous.remove_listener(&self.session_id);
        }
    }

    /// Reload when another session changed this scope.
    ///
    /// A buffer with unsaved edits is never overwritten. Returns whether a
    /// reload happened.
    pub async fn refresh_if_stale(&self) -> Result<bool> {
        let scope = {
            let inner = self.lock();
            if !inner.stale {
                return Ok(false);
            }
            if inner.tracker.is_dirty() {
                warn!(session = %self.session_id, "scope changed elsewhere; keeping unsaved edits");
                return Ok(false);
            }
            match inner.requested.clone() {
                Some(scope) => scope,
                None => return Ok(false),
            }
        };
        self.load_for_scope(scope).await?;
        Ok(true)
    }
}

impl Drop for ConfigurationController {
    fn drop(&mut self) {
        self.detach();
    }
}

//! Controller behaviour over in-memory stores.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rpt_model::{
    ChartType, ChartWidget, DataCategory, DataField, DataSource, FieldKind, GridRegion,
    ReportConfiguration, Scope,
};
use rpt_persistence::{
    AutoSaveConfig, EmptyReportProvider, KeyValueStore, MemoryStore, PersistenceGateway,
    ResolvedSource,
};
use rpt_placement::PlacementOp;
use rpt_session::{ConfigurationController, SessionError, SessionState};
use rpt_sync::{InProcessChangeBus, SyncBroadcaster};

fn sales() -> DataSource {
    DataSource::new("ds-sales", "Sales", DataCategory::Revenue)
        .with_field(DataField::new("month", "Month", FieldKind::Date))
        .with_field(DataField::new("amount", "Amount", FieldKind::Number))
}

fn names() -> DataSource {
    DataSource::new("ds-names", "Names", DataCategory::Custom)
        .with_field(DataField::new("first", "First", FieldKind::Text))
}

fn global_report() -> ReportConfiguration {
    ReportConfiguration::new("Company default", Scope::Global).with_region(
        GridRegion::new(2, 0)
            .with_id("top")
            .with_widget(ChartWidget::new(ChartType::TrendOverTime, 0, sales()).with_id("trend")),
    )
}

fn controller(gateway: &PersistenceGateway) -> ConfigurationController {
    ConfigurationController::new(gateway.clone(), Arc::new(EmptyReportProvider))
}

fn memory_gateway() -> PersistenceGateway {
    PersistenceGateway::new(Arc::new(MemoryStore::new()))
}

#[tokio::test]
async fn load_reports_global_fallback() {
    let gateway = memory_gateway();
    let global = global_report();
    gateway.save(&global).unwrap();

    let session = controller(&gateway);
    assert_eq!(session.state(), SessionState::Empty);
    let source = session.load_for_scope(Scope::client("acme")).await.unwrap();

    assert_eq!(source, ResolvedSource::Global);
    assert_eq!(session.state(), SessionState::Ready);
    assert_eq!(session.configuration().unwrap().id, global.id);
    assert!(session.report().is_valid());
}

#[tokio::test]
async fn placement_edits_buffer_and_revalidates() {
    let gateway = memory_gateway();
    gateway.save(&global_report()).unwrap();
    let session = controller(&gateway);
    session.load_for_scope(Scope::Global).await.unwrap();

    // Incompatible widget: accepted into the buffer, reported as an error.
    let widget = ChartWidget::new(ChartType::MultiSeries, 1, names());
    let report = session
        .apply_placement(&PlacementOp::Place {
            widget: Box::new(widget),
            source_region_id: None,
            target_region_id: "top".into(),
            column_index: 1,
        })
        .unwrap();
    assert_eq!(report.error_count(), 1);
    assert!(session.is_dirty());
    assert_eq!(session.configuration().unwrap().widget_count(), 2);

    // Unknown widget id: refused, buffer unchanged.
    let before = session.configuration().unwrap();
    let err = session
        .apply_placement(&PlacementOp::Swap {
            first_widget_id: "trend".into(),
            second_widget_id: "ghost".into(),
        })
        .unwrap_err();
    assert!(matches!(err, SessionError::Placement(_)));
    assert_eq!(session.configuration().unwrap().regions, before.regions);
    assert!(session.last_error().unwrap().contains("ghost"));

    // The next accepted command clears it.
    session
        .apply_placement(&PlacementOp::AddRegion { column_count: 1 })
        .unwrap();
    assert_eq!(session.last_error(), None);
}

#[tokio::test]
async fn failed_save_keeps_buffer() {
    let gateway = memory_gateway();
    let session = controller(&gateway);
    session.create_empty(Scope::client("acme"), "Draft").unwrap();

    let err = session.save().await.unwrap_err();
    assert!(matches!(err, SessionError::Persistence(_)));
    assert_eq!(session.state(), SessionState::Ready);
    assert!(session.last_error().unwrap().contains("not saved"));
    assert_eq!(session.configuration().unwrap().name, "Draft");
    assert!(gateway.load(&Scope::client("acme")).unwrap_err().is_not_found());
}

#[tokio::test]
async fn save_replaces_buffer_with_stored_copy() {
    let gateway = memory_gateway();
    let session = controller(&gateway);
    session.create_empty(Scope::Global, "Fresh").unwrap();
    session
        .apply_placement(&PlacementOp::AddRegion { column_count: 1 })
        .unwrap();
    let region_id = session.configuration().unwrap().regions[0].id.clone();
    session
        .apply_placement(&PlacementOp::Place {
            widget: Box::new(ChartWidget::new(ChartType::GenericLine, 0, sales())),
            source_region_id: None,
            target_region_id: region_id,
            column_index: 0,
        })
        .unwrap();

    let receipt = session.save().await.unwrap();
    assert!(!session.is_dirty());
    assert_eq!(session.last_error(), None);
    assert_eq!(
        session.configuration().unwrap().updated_at,
        receipt.saved_at
    );
    assert_eq!(gateway.load(&Scope::Global).unwrap().id, receipt.id);
}

#[tokio::test]
async fn commands_without_configuration_fail() {
    let session = controller(&memory_gateway());
    assert!(matches!(
        session.save().await,
        Err(SessionError::NoConfiguration)
    ));
    assert!(matches!(
        session.apply_placement(&PlacementOp::AddRegion { column_count: 2 }),
        Err(SessionError::NoConfiguration)
    ));
}

#[tokio::test]
async fn draft_written_when_policy_allows() {
    let gateway = memory_gateway();
    gateway.save(&global_report()).unwrap();
    let immediate = AutoSaveConfig {
        enabled: true,
        debounce_ms: 0,
        max_delay_ms: 0,
    };
    let session = controller(&gateway).with_autosave(immediate);
    session.load_for_scope(Scope::Global).await.unwrap();

    // Nothing to write before an edit.
    assert!(!session.autosave_draft().await.unwrap());

    session
        .apply_placement(&PlacementOp::AddRegion { column_count: 3 })
        .unwrap();
    assert!(session.autosave_draft().await.unwrap());
    assert!(!session.autosave_draft().await.unwrap());
    assert!(session.is_dirty());

    let id = session.configuration().unwrap().id;
    let draft = gateway.load_draft(&id).unwrap().unwrap();
    assert_eq!(draft.regions.len(), 2);

    // Reloading drops the edit; restoring brings it back.
    session.load_for_scope(Scope::Global).await.unwrap();
    assert_eq!(session.configuration().unwrap().regions.len(), 1);
    assert!(session.restore_draft().await.unwrap());
    assert_eq!(session.configuration().unwrap().regions.len(), 2);
    assert!(session.is_dirty());
}

// ============================================================================
// Busy guard
// ============================================================================

/// Store whose first read or write blocks until the test releases it.
struct GatedStore {
    inner: MemoryStore,
    gate: Mutex<Option<mpsc::Receiver<()>>>,
}

impl GatedStore {
    fn new() -> (mpsc::Sender<()>, Self) {
        let (release, gate) = mpsc::channel();
        let store = Self {
            inner: MemoryStore::new(),
            gate: Mutex::new(Some(gate)),
        };
        (release, store)
    }

    fn wait(&self) {
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.recv();
        }
    }
}

impl KeyValueStore for GatedStore {
    fn get(&self, key: &str) -> Option<String> {
        self.wait();
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.wait();
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> bool {
        self.inner.remove(key)
    }

    fn keys(&self) -> Vec<String> {
        self.inner.keys()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn commands_during_load_are_busy() {
    let (release, store) = GatedStore::new();
    let gateway = PersistenceGateway::new(Arc::new(store));
    let session = Arc::new(controller(&gateway));

    let loading = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.load_for_scope(Scope::Global).await })
    };

    while session.state() != SessionState::Loading {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let err = session.save().await.unwrap_err();
    assert!(err.is_busy());
    let err = session.load_for_scope(Scope::Global).await.unwrap_err();
    assert!(err.is_busy());

    release.send(()).unwrap();
    let source = loading.await.unwrap().unwrap();
    assert_eq!(source, ResolvedSource::BuiltIn);
    assert_eq!(session.state(), SessionState::Ready);
}

/// Fill `session` with a fresh global configuration that passes validation.
fn build_valid(session: &ConfigurationController) {
    session.create_empty(Scope::Global, "Fresh").unwrap();
    session
        .apply_placement(&PlacementOp::AddRegion { column_count: 1 })
        .unwrap();
    let region_id = session.configuration().unwrap().regions[0].id.clone();
    session
        .apply_placement(&PlacementOp::Place {
            widget: Box::new(ChartWidget::new(ChartType::GenericLine, 0, sales())),
            source_region_id: None,
            target_region_id: region_id,
            column_index: 0,
        })
        .unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn commands_during_save_are_busy() {
    let (release, store) = GatedStore::new();
    let gateway = PersistenceGateway::new(Arc::new(store));
    let session = Arc::new(controller(&gateway));
    build_valid(&session);

    let saving = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.save().await })
    };

    while session.state() != SessionState::Saving {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let err = session.save().await.unwrap_err();
    assert!(err.is_busy());
    let err = session.load_for_scope(Scope::Global).await.unwrap_err();
    assert!(err.is_busy());
    let err = session
        .apply_placement(&PlacementOp::AddRegion { column_count: 1 })
        .unwrap_err();
    assert!(err.is_busy());
    assert!(session.create_empty(Scope::Global, "Other").unwrap_err().is_busy());

    release.send(()).unwrap();
    let receipt = saving.await.unwrap().unwrap();
    assert_eq!(session.state(), SessionState::Ready);
    assert!(!session.is_dirty());
    assert_eq!(gateway.load(&Scope::Global).unwrap().id, receipt.id);
}

// ============================================================================
// Cancellation
// ============================================================================

/// Store that answers every call after a fixed delay.
struct SlowStore {
    inner: MemoryStore,
    delay: Duration,
}

impl SlowStore {
    fn gateway(delay: Duration) -> PersistenceGateway {
        PersistenceGateway::new(Arc::new(Self {
            inner: MemoryStore::new(),
            delay,
        }))
    }
}

impl KeyValueStore for SlowStore {
    fn get(&self, key: &str) -> Option<String> {
        std::thread::sleep(self.delay);
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> bool {
        std::thread::sleep(self.delay);
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> bool {
        self.inner.remove(key)
    }

    fn keys(&self) -> Vec<String> {
        self.inner.keys()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dropped_load_does_not_leave_session_busy() {
    let gateway = SlowStore::gateway(Duration::from_millis(200));
    let session = controller(&gateway);

    let timed_out = tokio::time::timeout(
        Duration::from_millis(20),
        session.load_for_scope(Scope::Global),
    )
    .await;
    assert!(timed_out.is_err());
    assert_eq!(session.state(), SessionState::Empty);

    session.create_empty(Scope::Global, "After").unwrap();
    assert_eq!(session.state(), SessionState::Ready);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dropped_save_keeps_edits_and_accepts_commands() {
    let gateway = SlowStore::gateway(Duration::from_millis(200));
    let session = controller(&gateway);
    build_valid(&session);

    let timed_out = tokio::time::timeout(Duration::from_millis(20), session.save()).await;
    assert!(timed_out.is_err());
    assert_eq!(session.state(), SessionState::Ready);
    assert!(session.is_dirty());
    assert_eq!(session.configuration().unwrap().widget_count(), 1);

    // Let the abandoned write finish so it cannot land after the next save.
    tokio::time::sleep(Duration::from_secs(1)).await;
    session
        .apply_placement(&PlacementOp::AddRegion { column_count: 2 })
        .unwrap();
    session.save().await.unwrap();
    assert!(!session.is_dirty());
    assert_eq!(gateway.load(&Scope::Global).unwrap().regions.len(), 2);
}

// ============================================================================
// Cross-session synchronization
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn save_in_one_session_marks_other_stale() {
    let gateway = memory_gateway();
    gateway.save(&global_report()).unwrap();

    let bus = Arc::new(InProcessChangeBus::default());
    let editor_bus = SyncBroadcaster::new(bus.clone());
    let viewer_bus = SyncBroadcaster::new(bus);
    editor_bus.start().unwrap();
    viewer_bus.start().unwrap();

    let editor = controller(&gateway);
    editor.attach(Arc::clone(&editor_bus));
    let viewer = controller(&gateway);
    viewer.attach(Arc::clone(&viewer_bus));

    editor.load_for_scope(Scope::Global).await.unwrap();
    viewer.load_for_scope(Scope::client("acme")).await.unwrap();

    editor
        .apply_placement(&PlacementOp::AddRegion { column_count: 2 })
        .unwrap();
    editor.save().await.unwrap();
    assert!(!editor.is_stale());

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !viewer.is_stale() {
        assert!(tokio::time::Instant::now() < deadline, "viewer never went stale");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert!(viewer.refresh_if_stale().await.unwrap());
    assert!(!viewer.is_stale());
    assert_eq!(viewer.configuration().unwrap().regions.len(), 2);
    assert!(!viewer.refresh_if_stale().await.unwrap());

    editor_bus.shutdown();
    viewer_bus.shutdown();
}

#[tokio::test]
async fn stale_session_keeps_unsaved_edits() {
    let gateway = memory_gateway();
    gateway.save(&global_report()).unwrap();
    let broadcaster = SyncBroadcaster::new(Arc::new(InProcessChangeBus::default()));

    let first = controller(&gateway);
    first.attach(Arc::clone(&broadcaster));
    let second = controller(&gateway);
    second.attach(Arc::clone(&broadcaster));

    first.load_for_scope(Scope::Global).await.unwrap();
    second.load_for_scope(Scope::Global).await.unwrap();
    second
        .apply_placement(&PlacementOp::AddRegion { column_count: 1 })
        .unwrap();

    first.save().await.unwrap();
    assert!(second.is_stale());
    assert!(!second.refresh_if_stale().await.unwrap());
    assert!(second.is_dirty());
    assert_eq!(second.configuration().unwrap().regions.len(), 2);
}

#[tokio::test]
async fn reattaching_to_same_broadcaster_keeps_listening() {
    let gateway = memory_gateway();
    gateway.save(&global_report()).unwrap();
    let broadcaster = SyncBroadcaster::new(Arc::new(InProcessChangeBus::default()));

    let editor = controller(&gateway);
    let viewer = controller(&gateway);
    viewer.attach(Arc::clone(&broadcaster));
    viewer.attach(Arc::clone(&broadcaster));
    assert_eq!(broadcaster.listener_count(), 1);

    editor.attach(Arc::clone(&broadcaster));
    assert_eq!(broadcaster.listener_count(), 2);

    viewer.load_for_scope(Scope::Global).await.unwrap();
    editor.load_for_scope(Scope::Global).await.unwrap();
    editor
        .apply_placement(&PlacementOp::AddRegion { column_count: 1 })
        .unwrap();
    editor.save().await.unwrap();
    assert!(viewer.is_stale());

    // Moving to another broadcaster leaves nothing behind on the first.
    let other = SyncBroadcaster::new(Arc::new(InProcessChangeBus::default()));
    viewer.attach(Arc::clone(&other));
    assert_eq!(broadcaster.listener_count(), 1);
    assert_eq!(other.listener_count(), 1);
}

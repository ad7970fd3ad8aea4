//! Gateway behaviour over real stores.

use std::sync::Arc;

use rpt_model::{
    ChartType, ChartWidget, DataCategory, DataField, DataSource, FieldKind, FieldRole, GridRegion,
    ReportConfiguration, Scope,
};
use rpt_persistence::{
    CURRENT_SCHEMA_VERSION, EmptyReportProvider, FileStore, KeyValueStore, MemoryStore,
    PersistenceError, PersistenceGateway, ResolvedSource,
};
use rpt_validate::Category;
use tempfile::tempdir;

fn budget_source() -> DataSource {
    DataSource::new("ds-budget", "Budget vs actual", DataCategory::Budget)
        .with_field(DataField::new("dept", "Department", FieldKind::Text).with_role(FieldRole::Category))
        .with_field(
            DataField::new("actual", "Actual", FieldKind::Number)
                .with_role(FieldRole::PrimaryMetric),
        )
        .with_field(
            DataField::new("planned", "Planned", FieldKind::Number)
                .with_role(FieldRole::BudgetMetric),
        )
}

fn text_only_source() -> DataSource {
    DataSource::new("ds-names", "Names", DataCategory::Custom)
        .with_field(DataField::new("first", "First", FieldKind::Text))
        .with_field(DataField::new("last", "Last", FieldKind::Text))
}

fn report(name: &str, scope: Scope) -> ReportConfiguration {
    ReportConfiguration::new(name, scope).with_region(
        GridRegion::new(2, 0)
            .with_widget(ChartWidget::new(ChartType::ComparisonWithBudget, 0, budget_source()))
            .with_widget(ChartWidget::new(ChartType::GenericPie, 1, budget_source())),
    )
}

fn memory_gateway() -> PersistenceGateway {
    PersistenceGateway::new(Arc::new(MemoryStore::new()))
}

#[test]
fn round_trip_through_file_store() {
    let dir = tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    let gateway = PersistenceGateway::new(Arc::new(store.clone()));

    let config = report("Quarterly", Scope::client("acme"));
    gateway.save(&config).unwrap();

    // A second gateway over the same directory sees the same data.
    let reopened = PersistenceGateway::new(Arc::new(FileStore::open(dir.path()).unwrap()));
    let loaded = reopened.load(&Scope::client("acme")).unwrap();

    assert_eq!(loaded.id, config.id);
    assert_eq!(loaded.name, config.name);
    assert_eq!(loaded.regions, config.regions);
    assert_eq!(loaded.created_at, config.created_at);
    assert!(loaded.updated_at >= config.updated_at);

    let raw = store.get("config:client:acme").unwrap();
    assert!(raw.contains(r#""__type":"Date""#));
}

#[test]
fn fallback_chain_serves_global_for_unknown_client() {
    let gateway = memory_gateway();
    let global = report("Company default", Scope::Global);
    gateway.save(&global).unwrap();

    let resolved = gateway.resolve(Some("acme"), &EmptyReportProvider);
    assert_eq!(resolved.source, ResolvedSource::Global);
    assert_eq!(resolved.configuration.id, global.id);
    assert_eq!(resolved.configuration.regions, global.regions);
}

#[test]
fn incompatible_widget_rejects_save() {
    let gateway = memory_gateway();
    let config = ReportConfiguration::new("Shares", Scope::Global).with_region(
        GridRegion::new(1, 0)
            .with_widget(ChartWidget::new(ChartType::MixOfParts, 0, text_only_source())),
    );

    let err = gateway.save(&config).unwrap_err();
    let PersistenceError::Validation { report } = &err else {
        panic!("expected validation failure, got {err:?}");
    };
    assert_eq!(report.error_count(), 1);
    assert_eq!(report.errors[0].category(), Category::DataCompatibility);
    assert!(err.to_string().contains("is not compatible with"));
    assert!(gateway.load(&Scope::Global).unwrap_err().is_not_found());
}

#[test]
fn catalog_overrides_embedded_source() {
    let catalog_entry = DataSource::new("ds-names", "Names", DataCategory::Custom)
        .with_field(DataField::new("a", "A", FieldKind::Fraction))
        .with_field(DataField::new("b", "B", FieldKind::Fraction));
    let gateway = memory_gateway().with_catalog(vec![catalog_entry]);
    let config = ReportConfiguration::new("Shares", Scope::Global).with_region(
        GridRegion::new(1, 0)
            .with_widget(ChartWidget::new(ChartType::MixOfParts, 0, text_only_source())),
    );
    assert!(gateway.save(&config).is_ok());
}

#[test]
fn best_effort_import_keeps_valid_entries() {
    let gateway = memory_gateway();
    let first = report("First", Scope::client("a"));
    let mut second = report("Second", Scope::client("b"));
    second.name.clear();
    let third = report("Third", Scope::client("c"));

    let document = serde_json::json!({
        "schemaVersion": CURRENT_SCHEMA_VERSION,
        "exportedAt": {"__type": "Date", "value": "2024-05-01T10:00:00.000Z"},
        "configurations": [&first, &second, &third],
    })
    .to_string();

    let report = gateway.import_all(&document).unwrap();
    assert_eq!(report.imported, vec![first.id.clone(), third.id.clone()]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].position, 2);
    assert!(report.failure_message().starts_with("Entry 2 ("));
    assert!(!report.failure_message().contains("Entry 1"));
    assert!(!report.failure_message().contains("Entry 3"));

    assert!(gateway.load(&Scope::client("a")).is_ok());
    assert!(gateway.load(&Scope::client("b")).unwrap_err().is_not_found());
    assert!(gateway.load(&Scope::client("c")).is_ok());
}

#[test]
fn export_then_import_into_empty_store() {
    let source = memory_gateway();
    source.save(&report("Global", Scope::Global)).unwrap();
    source.save(&report("Acme", Scope::client("acme"))).unwrap();

    let document = source.export_all().unwrap();
    assert!(document.contains(r#""schemaVersion": 1"#));

    let target = memory_gateway();
    let report = target.import_all(&document).unwrap();
    assert!(report.is_complete());
    assert_eq!(report.imported.len(), 2);
    assert_eq!(target.list().len(), 2);
    assert_eq!(
        target.load(&Scope::client("acme")).unwrap().name,
        source.load(&Scope::client("acme")).unwrap().name
    );
}

#[test]
fn newer_export_is_refused() {
    let gateway = memory_gateway();
    let document = r#"{"schemaVersion": 99, "configurations": []}"#;
    let err = gateway.import_all(document).unwrap_err();
    assert!(matches!(
        err,
        PersistenceError::UnsupportedVersion {
            found: 99,
            max_supported: 1
        }
    ));
    insta::assert_snapshot!(
        err.to_string(),
        @"Export schema version 99 is not supported (maximum: 1)"
    );
}

#[test]
fn malformed_documents_are_invalid() {
    let gateway = memory_gateway();
    for document in ["not json", r#"{"configurations": []}"#, r#"{"schemaVersion": 1}"#] {
        let err = gateway.import_all(document).unwrap_err();
        assert_eq!(err.kind(), "invalid-document", "document: {document}");
        assert!(err.suggestion().is_some());
    }
}

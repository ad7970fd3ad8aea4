//! End-to-end validation of whole configurations.

use rpt_model::{
    ChartType, ChartWidget, DataCategory, DataField, DataSource, FieldKind, FieldRole, GridRegion,
    ReportConfiguration, Scope,
};
use rpt_validate::{Category, Issue, Severity, validate, validate_region, validate_widget};

fn revenue() -> DataSource {
    DataSource::new("ds-revenue", "Revenue by month", DataCategory::Revenue)
        .with_field(DataField::new("month", "Month", FieldKind::Date).with_role(FieldRole::TimeAxis))
        .with_field(
            DataField::new("amount", "Amount", FieldKind::Number)
                .with_role(FieldRole::PrimaryMetric),
        )
}

fn labels_only() -> DataSource {
    DataSource::new("ds-labels", "Labels only", DataCategory::Custom)
        .with_field(DataField::new("label", "Label", FieldKind::Text))
}

fn valid_config() -> ReportConfiguration {
    ReportConfiguration::new("Monthly overview", Scope::client("acme"))
        .with_id("cfg-1")
        .with_region(
            GridRegion::new(2, 0)
                .with_id("top")
                .with_widget(ChartWidget::new(ChartType::TrendOverTime, 0, revenue()).with_id("trend"))
                .with_widget(ChartWidget::new(ChartType::GenericLine, 1, revenue()).with_id("line")),
        )
}

#[test]
fn valid_configuration_has_no_issues() {
    let report = validate(&valid_config(), &[revenue()]);
    assert!(report.is_valid());
    assert!(report.is_empty());
}

#[test]
fn revalidation_is_idempotent() {
    let mut config = valid_config();
    config.name.clear();
    config.regions[0].widgets[1].column_index = 0;
    config.regions[0].widgets[1].chart_type = ChartType::MixOfParts;

    let first = validate(&config, &[]);
    let second = validate(&config, &[]);
    assert_eq!(first, second);
    assert!(!first.is_valid());
}

#[test]
fn empty_configuration_reports_identity_and_content() {
    let config = ReportConfiguration::new("", Scope::Global).with_id("");
    let report = validate(&config, &[]);
    assert_eq!(
        report.errors,
        vec![Issue::MissingId, Issue::MissingName, Issue::NoWidgets]
    );
}

#[test]
fn incompatible_widget_blocks_with_named_pair() {
    let config = ReportConfiguration::new("Shares", Scope::Global).with_region(
        GridRegion::new(1, 0)
            .with_widget(ChartWidget::new(ChartType::MixOfParts, 0, labels_only()).with_id("pie")),
    );

    let report = validate(&config, &[]);
    assert_eq!(report.error_count(), 1);
    let issue = &report.errors[0];
    assert_eq!(issue.category(), Category::DataCompatibility);
    assert_eq!(issue.severity(), Severity::Error);
    insta::assert_snapshot!(
        report.error_message(),
        @"Chart type mix-of-parts of widget 'pie' is not compatible with data source 'Labels only': requires at least 2 fraction fields"
    );
}

#[test]
fn rules_accumulate_across_categories() {
    let mut bad = ChartWidget::new(ChartType::GenericBar, 5, labels_only()).with_id("bar");
    bad.presentation.title.clear();

    let config = ReportConfiguration::new("Broken", Scope::Global)
        .with_region(GridRegion::new(1, 0).with_id("r").with_widget(bad))
        .with_region(GridRegion::new(1, 0).with_id("r"));

    let report = validate(&config, &[]);
    let categories: Vec<Category> = report.errors.iter().map(Issue::category).collect();
    assert!(categories.contains(&Category::Structure));
    assert!(categories.contains(&Category::Placement));
    assert!(categories.contains(&Category::Widget));
    assert!(categories.contains(&Category::DataCompatibility));
}

#[test]
fn warnings_do_not_block() {
    let config = valid_config();
    let unrelated = DataSource::new("ds-other", "Other", DataCategory::Custom);

    let report = validate(&config, &[unrelated]);
    assert!(report.is_valid());
    assert_eq!(report.warning_count(), 2);
    assert!(
        report
            .warnings
            .iter()
            .all(|w| matches!(w, Issue::UnknownDataSource { .. }))
    );
}

#[test]
fn targeted_checks() {
    let region = GridRegion::new(1, 0)
        .with_widget(ChartWidget::new(ChartType::GenericBar, 0, labels_only()))
        .with_widget(ChartWidget::new(ChartType::GenericBar, 0, labels_only()));
    let report = validate_region(&region, &[]);
    assert!(
        report
            .errors
            .iter()
            .any(|i| matches!(i, Issue::RegionOverCapacity { .. }))
    );

    let widget = ChartWidget::new(ChartType::MultiSeries, 0, revenue());
    let report = validate_widget(&widget, &[]);
    assert_eq!(report.error_count(), 1);
    assert!(report.error_message().contains("at least 2 number fields"));
}

#[test]
fn report_survives_json_round_trip() {
    let config = ReportConfiguration::new("Broken", Scope::Global)
        .with_region(
            GridRegion::new(1, 0)
                .with_id("r")
                .with_widget(ChartWidget::new(ChartType::MixOfParts, 0, labels_only()).with_id("pie")),
        )
        .with_region(GridRegion::new(1, 1).with_id("r"));
    let unrelated = DataSource::new("ds-other", "Other", DataCategory::Custom);
    let report = validate(&config, &[unrelated]);
    assert!(!report.is_valid());
    assert!(report.warning_count() > 0);

    let json = serde_json::to_string(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let duplicate = value["errors"]
        .as_array()
        .unwrap()
        .iter()
        .find(|issue| issue["issue"] == "duplicateRegionId")
        .unwrap();
    assert_eq!(duplicate["region_id"], "r");

    let back: rpt_validate::ValidationReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
    assert_eq!(back.error_message(), report.error_message());
}

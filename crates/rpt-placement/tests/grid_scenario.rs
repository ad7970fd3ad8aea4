//! A full two-column region refuses new widgets with stable reasons.

use rpt_model::{
    ChartType, ChartWidget, DataCategory, DataField, DataSource, FieldKind, GridRegion,
    ReportConfiguration, Scope,
};
use rpt_placement::{
    PlacementError, PlacementOp, PlacementRejection, can_place, list_valid_targets, place,
    try_place,
};

fn source() -> DataSource {
    DataSource::new("ds-sales", "Sales", DataCategory::Revenue)
        .with_field(DataField::new("region", "Region", FieldKind::Text))
        .with_field(DataField::new("total", "Total", FieldKind::Number))
}

fn full_region_config() -> ReportConfiguration {
    ReportConfiguration::new("Sales", Scope::client("acme")).with_region(
        GridRegion::new(2, 0)
            .with_id("main")
            .with_widget(ChartWidget::new(ChartType::GenericBar, 0, source()).with_id("left"))
            .with_widget(ChartWidget::new(ChartType::GenericPie, 1, source()).with_id("right")),
    )
}

#[test]
fn occupied_column_is_rejected() {
    let config = full_region_config();
    let new_widget = ChartWidget::new(ChartType::GenericLine, 0, source());

    let rejection = can_place(&new_widget, "main", 0, &config).unwrap_err();
    insta::assert_snapshot!(rejection.to_string(), @"Column 0 is already occupied by another widget");

    let err = try_place(&new_widget, None, "main", 0, &config).unwrap_err();
    assert_eq!(err.to_string(), "Column 0 is already occupied by another widget");
}

#[test]
fn column_past_the_end_is_out_of_range() {
    let config = full_region_config();
    let new_widget = ChartWidget::new(ChartType::GenericLine, 0, source());

    let err = try_place(&new_widget, None, "main", 2, &config).unwrap_err();
    assert_eq!(
        err,
        PlacementError::Rejected(PlacementRejection::ColumnOutOfRange {
            column_index: 2,
            column_count: 2,
        })
    );
    insta::assert_snapshot!(
        err.to_string(),
        @"Column 2 is out of range for a region with 2 columns"
    );

    // The unchecked write refuses out-of-range columns too.
    assert!(place(&new_widget, None, "main", 2, &config).is_err());
}

#[test]
fn full_region_offers_no_targets() {
    let config = full_region_config();
    let new_widget = ChartWidget::new(ChartType::GenericLine, 0, source());
    assert!(list_valid_targets(&new_widget, &config).is_empty());
}

#[test]
fn unchecked_place_replaces_occupant() {
    let config = full_region_config();
    let new_widget = ChartWidget::new(ChartType::GenericLine, 0, source()).with_id("fresh");

    let next = place(&new_widget, None, "main", 0, &config).unwrap();
    let region = next.region("main").unwrap();
    assert_eq!(region.widgets.len(), 2);
    assert_eq!(region.widget_at(0).unwrap().id, "fresh");
    assert!(next.find_widget("left").is_none());
}

#[test]
fn rejected_op_leaves_input_untouched() {
    let config = full_region_config();
    let snapshot = config.clone();
    let op = PlacementOp::Place {
        widget: Box::new(ChartWidget::new(ChartType::GenericLine, 0, source())),
        source_region_id: None,
        target_region_id: "main".into(),
        column_index: 1,
    };
    assert!(op.apply(&config).is_err());
    assert_eq!(config, snapshot);
}

//! Cell-level placement: legality checks and the place operation.

use rpt_model::{ChartWidget, GridRegion, ReportConfiguration};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PlacementError, PlacementRejection, Result};

/// A cell of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub region_id: String,
    pub column_index: usize,
}

/// Check whether `widget` may go to `column_index` of the target region.
///
/// Checks run in a fixed order: column bounds, already at this position,
/// cell occupied by a different widget, region at capacity. Capacity counts
/// only widgets other than the one being moved.
pub fn can_place(
    widget: &ChartWidget,
    target_region_id: &str,
    column_index: usize,
    config: &ReportConfiguration,
) -> std::result::Result<(), PlacementRejection> {
    let region = config
        .region(target_region_id)
        .ok_or_else(|| PlacementRejection::RegionMissing {
            region_id: target_region_id.to_string(),
        })?;
    check_cell(widget, region, column_index)
}

fn check_cell(
    widget: &ChartWidget,
    region: &GridRegion,
    column_index: usize,
) -> std::result::Result<(), PlacementRejection> {
    if column_index >= region.columns() {
        return Err(PlacementRejection::ColumnOutOfRange {
            column_index,
            column_count: region.column_count,
        });
    }

    let occupant = region.widget_at(column_index);
    if occupant.is_some_and(|w| w.id == widget.id) {
        return Err(PlacementRejection::AlreadyAtPosition);
    }
    if occupant.is_some() {
        return Err(PlacementRejection::ColumnOccupied { column_index });
    }

    let others = region.widgets.iter().filter(|w| w.id != widget.id).count();
    if others >= region.columns() {
        return Err(PlacementRejection::RegionFull {
            column_count: region.column_count,
        });
    }

    Ok(())
}

/// Put `widget` at `column_index` of the target region.
///
/// The widget is first taken out of `source_region_id` (`None` means it comes
/// from the palette). Any widget already in the target cell is replaced.
/// Errors when a region is missing or the column is out of range.
pub fn place(
    widget: &ChartWidget,
    source_region_id: Option<&str>,
    target_region_id: &str,
    column_index: usize,
    config: &ReportConfiguration,
) -> Result<ReportConfiguration> {
    let mut next = config.clone();

    if let Some(source_id) = source_region_id {
        let source = next
            .region_mut(source_id)
            .ok_or_else(|| PlacementError::region(source_id))?;
        source.widgets.retain(|w| w.id != widget.id);
    }

    let target = next
        .region_mut(target_region_id)
        .ok_or_else(|| PlacementError::region(target_region_id))?;
    if column_index >= target.columns() {
        return Err(PlacementRejection::ColumnOutOfRange {
            column_index,
            column_count: target.column_count,
        }
        .into());
    }

    let mut placed = widget.clone();
    placed.column_index = column_index;
    target
        .widgets
        .retain(|w| w.id != placed.id && w.column_index != column_index);
    target.widgets.push(placed);
    target.widgets.sort_by_key(|w| w.column_index);

    debug!(
        widget_id = %widget.id,
        region_id = target_region_id,
        column_index,
        "placed widget"
    );
    next.touch();
    Ok(next)
}

/// [`can_place`] followed by [`place`]: the checked drop used by editors.
pub fn try_place(
    widget: &ChartWidget,
    source_region_id: Option<&str>,
    target_region_id: &str,
    column_index: usize,
    config: &ReportConfiguration,
) -> Result<ReportConfiguration> {
    if config.region(target_region_id).is_none() {
        return Err(PlacementError::region(target_region_id));
    }
    can_place(widget, target_region_id, column_index, config)?;
    place(
        widget,
        source_region_id,
        target_region_id,
        column_index,
        config,
    )
}

/// Every cell where [`can_place`] would accept `widget`, regions in order.
pub fn list_valid_targets(widget: &ChartWidget, config: &ReportConfiguration) -> Vec<Target> {
    config
        .regions_in_order()
        .into_iter()
        .flat_map(|region| {
            (0..region.columns())
                .filter(|column| check_cell(widget, region, *column).is_ok())
                .map(|column_index| Target {
                    region_id: region.id.clone(),
                    column_index,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpt_model::{ChartType, DataCategory, DataSource, Scope};

    fn widget(id: &str, column: usize) -> ChartWidget {
        let source = DataSource::new("ds", "Source", DataCategory::Custom);
        ChartWidget::new(ChartType::GenericBar, column, source).with_id(id)
    }

    fn config() -> ReportConfiguration {
        ReportConfiguration::new("Report", Scope::Global)
            .with_region(
                GridRegion::new(2, 0)
                    .with_id("full")
                    .with_widget(widget("a", 0))
                    .with_widget(widget("b", 1)),
            )
            .with_region(
                GridRegion::new(3, 1)
                    .with_id("open")
                    .with_widget(widget("c", 1)),
            )
    }

    #[test]
    fn test_rejection_order() {
        let config = config();
        let a = widget("a", 0);
        assert_eq!(
            can_place(&a, "full", 5, &config),
            Err(PlacementRejection::ColumnOutOfRange {
                column_index: 5,
                column_count: 2
            })
        );
        assert_eq!(
            can_place(&a, "full", 0, &config),
            Err(PlacementRejection::AlreadyAtPosition)
        );
        assert_eq!(
            can_place(&a, "full", 1, &config),
            Err(PlacementRejection::ColumnOccupied { column_index: 1 })
        );
        assert!(can_place(&a, "open", 0, &config).is_ok());
        assert!(matches!(
            can_place(&a, "nowhere", 0, &config),
            Err(PlacementRejection::RegionMissing { .. })
        ));
    }

    #[test]
    fn test_capacity_counts_other_widgets_only() {
        // x and y both sit in column 0, so column 1 looks free.
        let mut config = ReportConfiguration::new("Report", Scope::Global)
            .with_region(GridRegion::new(2, 0).with_id("r").with_widget(widget("x", 0)));
        config.regions[0].widgets.push(widget("y", 0));

        assert_eq!(
            can_place(&widget("new", 1), "r", 1, &config),
            Err(PlacementRejection::RegionFull { column_count: 2 })
        );
        assert!(can_place(&widget("y", 0), "r", 1, &config).is_ok());
    }

    #[test]
    fn test_place_moves_and_replaces() {
        let config = config();
        let moved = place(&widget("a", 0), Some("full"), "open", 1, &config).unwrap();

        let full = moved.region("full").unwrap();
        assert_eq!(full.widgets.len(), 1);
        let open = moved.region("open").unwrap();
        assert_eq!(open.widgets.len(), 1);
        assert_eq!(open.widget_at(1).map(|w| w.id.as_str()), Some("a"));
        assert!(moved.updated_at >= config.updated_at);
        // input untouched
        assert_eq!(config.region("open").unwrap().widget_at(1).unwrap().id, "c");
    }

    #[test]
    fn test_place_errors() {
        let config = config();
        assert_eq!(
            place(&widget("n", 0), None, "missing", 0, &config),
            Err(PlacementError::RegionNotFound {
                region_id: "missing".into()
            })
        );
        assert!(matches!(
            place(&widget("n", 0), None, "open", 3, &config),
            Err(PlacementError::Rejected(
                PlacementRejection::ColumnOutOfRange { .. }
            ))
        ));
    }

    #[test]
    fn test_list_valid_targets() {
        let config = config();
        let targets = list_valid_targets(&widget("new", 0), &config);
        assert_eq!(
            targets,
            vec![
                Target {
                    region_id: "open".into(),
                    column_index: 0
                },
                Target {
                    region_id: "open".into(),
                    column_index: 2
                },
            ]
        );
    }
}

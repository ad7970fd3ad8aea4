//! Whole-widget operations: reorder, move, swap, remove, and region edits.

use std::collections::HashSet;

use rpt_model::{GridRegion, MAX_COLUMNS, ReportConfiguration};
use tracing::debug;

use crate::engine::{can_place, place};
use crate::error::{PlacementError, PlacementRejection, Result};

/// Reassign column indices of a region following `ordered_widget_ids`.
///
/// Listed widgets take columns `0..k` in the given order. Ids not in the
/// region are ignored. Widgets left out of the list follow, keeping their
/// current left-to-right order.
pub fn reorder_widgets_within_region(
    region_id: &str,
    ordered_widget_ids: &[String],
    config: &ReportConfiguration,
) -> Result<ReportConfiguration> {
    let mut next = config.clone();
    let region = next
        .region_mut(region_id)
        .ok_or_else(|| PlacementError::region(region_id))?;

    let mut remaining = std::mem::take(&mut region.widgets);
    remaining.sort_by_key(|w| w.column_index);

    let mut seen = HashSet::new();
    let mut ordered = Vec::with_capacity(remaining.len());
    for id in ordered_widget_ids {
        if !seen.insert(id.as_str()) {
            continue;
        }
        if let Some(pos) = remaining.iter().position(|w| &w.id == id) {
            ordered.push(remaining.remove(pos));
        }
    }
    ordered.extend(remaining);

    for (column_index, widget) in ordered.iter_mut().enumerate() {
        widget.column_index = column_index;
    }
    region.widgets = ordered;

    debug!(region_id, "reordered region widgets");
    next.touch();
    Ok(next)
}

/// Move a widget from one region to a cell of another (or the same) region.
///
/// Fails with the placement rejection when the target cell is not legal.
pub fn move_between_regions(
    widget_id: &str,
    source_region_id: &str,
    target_region_id: &str,
    target_column_index: usize,
    config: &ReportConfiguration,
) -> Result<ReportConfiguration> {
    let source = config
        .region(source_region_id)
        .ok_or_else(|| PlacementError::region(source_region_id))?;
    let widget = source
        .widget(widget_id)
        .ok_or_else(|| PlacementError::widget(widget_id))?;
    if config.region(target_region_id).is_none() {
        return Err(PlacementError::region(target_region_id));
    }

    can_place(widget, target_region_id, target_column_index, config)?;
    place(
        widget,
        Some(source_region_id),
        target_region_id,
        target_column_index,
        config,
    )
}

/// Exchange the cells of two widgets.
///
/// Within one region only the column indices swap; across regions each
/// widget takes the other's region and column.
pub fn swap(
    first_widget_id: &str,
    second_widget_id: &str,
    config: &ReportConfiguration,
) -> Result<ReportConfiguration> {
    let (first_region, first) = config
        .find_widget(first_widget_id)
        .ok_or_else(|| PlacementError::widget(first_widget_id))?;
    let (second_region, second) = config
        .find_widget(second_widget_id)
        .ok_or_else(|| PlacementError::widget(second_widget_id))?;

    let mut next = config.clone();
    if first_widget_id == second_widget_id {
        next.touch();
        return Ok(next);
    }

    let (first_region_id, first_column) = (first_region.id.clone(), first.column_index);
    let (second_region_id, second_column) = (second_region.id.clone(), second.column_index);

    if first_region_id == second_region_id {
        if let Some(region) = next.region_mut(&first_region_id) {
            for widget in &mut region.widgets {
                if widget.id == first_widget_id {
                    widget.column_index = second_column;
                } else if widget.id == second_widget_id {
                    widget.column_index = first_column;
                }
            }
            region.widgets.sort_by_key(|w| w.column_index);
        }
    } else {
        let mut moved_first = first.clone();
        moved_first.column_index = second_column;
        let mut moved_second = second.clone();
        moved_second.column_index = first_column;

        if let Some(region) = next.region_mut(&first_region_id) {
            region.widgets.retain(|w| w.id != first_widget_id);
            region.widgets.push(moved_second);
            region.widgets.sort_by_key(|w| w.column_index);
        }
        if let Some(region) = next.region_mut(&second_region_id) {
            region.widgets.retain(|w| w.id != second_widget_id);
            region.widgets.push(moved_first);
            region.widgets.sort_by_key(|w| w.column_index);
        }
    }

    debug!(first_widget_id, second_widget_id, "swapped widgets");
    next.touch();
    Ok(next)
}

/// Delete a widget from whichever region holds it.
///
/// Returns an unchanged copy when the widget does not exist.
pub fn remove(widget_id: &str, config: &ReportConfiguration) -> ReportConfiguration {
    let mut next = config.clone();
    let Some(region) = next.regions.iter_mut().find(|r| r.contains(widget_id)) else {
        return next;
    };
    region.widgets.retain(|w| w.id != widget_id);
    debug!(widget_id, "removed widget");
    next.touch();
    next
}

/// Append an empty region after the last one.
pub fn add_region(column_count: u8, config: &ReportConfiguration) -> Result<ReportConfiguration> {
    if column_count == 0 || column_count > MAX_COLUMNS {
        return Err(PlacementRejection::InvalidColumnCount {
            column_count,
            max: MAX_COLUMNS,
        }
        .into());
    }
    let mut next = config.clone();
    let region = GridRegion::new(column_count, next.next_region_order());
    debug!(region_id = %region.id, column_count, "added region");
    next.regions.push(region);
    next.touch();
    Ok(next)
}

/// Delete a region together with its widgets.
pub fn remove_region(region_id: &str, config: &ReportConfiguration) -> Result<ReportConfiguration> {
    if config.region(region_id).is_none() {
        return Err(PlacementError::region(region_id));
    }
    let mut next = config.clone();
    next.regions.retain(|r| r.id != region_id);
    next.touch();
    Ok(next)
}

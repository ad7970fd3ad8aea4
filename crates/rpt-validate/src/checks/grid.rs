//! Grid capacity checks for a single region.

use std::collections::HashMap;

use rpt_model::{GridRegion, MAX_COLUMNS};

use super::super::issue::Issue;

/// Column count, capacity, shared columns and column bounds.
pub fn check(region: &GridRegion) -> Vec<Issue> {
    let mut issues = Vec::new();

    if region.column_count == 0 || region.column_count > MAX_COLUMNS {
        issues.push(Issue::InvalidColumnCount {
            region_id: region.id.clone(),
            column_count: region.column_count,
        });
    }

    if region.widgets.len() > region.columns() {
        issues.push(Issue::RegionOverCapacity {
            region_id: region.id.clone(),
            widget_count: region.widgets.len(),
            column_count: region.column_count,
        });
    }

    let mut occupants: HashMap<usize, &str> = HashMap::new();
    for widget in &region.widgets {
        if widget.column_index >= region.columns() {
            issues.push(Issue::ColumnOutOfRange {
                region_id: region.id.clone(),
                widget_id: widget.id.clone(),
                column_index: widget.column_index,
                column_count: region.column_count,
            });
        }
        match occupants.get(&widget.column_index) {
            Some(first) => issues.push(Issue::ColumnConflict {
                region_id: region.id.clone(),
                column_index: widget.column_index,
                first_widget_id: (*first).to_string(),
                second_widget_id: widget.id.clone(),
            }),
            None => {
                occupants.insert(widget.column_index, &widget.id);
            }
        }
    }

    issues
}

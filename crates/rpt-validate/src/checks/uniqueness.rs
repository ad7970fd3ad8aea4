//! Uniqueness of region ids, region orders and widget ids.

use std::collections::HashSet;

use rpt_model::ReportConfiguration;

use super::super::issue::Issue;

/// Report each duplicated value once, at its second occurrence.
pub fn check(config: &ReportConfiguration) -> Vec<Issue> {
    let mut issues = Vec::new();

    let mut region_ids = HashSet::new();
    let mut reported_regions = HashSet::new();
    let mut orders = HashSet::new();
    let mut reported_orders = HashSet::new();
    for region in &config.regions {
        if !region_ids.insert(region.id.as_str()) && reported_regions.insert(region.id.as_str()) {
            issues.push(Issue::DuplicateRegionId {
                region_id: region.id.clone(),
            });
        }
        if !orders.insert(region.order) && reported_orders.insert(region.order) {
            issues.push(Issue::DuplicateRegionOrder {
                order: region.order,
            });
        }
    }

    let mut widget_ids = HashSet::new();
    let mut reported_widgets = HashSet::new();
    for widget in config.widgets() {
        if !widget_ids.insert(widget.id.as_str()) && reported_widgets.insert(widget.id.as_str()) {
            issues.push(Issue::DuplicateWidgetId {
                widget_id: widget.id.clone(),
            });
        }
    }

    issues
}

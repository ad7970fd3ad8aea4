//! Individual validation checks.
//!
//! Each check returns its issues independently; nothing short-circuits, so a
//! single pass reports every problem in the configuration.

pub mod compatibility;
pub mod grid;
pub mod identity;
pub mod uniqueness;
pub mod widget;

use rpt_model::{DataSource, GridRegion, ReportConfiguration};

use crate::issue::Issue;

/// Run every check against a configuration, in a fixed order.
pub fn run_all(config: &ReportConfiguration, known: &[DataSource]) -> Vec<Issue> {
    let mut issues = Vec::new();
    issues.extend(identity::check(config));
    issues.extend(identity::check_has_widgets(config));
    issues.extend(uniqueness::check(config));
    for region in &config.regions {
        issues.extend(run_region(region, known));
    }
    issues
}

/// Checks scoped to one region and its widgets.
pub fn run_region(region: &GridRegion, known: &[DataSource]) -> Vec<Issue> {
    let mut issues = grid::check(region);
    for widget in &region.widgets {
        issues.extend(widget::check(widget));
        issues.extend(compatibility::check(widget, known));
    }
    issues
}

//! Identity and content checks.

use rpt_model::ReportConfiguration;

use super::super::issue::Issue;

/// Configuration id and name must be present.
pub fn check(config: &ReportConfiguration) -> Vec<Issue> {
    let mut issues = Vec::new();
    if config.id.trim().is_empty() {
        issues.push(Issue::MissingId);
    }
    if config.name.trim().is_empty() {
        issues.push(Issue::MissingName);
    }
    issues
}

/// At least one widget must exist across all regions.
pub fn check_has_widgets(config: &ReportConfiguration) -> Option<Issue> {
    (config.widget_count() == 0).then_some(Issue::NoWidgets)
}

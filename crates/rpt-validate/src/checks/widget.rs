//! Widget completeness checks.

use rpt_model::ChartWidget;
use rpt_model::widget::{MAX_HEIGHT, MIN_HEIGHT};

use super::super::issue::Issue;

/// Title, height range, palette and data source id.
pub fn check(widget: &ChartWidget) -> Vec<Issue> {
    let mut issues = Vec::new();
    let presentation = &widget.presentation;

    if presentation.title.trim().is_empty() {
        issues.push(Issue::MissingTitle {
            widget_id: widget.id.clone(),
        });
    }
    if !(MIN_HEIGHT..=MAX_HEIGHT).contains(&presentation.height) {
        issues.push(Issue::HeightOutOfRange {
            widget_id: widget.id.clone(),
            height: presentation.height,
            min: MIN_HEIGHT,
            max: MAX_HEIGHT,
        });
    }
    if presentation.colors.is_empty() {
        issues.push(Issue::MissingColors {
            widget_id: widget.id.clone(),
        });
    }
    if widget.data_source.id.trim().is_empty() {
        issues.push(Issue::MissingDataSource {
            widget_id: widget.id.clone(),
        });
    }

    issues
}

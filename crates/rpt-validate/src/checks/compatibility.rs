//! Chart type / data source compatibility checks.

use rpt_model::{ChartType, ChartWidget, DataSource, FieldRole};
use tracing::debug;

use super::super::issue::Issue;
use super::super::rules;

/// Check that the widget's chart type can be fed by its data source.
///
/// When the data source id appears in `known`, the catalog entry is used
/// instead of the copy embedded in the widget. Widgets without a data source
/// id are left to the completeness check.
pub fn check(widget: &ChartWidget, known: &[DataSource]) -> Vec<Issue> {
    let mut issues = Vec::new();

    if let ChartType::Unknown(name) = &widget.chart_type {
        issues.push(Issue::UnknownChartType {
            widget_id: widget.id.clone(),
            chart_type: name.clone(),
        });
        return issues;
    }

    let embedded = &widget.data_source;
    if embedded.id.trim().is_empty() {
        return issues;
    }

    let source = match known.iter().find(|s| s.id == embedded.id) {
        Some(entry) => entry,
        None => {
            if !known.is_empty() {
                issues.push(Issue::UnknownDataSource {
                    widget_id: widget.id.clone(),
                    data_source_id: embedded.id.clone(),
                });
            }
            embedded
        }
    };

    if !rules::is_compatible(&widget.chart_type, source) {
        debug!(
            widget_id = %widget.id,
            chart_type = %widget.chart_type,
            data_source = %source.id,
            "chart type not compatible with data source"
        );
        issues.push(Issue::IncompatibleDataSource {
            widget_id: widget.id.clone(),
            chart_type: widget.chart_type.to_string(),
            data_source_id: source.id.clone(),
            data_source_name: source.name.clone(),
            requirement: rules::requirement_text(&widget.chart_type).unwrap_or_default(),
        });
    } else if widget.chart_type == ChartType::ComparisonWithBudget
        && source.field_with_role(FieldRole::BudgetMetric).is_none()
    {
        issues.push(Issue::BudgetFieldUntagged {
            widget_id: widget.id.clone(),
            data_source_id: source.id.clone(),
        });
    }

    issues
}

//! Validation issue types.
//!
//! The Issue enum provides type-safe validation issue creation where
//! each variant carries only its needed data.

use serde::{Deserialize, Serialize};

use super::rules::Category;

/// Issue severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks persistence
    Error,
    /// Informational only
    Warning,
}

impl Severity {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
        }
    }
}

/// Validation issue - each variant carries only its needed data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "camelCase")]
pub enum Issue {
    // Identity
    /// Configuration has an empty id
    MissingId,
    /// Configuration has an empty or blank name
    MissingName,

    // Content
    /// No region holds any widget
    NoWidgets,

    // Uniqueness
    /// Two regions share an id
    DuplicateRegionId { region_id: String },
    /// Two regions share an order value
    DuplicateRegionOrder { order: i32 },
    /// Two widgets share an id (anywhere in the configuration)
    DuplicateWidgetId { widget_id: String },

    // Grid capacity
    /// Region column count outside 1..=3
    InvalidColumnCount { region_id: String, column_count: u8 },
    /// Region holds more widgets than columns
    RegionOverCapacity {
        region_id: String,
        widget_count: usize,
        column_count: u8,
    },
    /// Two widgets of a region share a column
    ColumnConflict {
        region_id: String,
        column_index: usize,
        first_widget_id: String,
        second_widget_id: String,
    },
    /// Widget column index is outside its region
    ColumnOutOfRange {
        region_id: String,
        widget_id: String,
        column_index: usize,
        column_count: u8,
    },

    // Widget completeness
    /// Widget title is empty
    MissingTitle { widget_id: String },
    /// Widget height outside the allowed range
    HeightOutOfRange {
        widget_id: String,
        height: u32,
        min: u32,
        max: u32,
    },
    /// Widget has no colors
    MissingColors { widget_id: String },
    /// Widget data source has an empty id
    MissingDataSource { widget_id: String },

    // Data compatibility
    /// Chart type cannot be fed by the data source's required fields
    IncompatibleDataSource {
        widget_id: String,
        chart_type: String,
        data_source_id: String,
        data_source_name: String,
        requirement: String,
    },
    /// Chart type outside the known enumeration
    UnknownChartType { widget_id: String, chart_type: String },
    /// Data source id not present in the known catalog
    UnknownDataSource {
        widget_id: String,
        data_source_id: String,
    },
    /// Budget comparison without a field tagged as the budget
    BudgetFieldUntagged {
        widget_id: String,
        data_source_id: String,
    },
}

impl Issue {
    /// Widget this issue is about, if any.
    pub fn widget_id(&self) -> Option<&str> {
        match self {
            Issue::DuplicateWidgetId { widget_id }
            | Issue::ColumnOutOfRange { widget_id, .. }
            | Issue::MissingTitle { widget_id }
            | Issue::HeightOutOfRange { widget_id, .. }
            | Issue::MissingColors { widget_id }
            | Issue::MissingDataSource { widget_id }
            | Issue::IncompatibleDataSource { widget_id, .. }
            | Issue::UnknownChartType { widget_id, .. }
            | Issue::UnknownDataSource { widget_id, .. }
            | Issue::BudgetFieldUntagged { widget_id, .. } => Some(widget_id),
            Issue::ColumnConflict {
                second_widget_id, ..
            } => Some(second_widget_id),
            _ => None,
        }
    }

    /// Region this issue is about, if any.
    pub fn region_id(&self) -> Option<&str> {
        match self {
            Issue::DuplicateRegionId { region_id }
            | Issue::InvalidColumnCount { region_id, .. }
            | Issue::RegionOverCapacity { region_id, .. }
            | Issue::ColumnConflict { region_id, .. }
            | Issue::ColumnOutOfRange { region_id, .. } => Some(region_id),
            _ => None,
        }
    }

    /// Category for this issue type.
    pub fn category(&self) -> Category {
        match self {
            Issue::MissingId
            | Issue::MissingName
            | Issue::NoWidgets
            | Issue::DuplicateRegionId { .. }
            | Issue::DuplicateRegionOrder { .. }
            | Issue::DuplicateWidgetId { .. } => Category::Structure,
            Issue::InvalidColumnCount { .. }
            | Issue::RegionOverCapacity { .. }
            | Issue::ColumnConflict { .. }
            | Issue::ColumnOutOfRange { .. } => Category::Placement,
            Issue::MissingTitle { .. }
            | Issue::HeightOutOfRange { .. }
            | Issue::MissingColors { .. }
            | Issue::MissingDataSource { .. } => Category::Widget,
            Issue::IncompatibleDataSource { .. }
            | Issue::UnknownChartType { .. }
            | Issue::UnknownDataSource { .. }
            | Issue::BudgetFieldUntagged { .. } => Category::DataCompatibility,
        }
    }

    /// Severity for this issue type.
    pub fn severity(&self) -> Severity {
        match self {
            Issue::UnknownDataSource { .. } | Issue::BudgetFieldUntagged { .. } => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }

    /// Format message with issue-specific data.
    pub fn message(&self) -> String {
        match self {
            Issue::MissingId => "Configuration id is required".to_string(),
            Issue::MissingName => "Configuration name is required".to_string(),
            Issue::NoWidgets => "Configuration must contain at least one widget".to_string(),

            Issue::DuplicateRegionId { region_id } => {
                format!("Region id '{}' is used more than once", region_id)
            }
            Issue::DuplicateRegionOrder { order } => {
                format!("Region order {} is used more than once", order)
            }
            Issue::DuplicateWidgetId { widget_id } => {
                format!("Widget id '{}' is used more than once", widget_id)
            }

            Issue::InvalidColumnCount {
                region_id,
                column_count,
            } => {
                format!(
                    "Region '{}' has {} columns; regions must have 1 to 3 columns",
                    region_id, column_count
                )
            }
            Issue::RegionOverCapacity {
                region_id,
                widget_count,
                column_count,
            } => {
                format!(
                    "Region '{}' holds {} widgets but has only {} columns",
                    region_id, widget_count, column_count
                )
            }
            Issue::ColumnConflict {
                region_id,
                column_index,
                first_widget_id,
                second_widget_id,
            } => {
                format!(
                    "Widgets '{}' and '{}' both occupy column {} of region '{}'",
                    first_widget_id, second_widget_id, column_index, region_id
                )
            }
            Issue::ColumnOutOfRange {
                region_id,
                widget_id,
                column_index,
                column_count,
            } => {
                format!(
                    "Widget '{}' is at column {} but region '{}' has {} columns",
                    widget_id, column_index, region_id, column_count
                )
            }

            Issue::MissingTitle { widget_id } => {
                format!("Widget '{}' needs a title", widget_id)
            }
            Issue::HeightOutOfRange {
                widget_id,
                height,
                min,
                max,
            } => {
                format!(
                    "Widget '{}' height {}px is outside {}-{}px",
                    widget_id, height, min, max
                )
            }
            Issue::MissingColors { widget_id } => {
                format!("Widget '{}' needs at least one color", widget_id)
            }
            Issue::MissingDataSource { widget_id } => {
                format!("Widget '{}' has no data source", widget_id)
            }

            Issue::IncompatibleDataSource {
                widget_id,
                chart_type,
                data_source_name,
                requirement,
                ..
            } => {
                format!(
                    "Chart type {} of widget '{}' is not compatible with data source '{}': requires {}",
                    chart_type, widget_id, data_source_name, requirement
                )
            }
            Issue::UnknownChartType {
                widget_id,
                chart_type,
            } => {
                format!(
                    "Widget '{}' uses unknown chart type '{}'",
                    widget_id, chart_type
                )
            }
            Issue::UnknownDataSource {
                widget_id,
                data_source_id,
            } => {
                format!(
                    "Widget '{}' uses data source '{}' which is not in the catalog",
                    widget_id, data_source_id
                )
            }
            Issue::BudgetFieldUntagged {
                widget_id,
                data_source_id,
            } => {
                format!(
                    "Widget '{}' compares against a budget but data source '{}' has no budget field",
                    widget_id, data_source_id
                )
            }
        }
    }
}

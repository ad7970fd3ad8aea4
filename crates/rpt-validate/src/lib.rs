//! Report configuration validation.
//!
//! This crate checks a [`ReportConfiguration`] before it is persisted:
//!
//! - **Identity**: id and name are present
//! - **Content**: at least one widget exists
//! - **Uniqueness**: region ids, region orders and widget ids
//! - **Grid capacity**: column counts, occupancy and column bounds
//! - **Widget completeness**: title, height, colors, data source
//! - **Data compatibility**: chart type against the data source's required fields
//!
//! Validation never fails. Malformed input becomes issues in the report, and
//! running it twice on the same input gives the same report.
//!
//! # Example
//!
//! ```ignore
//! use rpt_validate::validate;
//!
//! let report = validate(&config, &catalog);
//! for issue in report.issues() {
//!     println!("[{}] {}: {}", issue.severity().label(), issue.category(), issue.message());
//! }
//! ```

mod checks;
mod issue;
mod report;
pub mod rules;

use rpt_model::{ChartWidget, DataSource, GridRegion, ReportConfiguration};

pub use issue::{Issue, Severity};
pub use report::ValidationReport;
pub use rules::{Category, compatible_chart_types, is_compatible};

/// Validate a whole configuration.
///
/// `known_data_sources` is the data source catalog. It may be empty, in which
/// case each widget's embedded data source is used as is.
pub fn validate(
    config: &ReportConfiguration,
    known_data_sources: &[DataSource],
) -> ValidationReport {
    let mut report = ValidationReport::new();
    report.extend(checks::run_all(config, known_data_sources));
    tracing::debug!(
        config_id = %config.id,
        errors = report.error_count(),
        warnings = report.warning_count(),
        "validated configuration"
    );
    report
}

/// Validate one region and the widgets it holds.
pub fn validate_region(region: &GridRegion, known_data_sources: &[DataSource]) -> ValidationReport {
    let mut report = ValidationReport::new();
    report.extend(checks::run_region(region, known_data_sources));
    report
}

/// Validate one widget on its own (completeness and compatibility).
pub fn validate_widget(widget: &ChartWidget, known_data_sources: &[DataSource]) -> ValidationReport {
    let mut report = ValidationReport::new();
    report.extend(checks::widget::check(widget));
    report.extend(checks::compatibility::check(widget, known_data_sources));
    report
}

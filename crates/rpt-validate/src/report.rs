//! Validation report: errors and warnings for one configuration.

use serde::{Deserialize, Serialize};

use crate::issue::{Issue, Severity};
use crate::rules::Category;

/// Outcome of validating a configuration.
///
/// A configuration is valid iff `errors` is empty. Warnings never block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
}

impl ValidationReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an issue, routed by its severity.
    pub fn add(&mut self, issue: Issue) {
        match issue.severity() {
            Severity::Error => self.errors.push(issue),
            Severity::Warning => self.warnings.push(issue),
        }
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = Issue>) {
        for issue in issues {
            self.add(issue);
        }
    }

    /// Merge another report into this one, keeping order.
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Check if the report has any issues at all.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// All issues, errors first.
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.errors.iter().chain(self.warnings.iter())
    }

    /// Issues about a single widget.
    pub fn issues_for_widget<'a>(&'a self, widget_id: &'a str) -> impl Iterator<Item = &'a Issue> {
        self.issues()
            .filter(move |issue| issue.widget_id() == Some(widget_id))
    }

    /// Issues in a category.
    pub fn issues_in(&self, category: Category) -> impl Iterator<Item = &Issue> {
        self.issues().filter(move |issue| issue.category() == category)
    }

    /// Error messages joined with "; ", used when a save is refused.
    pub fn error_message(&self) -> String {
        self.errors
            .iter()
            .map(Issue::message)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

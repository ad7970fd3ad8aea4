//! Grid regions.

use serde::{Deserialize, Serialize};

use crate::widget::ChartWidget;

/// Largest column count a region may have.
pub const MAX_COLUMNS: u8 = 3;

/// A horizontal band of the report grid with equal-width columns.
///
/// `order` positions the region within its configuration; it is persisted
/// explicitly so regions can be reordered independently of storage order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRegion {
    pub id: String,
    pub column_count: u8,
    pub order: i32,
    #[serde(default)]
    pub widgets: Vec<ChartWidget>,
}

impl GridRegion {
    /// Create an empty region with a generated id.
    pub fn new(column_count: u8, order: i32) -> Self {
        Self {
            id: crate::new_id(),
            column_count,
            order,
            widgets: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn with_widget(mut self, widget: ChartWidget) -> Self {
        self.widgets.push(widget);
        self
    }

    pub fn columns(&self) -> usize {
        usize::from(self.column_count)
    }

    /// Widget occupying the given column, if any.
    pub fn widget_at(&self, column_index: usize) -> Option<&ChartWidget> {
        self.widgets.iter().find(|w| w.column_index == column_index)
    }

    pub fn widget(&self, widget_id: &str) -> Option<&ChartWidget> {
        self.widgets.iter().find(|w| w.id == widget_id)
    }

    pub fn contains(&self, widget_id: &str) -> bool {
        self.widget(widget_id).is_some()
    }

    /// Whether every column holds a widget.
    pub fn is_full(&self) -> bool {
        self.widgets.len() >= self.columns()
    }

    /// Columns with no widget, in ascending order.
    pub fn free_columns(&self) -> Vec<usize> {
        (0..self.columns())
            .filter(|c| self.widget_at(*c).is_none())
            .collect()
    }
}

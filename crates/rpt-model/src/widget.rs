//! Chart widgets and their presentation settings.

use serde::{Deserialize, Serialize};

use crate::chart::ChartType;
use crate::data_source::DataSource;

/// Smallest allowed widget height in pixels.
pub const MIN_HEIGHT: u32 = 200;
/// Largest allowed widget height in pixels.
pub const MAX_HEIGHT: u32 = 800;
/// Height given to new widgets.
pub const DEFAULT_HEIGHT: u32 = 320;

/// Palette given to new widgets.
pub const DEFAULT_COLORS: &[&str] = &["#2563eb", "#16a34a", "#f59e0b", "#dc2626", "#7c3aed"];

/// How a widget is drawn. Values are only checked by validation; any value
/// can be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub height: u32,
    pub colors: Vec<String>,
    pub show_legend: bool,
    pub show_tooltip: bool,
}

impl Presentation {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            height: DEFAULT_HEIGHT,
            colors: DEFAULT_COLORS.iter().map(|c| (*c).to_string()).collect(),
            show_legend: true,
            show_tooltip: true,
        }
    }
}

/// One chart placed at a column of a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartWidget {
    pub id: String,
    pub chart_type: ChartType,
    pub column_index: usize,
    pub presentation: Presentation,
    pub data_source: DataSource,
}

impl ChartWidget {
    /// Create a widget with a generated id, titled after its chart type.
    pub fn new(chart_type: ChartType, column_index: usize, data_source: DataSource) -> Self {
        let presentation = Presentation::new(chart_type.label());
        Self {
            id: crate::new_id(),
            chart_type,
            column_index,
            presentation,
            data_source,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.presentation.title = title.into();
        self
    }

    /// Copy of this widget under a new id (the palette "copy" action).
    pub fn duplicate(&self) -> Self {
        Self {
            id: crate::new_id(),
            ..self.clone()
        }
    }
}

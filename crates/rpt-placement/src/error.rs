//! Error types for placement operations.

use thiserror::Error;

/// Why a widget cannot go to a given cell.
///
/// Display strings are stable and shown to users as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementRejection {
    #[error("Column {column_index} is out of range for a region with {column_count} columns")]
    ColumnOutOfRange {
        column_index: usize,
        column_count: u8,
    },

    #[error("Widget is already at this position")]
    AlreadyAtPosition,

    #[error("Column {column_index} is already occupied by another widget")]
    ColumnOccupied { column_index: usize },

    #[error("Region is at capacity ({column_count} columns)")]
    RegionFull { column_count: u8 },

    #[error("Region {region_id} not found")]
    RegionMissing { region_id: String },

    #[error("Regions must have 1 to {max} columns, got {column_count}")]
    InvalidColumnCount { column_count: u8, max: u8 },
}

/// Error returned by placement operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("Region {region_id} not found")]
    RegionNotFound { region_id: String },

    #[error("Widget {widget_id} not found")]
    WidgetNotFound { widget_id: String },

    #[error("{0}")]
    Rejected(#[from] PlacementRejection),
}

impl PlacementError {
    pub(crate) fn region(region_id: &str) -> Self {
        Self::RegionNotFound {
            region_id: region_id.to_string(),
        }
    }

    pub(crate) fn widget(widget_id: &str) -> Self {
        Self::WidgetNotFound {
            widget_id: widget_id.to_string(),
        }
    }

    /// Rejection reason, if the operation was refused by the placement rules.
    pub fn rejection(&self) -> Option<&PlacementRejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}

/// Result type alias for placement operations.
pub type Result<T> = std::result::Result<T, PlacementError>;

//! Placement commands as values.

use rpt_model::{ChartWidget, ReportConfiguration};
use serde::{Deserialize, Serialize};

use crate::engine::try_place;
use crate::error::Result;
use crate::ops;

/// One editing command against a configuration.
///
/// `Place` goes through [`try_place`], so drops onto occupied or full cells
/// are rejected instead of overwriting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum PlacementOp {
    Place {
        widget: Box<ChartWidget>,
        source_region_id: Option<String>,
        target_region_id: String,
        column_index: usize,
    },
    Move {
        widget_id: String,
        source_region_id: String,
        target_region_id: String,
        column_index: usize,
    },
    Reorder {
        region_id: String,
        widget_ids: Vec<String>,
    },
    Swap {
        first_widget_id: String,
        second_widget_id: String,
    },
    Remove {
        widget_id: String,
    },
    AddRegion {
        column_count: u8,
    },
    RemoveRegion {
        region_id: String,
    },
}

impl PlacementOp {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Place { .. } => "place",
            Self::Move { .. } => "move",
            Self::Reorder { .. } => "reorder",
            Self::Swap { .. } => "swap",
            Self::Remove { .. } => "remove",
            Self::AddRegion { .. } => "add-region",
            Self::RemoveRegion { .. } => "remove-region",
        }
    }

    /// Apply the command, returning the new configuration.
    pub fn apply(&self, config: &ReportConfiguration) -> Result<ReportConfiguration> {
        match self {
            Self::Place {
                widget,
                source_region_id,
                target_region_id,
                column_index,
            } => try_place(
                widget,
                source_region_id.as_deref(),
                target_region_id,
                *column_index,
                config,
            ),
            Self::Move {
                widget_id,
                source_region_id,
                target_region_id,
                column_index,
            } => ops::move_between_regions(
                widget_id,
                source_region_id,
                target_region_id,
                *column_index,
                config,
            ),
            Self::Reorder {
                region_id,
                widget_ids,
            } => ops::reorder_widgets_within_region(region_id, widget_ids, config),
            Self::Swap {
                first_widget_id,
                second_widget_id,
            } => ops::swap(first_widget_id, second_widget_id, config),
            Self::Remove { widget_id } => Ok(ops::remove(widget_id, config)),
            Self::AddRegion { column_count } => ops::add_region(*column_count, config),
            Self::RemoveRegion { region_id } => ops::remove_region(region_id, config),
        }
    }
}

//! Root report configuration aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::region::GridRegion;
use crate::scope::Scope;
use crate::widget::ChartWidget;

/// A composed report: named, scoped, made of ordered grid regions.
///
/// Invariants (checked by validation, not enforced by construction):
/// region ids are unique, widget ids are unique across all regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportConfiguration {
    pub id: String,
    pub name: String,
    pub owner_scope: Scope,
    #[serde(default)]
    pub regions: Vec<GridRegion>,
    #[serde(with = "crate::tagged_date")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::tagged_date")]
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

impl ReportConfiguration {
    /// Create an empty, active configuration with a generated id.
    pub fn new(name: impl Into<String>, owner_scope: Scope) -> Self {
        let now = crate::clock::now();
        Self {
            id: crate::new_id(),
            name: name.into(),
            owner_scope,
            regions: Vec::new(),
            created_at: now,
            updated_at: now,
            is_active: true,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn with_region(mut self, region: GridRegion) -> Self {
        self.regions.push(region);
        self
    }

    /// Refresh `updated_at`.
    pub fn touch(&mut self) {
        self.updated_at = crate::clock::now();
    }

    pub fn region(&self, region_id: &str) -> Option<&GridRegion> {
        self.regions.iter().find(|r| r.id == region_id)
    }

    pub fn region_mut(&mut self, region_id: &str) -> Option<&mut GridRegion> {
        self.regions.iter_mut().find(|r| r.id == region_id)
    }

    /// Locate a widget and the region holding it.
    pub fn find_widget(&self, widget_id: &str) -> Option<(&GridRegion, &ChartWidget)> {
        self.regions
            .iter()
            .find_map(|r| r.widget(widget_id).map(|w| (r, w)))
    }

    /// Regions sorted by their `order` field.
    pub fn regions_in_order(&self) -> Vec<&GridRegion> {
        let mut regions: Vec<&GridRegion> = self.regions.iter().collect();
        regions.sort_by_key(|r| r.order);
        regions
    }

    /// Total widget count across all regions.
    pub fn widget_count(&self) -> usize {
        self.regions.iter().map(|r| r.widgets.len()).sum()
    }

    pub fn widgets(&self) -> impl Iterator<Item = &ChartWidget> {
        self.regions.iter().flat_map(|r| r.widgets.iter())
    }

    /// Next free region order value.
    pub fn next_region_order(&self) -> i32 {
        self.regions.iter().map(|r| r.order + 1).max().unwrap_or(0)
    }
}

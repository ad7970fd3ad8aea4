//! Issue categories.

use serde::{Deserialize, Serialize};

/// Validation rule category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Structure,
    Placement,
    Widget,
    DataCompatibility,
}

impl Category {
    /// Get all validation categories.
    pub const fn all() -> &'static [Self] {
        &[
            Self::Structure,
            Self::Placement,
            Self::Widget,
            Self::DataCompatibility,
        ]
    }

    /// Parse category from its label.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "structure" => Some(Self::Structure),
            "placement" => Some(Self::Placement),
            "widget" => Some(Self::Widget),
            "data-compatibility" | "data compatibility" => Some(Self::DataCompatibility),
            _ => None,
        }
    }

    /// Stable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Structure => "structure",
            Self::Placement => "placement",
            Self::Widget => "widget",
            Self::DataCompatibility => "data-compatibility",
        }
    }

    /// Description for UI.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Structure => "Identity, content and uniqueness checks",
            Self::Placement => "Grid capacity and column checks",
            Self::Widget => "Widget presentation completeness",
            Self::DataCompatibility => "Chart type and data source compatibility",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_labels() {
        for category in Category::all() {
            assert_eq!(Category::parse(category.label()), Some(*category));
        }
        assert_eq!(Category::parse("nope"), None);
    }
}

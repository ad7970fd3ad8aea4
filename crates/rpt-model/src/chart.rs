//! Chart type enumeration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of chart a widget renders.
///
/// Serialized as its kebab-case name. Names that are not part of the fixed
/// enumeration are kept verbatim in [`ChartType::Unknown`] so that a stored
/// configuration with an unrecognized chart type still loads and is reported
/// by validation instead of failing to deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChartType {
    /// Parts of a whole (fractions summing to one).
    MixOfParts,
    /// A metric over time.
    TrendOverTime,
    /// Actual values against a budget.
    ComparisonWithBudget,
    /// Several numeric series on a shared axis.
    MultiSeries,
    GenericBar,
    GenericLine,
    GenericPie,
    /// Any name outside the fixed enumeration.
    Unknown(String),
}

const KNOWN: &[ChartType] = &[
    ChartType::MixOfParts,
    ChartType::TrendOverTime,
    ChartType::ComparisonWithBudget,
    ChartType::MultiSeries,
    ChartType::GenericBar,
    ChartType::GenericLine,
    ChartType::GenericPie,
];

impl ChartType {
    /// Every known chart type, in palette order.
    pub const fn all() -> &'static [Self] {
        KNOWN
    }

    /// Stable serialized name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::MixOfParts => "mix-of-parts",
            Self::TrendOverTime => "trend-over-time",
            Self::ComparisonWithBudget => "comparison-with-budget",
            Self::MultiSeries => "multi-series",
            Self::GenericBar => "generic-bar",
            Self::GenericLine => "generic-line",
            Self::GenericPie => "generic-pie",
            Self::Unknown(name) => name,
        }
    }

    /// Parse a serialized name. Never fails; unknown names are preserved.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "mix-of-parts" => Self::MixOfParts,
            "trend-over-time" => Self::TrendOverTime,
            "comparison-with-budget" => Self::ComparisonWithBudget,
            "multi-series" => Self::MultiSeries,
            "generic-bar" => Self::GenericBar,
            "generic-line" => Self::GenericLine,
            "generic-pie" => Self::GenericPie,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &str {
        match self {
            Self::MixOfParts => "Mix of parts",
            Self::TrendOverTime => "Trend over time",
            Self::ComparisonWithBudget => "Comparison with budget",
            Self::MultiSeries => "Multi-series",
            Self::GenericBar => "Bar chart",
            Self::GenericLine => "Line chart",
            Self::GenericPie => "Pie chart",
            Self::Unknown(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<String> for ChartType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ChartType> for String {
    fn from(value: ChartType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

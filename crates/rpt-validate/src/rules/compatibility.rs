//! Which chart types a data source can feed.
//!
//! Each chart type maps to a list of clauses; every clause demands a minimum
//! number of *required* fields whose kind is one of a set. Optional fields
//! never count, since a row may omit them.

use rpt_model::{ChartType, DataSource, FieldKind};

/// At least `min` required fields of any of `kinds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindRequirement {
    pub kinds: &'static [FieldKind],
    pub min: usize,
}

impl KindRequirement {
    const fn new(kinds: &'static [FieldKind], min: usize) -> Self {
        Self { kinds, min }
    }

    pub fn is_met_by(&self, source: &DataSource) -> bool {
        source.count_required(self.kinds) >= self.min
    }

    /// e.g. "at least 1 text or date field".
    pub fn describe(&self) -> String {
        let kinds: Vec<&str> = self.kinds.iter().map(FieldKind::label).collect();
        let noun = if self.min == 1 { "field" } else { "fields" };
        format!("at least {} {} {}", self.min, kinds.join(" or "), noun)
    }
}

const FRACTIONS: &[FieldKind] = &[FieldKind::Fraction];
const TEXT: &[FieldKind] = &[FieldKind::Text];
const NUMBER: &[FieldKind] = &[FieldKind::Number];
const TEXT_OR_DATE: &[FieldKind] = &[FieldKind::Text, FieldKind::Date];
const NUMBER_OR_FRACTION: &[FieldKind] = &[FieldKind::Number, FieldKind::Fraction];

const MIX_OF_PARTS: &[KindRequirement] = &[KindRequirement::new(FRACTIONS, 2)];
const OVER_TIME: &[KindRequirement] = &[
    KindRequirement::new(TEXT_OR_DATE, 1),
    KindRequirement::new(NUMBER, 1),
];
const CATEGORY_BARS: &[KindRequirement] = &[
    KindRequirement::new(TEXT, 1),
    KindRequirement::new(NUMBER, 1),
];
const PIE: &[KindRequirement] = &[
    KindRequirement::new(TEXT, 1),
    KindRequirement::new(NUMBER_OR_FRACTION, 1),
];
const MULTI_SERIES: &[KindRequirement] = &[KindRequirement::new(NUMBER, 2)];

/// Requirement clauses for a chart type; `None` for unknown chart types.
pub fn requirement_for(chart_type: &ChartType) -> Option<&'static [KindRequirement]> {
    match chart_type {
        ChartType::MixOfParts => Some(MIX_OF_PARTS),
        ChartType::TrendOverTime | ChartType::GenericLine => Some(OVER_TIME),
        ChartType::ComparisonWithBudget | ChartType::GenericBar => Some(CATEGORY_BARS),
        ChartType::GenericPie => Some(PIE),
        ChartType::MultiSeries => Some(MULTI_SERIES),
        ChartType::Unknown(_) => None,
    }
}

/// Human-readable requirement for a chart type, clauses joined with "and".
pub fn requirement_text(chart_type: &ChartType) -> Option<String> {
    requirement_for(chart_type).map(|clauses| {
        clauses
            .iter()
            .map(KindRequirement::describe)
            .collect::<Vec<_>>()
            .join(" and ")
    })
}

/// Whether `source` can feed `chart_type`. Unknown chart types are never compatible.
pub fn is_compatible(chart_type: &ChartType, source: &DataSource) -> bool {
    requirement_for(chart_type)
        .is_some_and(|clauses| clauses.iter().all(|clause| clause.is_met_by(source)))
}

/// Known chart types the data source can feed, in palette order.
pub fn compatible_chart_types(source: &DataSource) -> Vec<ChartType> {
    ChartType::all()
        .iter()
        .filter(|chart_type| is_compatible(chart_type, source))
        .cloned()
        .collect()
}

//! Data sources that feed chart widgets.
//!
//! A data source describes its fields (name, value kind, whether the field is
//! always present) and carries a handful of loosely typed sample rows used for
//! previews. Which chart types a source can feed is derived from its fields by
//! the validation rules; it is never stored.
//!
//! # Field roles
//!
//! Fields may be tagged with a [`FieldRole`] when the data source is authored
//! ("this field is the budget", "this field is the category axis"). Consumers
//! look fields up by role through [`DataSource::field_with_role`] rather than
//! by inspecting field ids.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One loosely typed preview record.
pub type SampleRow = BTreeMap<String, serde_json::Value>;

/// Value kind of a data source field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Number,
    Text,
    Date,
    /// A share of a whole, in `[0, 1]`.
    Fraction,
}

impl FieldKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Text => "text",
            Self::Date => "date",
            Self::Fraction => "fraction",
        }
    }
}

/// Semantic role of a field, assigned when the data source is authored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldRole {
    /// The main measured value.
    PrimaryMetric,
    /// The planned/budgeted value compared against the primary metric.
    BudgetMetric,
    /// Labels along the category axis.
    Category,
    /// Periods along the time axis.
    TimeAxis,
}

/// Business category of a data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataCategory {
    Revenue,
    Expenses,
    Budget,
    CashFlow,
    Balance,
    #[default]
    Custom,
}

/// A single field of a data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataField {
    pub id: String,
    pub name: String,
    pub value_kind: FieldKind,
    /// Whether every row carries this field. Only required fields count
    /// towards chart compatibility.
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<FieldRole>,
}

impl DataField {
    /// A required field without a role.
    pub fn new(id: impl Into<String>, name: impl Into<String>, value_kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value_kind,
            required: true,
            role: None,
        }
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: FieldRole) -> Self {
        self.role = Some(role);
        self
    }
}

/// Fields and preview rows a chart draws from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: DataCategory,
    #[serde(default)]
    pub fields: Vec<DataField>,
    #[serde(default)]
    pub sample_rows: Vec<SampleRow>,
}

impl DataSource {
    /// Create a data source with no fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: DataCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            fields: Vec::new(),
            sample_rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: DataField) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn with_sample_row(mut self, row: SampleRow) -> Self {
        self.sample_rows.push(row);
        self
    }

    /// Fields that are always present.
    pub fn required_fields(&self) -> impl Iterator<Item = &DataField> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Number of required fields of any of the given kinds.
    pub fn count_required(&self, kinds: &[FieldKind]) -> usize {
        self.required_fields()
            .filter(|f| kinds.contains(&f.value_kind))
            .count()
    }

    /// First field tagged with the given role.
    pub fn field_with_role(&self, role: FieldRole) -> Option<&DataField> {
        self.fields.iter().find(|f| f.role == Some(role))
    }

    pub fn field(&self, id: &str) -> Option<&DataField> {
        self.fields.iter().find(|f| f.id == id)
    }
}

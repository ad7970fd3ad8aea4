//! Report configuration data model.
//!
//! This crate provides the value types shared by every layer of the report
//! configuration engine:
//!
//! - [`ReportConfiguration`]: the root aggregate persisted per scope
//! - [`GridRegion`]: a horizontal band of 1, 2 or 3 equal-width columns
//! - [`ChartWidget`]: one chart placed at a column of a region
//! - [`DataSource`]: the fields and preview rows a chart draws from
//! - [`Scope`]: the storage partition (`Global` or `Client(id)`)
//!
//! All types are plain values. Components exchange them by clone; nothing in
//! this crate holds references into another component's state.
//!
//! # Serialization
//!
//! Records serialize to camelCase JSON. Timestamps use the tagged shape
//! `{"__type":"Date","value":"2024-05-01T10:00:00.000Z"}` (see [`tagged_date`]),
//! which is the format the key-value store holds.

pub mod chart;
pub mod clock;
pub mod configuration;
pub mod data_source;
pub mod region;
pub mod scope;
pub mod tagged_date;
pub mod widget;

pub use chart::ChartType;
pub use clock::now;
pub use configuration::ReportConfiguration;
pub use data_source::{DataCategory, DataField, DataSource, FieldKind, FieldRole, SampleRow};
pub use region::{GridRegion, MAX_COLUMNS};
pub use scope::Scope;
pub use widget::{ChartWidget, Presentation};

/// Generate a fresh opaque identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

//! Serde adapter for the tagged date shape.
//!
//! The key-value store only holds strings, so timestamps are written as
//!
//! ```text
//! {"__type": "Date", "value": "2024-05-01T10:00:00.000Z"}
//! ```
//!
//! and reconstructed on read. Only this shape deserializes into a timestamp;
//! a bare string or a different `__type` tag is rejected.
//!
//! Use with `#[serde(with = "rpt_model::tagged_date")]`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Tag value identifying a serialized timestamp.
pub const DATE_TAG: &str = "Date";

#[derive(Serialize, Deserialize)]
struct TaggedDate {
    #[serde(rename = "__type")]
    kind: String,
    value: String,
}

/// Format a timestamp the way it is stored (ISO-8601, milliseconds, `Z`).
pub fn to_iso_string(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    TaggedDate {
        kind: DATE_TAG.to_string(),
        value: to_iso_string(value),
    }
    .serialize(serializer)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let tagged = TaggedDate::deserialize(deserializer)?;
    if tagged.kind != DATE_TAG {
        return Err(serde::de::Error::custom(format!(
            "expected __type \"{DATE_TAG}\", found \"{}\"",
            tagged.kind
        )));
    }
    DateTime::parse_from_rfc3339(&tagged.value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| serde::de::Error::custom(format!("invalid ISO date '{}': {e}", tagged.value)))
}

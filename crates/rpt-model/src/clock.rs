//! Timestamp source.

use chrono::{DateTime, SubsecRound, Utc};

/// Current time truncated to millisecond precision.
///
/// Stored timestamps carry milliseconds only, so every timestamp the engine
/// creates is truncated up front. A value read back from storage then compares
/// equal to the value that was written.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

//! Change notifications and their wire envelope.

use chrono::{DateTime, Utc};
use rpt_model::Scope;
use serde::{Deserialize, Serialize};

/// What happened to a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// A configuration changed in some session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncNotification {
    pub kind: ChangeKind,
    pub scope: Scope,
    pub config_id: String,
    #[serde(with = "rpt_model::tagged_date")]
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl SyncNotification {
    /// Notification stamped with the current time.
    pub fn new(
        kind: ChangeKind,
        scope: Scope,
        config_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            scope,
            config_id: config_id.into(),
            timestamp: rpt_model::now(),
            message: message.into(),
        }
    }
}

/// What travels over a [`ChangeNotifier`](crate::ChangeNotifier).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Envelope {
    pub origin: String,
    pub notification: SyncNotification,
}

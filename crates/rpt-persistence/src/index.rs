//! Listing of stored configurations, kept under [`INDEX_KEY`](crate::keys::INDEX_KEY).

use chrono::{DateTime, Utc};
use rpt_model::{ReportConfiguration, Scope};
use serde::{Deserialize, Serialize};

/// One row of the index. There is at most one entry per scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub id: String,
    pub name: String,
    pub scope: Scope,
    #[serde(with = "rpt_model::tagged_date")]
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

impl IndexEntry {
    pub fn from_config(config: &ReportConfiguration) -> Self {
        Self {
            id: config.id.clone(),
            name: config.name.clone(),
            scope: config.owner_scope.clone(),
            updated_at: config.updated_at,
            is_active: config.is_active,
        }
    }
}

/// Replace the entry for `entry.scope`, keeping entries sorted by scope.
pub(crate) fn upsert(entries: &mut Vec<IndexEntry>, entry: IndexEntry) {
    entries.retain(|e| e.scope != entry.scope);
    entries.push(entry);
    entries.sort_by(|a, b| a.scope.cmp(&b.scope));
}

/// Drop the entry for `scope`. Returns whether one existed.
pub(crate) fn remove(entries: &mut Vec<IndexEntry>, scope: &Scope) -> bool {
    let before = entries.len();
    entries.retain(|e| &e.scope != scope);
    entries.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_replaces_same_scope() {
        let mut entries = Vec::new();
        let first = ReportConfiguration::new("First", Scope::client("b")).with_id("1");
        let second = ReportConfiguration::new("Second", Scope::client("b")).with_id("2");
        let global = ReportConfiguration::new("Global", Scope::Global).with_id("g");

        upsert(&mut entries, IndexEntry::from_config(&first));
        upsert(&mut entries, IndexEntry::from_config(&global));
        upsert(&mut entries, IndexEntry::from_config(&second));

        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["g", "2"]);
        assert!(remove(&mut entries, &Scope::Global));
        assert!(!remove(&mut entries, &Scope::Global));
    }
}

//! Scoped save/load on top of a [`KeyValueStore`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rpt_model::{DataSource, ReportConfiguration, Scope};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::{PersistenceError, Result};
use crate::index::{self, IndexEntry};
use crate::keys::{CONFIG_PREFIX, INDEX_KEY, config_key, draft_key};
use crate::store::KeyValueStore;

/// Outcome of a successful save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReceipt {
    pub id: String,
    pub scope: Scope,
    #[serde(with = "rpt_model::tagged_date")]
    pub saved_at: DateTime<Utc>,
    pub message: String,
    /// Non-blocking validation findings.
    pub warnings: Vec<String>,
    /// The configuration as written, with its new `updated_at`.
    pub configuration: ReportConfiguration,
}

/// Saves, loads and lists configurations by scope.
///
/// Cheap to clone; clones share the store and data source catalog.
#[derive(Clone)]
pub struct PersistenceGateway {
    store: Arc<dyn KeyValueStore>,
    catalog: Arc<Vec<DataSource>>,
}

impl std::fmt::Debug for PersistenceGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceGateway")
            .field("catalog", &self.catalog.len())
            .finish_non_exhaustive()
    }
}

impl PersistenceGateway {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            catalog: Arc::new(Vec::new()),
        }
    }

    /// Data sources used to check chart compatibility on save.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Vec<DataSource>) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }

    pub fn catalog(&self) -> &[DataSource] {
        &self.catalog
    }

    // =========================================================================
    // SAVE / LOAD
    // =========================================================================

    /// Validate and write a configuration to its scope's partition.
    ///
    /// Nothing is written when validation reports errors. On success the
    /// index is updated and any draft for the configuration id is cleared.
    pub fn save(&self, config: &ReportConfiguration) -> Result<SaveReceipt> {
        let report = rpt_validate::validate(config, &self.catalog);
        if !report.is_valid() {
            warn!(
                config_id = %config.id,
                errors = report.error_count(),
                "refusing to save invalid configuration"
            );
            return Err(PersistenceError::Validation { report });
        }

        let mut stored = config.clone();
        stored.touch();

        let key = config_key(&stored.owner_scope);
        let json = serde_json::to_string(&stored).map_err(|e| PersistenceError::Serialization {
            reason: e.to_string(),
        })?;
        if !self.store.set(&key, &json) {
            return Err(PersistenceError::WriteRejected { key });
        }

        let mut entries = self.list();
        index::upsert(&mut entries, IndexEntry::from_config(&stored));
        self.write_index(&entries)?;

        self.store.remove(&draft_key(&stored.id));

        info!(
            config_id = %stored.id,
            scope = %stored.owner_scope,
            "saved configuration"
        );
        Ok(SaveReceipt {
            id: stored.id.clone(),
            scope: stored.owner_scope.clone(),
            saved_at: stored.updated_at,
            message: format!("Configuration '{}' saved", stored.name),
            warnings: report.warnings.iter().map(rpt_validate::Issue::message).collect(),
            configuration: stored,
        })
    }

    /// Read the configuration stored for `scope`.
    ///
    /// Distinguishes an empty partition ([`PersistenceError::NotFound`]) from
    /// unreadable data ([`PersistenceError::Corrupt`]).
    pub fn load(&self, scope: &Scope) -> Result<ReportConfiguration> {
        let key = config_key(scope);
        let Some(json) = self.store.get(&key) else {
            debug!(scope = %scope, "no configuration stored");
            return Err(PersistenceError::NotFound {
                scope: scope.clone(),
            });
        };
        serde_json::from_str(&json).map_err(|e| {
            error!(key = %key, error = %e, "stored configuration is corrupt");
            PersistenceError::Corrupt {
                key,
                reason: e.to_string(),
            }
        })
    }

    /// Remove the partition for `scope` and its index entry. Drafts are kept.
    pub fn delete(&self, scope: &Scope) -> Result<()> {
        let key = config_key(scope);
        if !self.store.remove(&key) {
            return Err(PersistenceError::NotFound {
                scope: scope.clone(),
            });
        }
        let mut entries = self.list();
        if index::remove(&mut entries, scope) {
            self.write_index(&entries)?;
        }
        info!(scope = %scope, "deleted configuration");
        Ok(())
    }

    /// Copy the configuration of `source_scope` into a client's partition.
    ///
    /// The copy gets a new id, a name suffixed with the client id and fresh
    /// timestamps, and goes through [`save`](Self::save).
    pub fn duplicate(&self, source_scope: &Scope, target_client_id: &str) -> Result<SaveReceipt> {
        let source = self.load(source_scope)?;
        let now = rpt_model::now();
        let copy = ReportConfiguration {
            id: rpt_model::new_id(),
            name: format!("{} ({})", source.name, target_client_id),
            owner_scope: Scope::client(target_client_id),
            created_at: now,
            updated_at: now,
            ..source
        };
        debug!(from = %source_scope, to = target_client_id, "duplicating configuration");
        self.save(&copy)
    }

    /// Index entries, sorted by scope.
    ///
    /// A missing index is empty. An unreadable one is rebuilt from the stored
    /// partitions, so the next write replaces it with a complete listing.
    pub fn list(&self) -> Vec<IndexEntry> {
        let Some(json) = self.store.get(INDEX_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str(&json) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "configuration index is unreadable, rebuilding from partitions");
                self.rebuild_index()
            }
        }
    }

    /// Index entries for every readable partition in the store.
    fn rebuild_index(&self) -> Vec<IndexEntry> {
        let mut entries = Vec::new();
        for key in self.store.keys() {
            if key == INDEX_KEY || !key.starts_with(CONFIG_PREFIX) {
                continue;
            }
            let Some(json) = self.store.get(&key) else {
                continue;
            };
            match serde_json::from_str::<ReportConfiguration>(&json) {
                Ok(config) if config_key(&config.owner_scope) == key => {
                    index::upsert(&mut entries, IndexEntry::from_config(&config));
                }
                Ok(config) => {
                    warn!(
                        key = %key,
                        scope = %config.owner_scope,
                        "partition holds another scope, not indexed"
                    );
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "unreadable partition, not indexed");
                }
            }
        }
        debug!(count = entries.len(), "rebuilt configuration index");
        entries
    }

    fn write_index(&self, entries: &[IndexEntry]) -> Result<()> {
        let json =
            serde_json::to_string(entries).map_err(|e| PersistenceError::Serialization {
                reason: e.to_string(),
            })?;
        if self.store.set(INDEX_KEY, &json) {
            Ok(())
        } else {
            Err(PersistenceError::WriteRejected {
                key: INDEX_KEY.to_string(),
            })
        }
    }

    // =========================================================================
    // DRAFTS
    // =========================================================================

    /// Write an unvalidated copy of an in-progress edit.
    pub fn save_draft(&self, config: &ReportConfiguration) -> Result<()> {
        let key = draft_key(&config.id);
        let json = serde_json::to_string(config).map_err(|e| PersistenceError::Serialization {
            reason: e.to_string(),
        })?;
        if !self.store.set(&key, &json) {
            return Err(PersistenceError::WriteRejected { key });
        }
        debug!(config_id = %config.id, "wrote draft");
        Ok(())
    }

    /// Draft for a configuration id, if one exists.
    pub fn load_draft(&self, config_id: &str) -> Result<Option<ReportConfiguration>> {
        let key = draft_key(config_id);
        let Some(json) = self.store.get(&key) else {
            return Ok(None);
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| PersistenceError::Corrupt {
                key,
                reason: e.to_string(),
            })
    }

    /// Drop the draft for a configuration id. Returns whether one existed.
    pub fn clear_draft(&self, config_id: &str) -> bool {
        self.store.remove(&draft_key(config_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use rpt_model::{ChartType, ChartWidget, DataCategory, DataField, FieldKind, GridRegion};

    fn sales() -> DataSource {
        DataSource::new("ds-sales", "Sales", DataCategory::Revenue)
            .with_field(DataField::new("region", "Region", FieldKind::Text))
            .with_field(DataField::new("total", "Total", FieldKind::Number))
    }

    fn valid(scope: Scope) -> ReportConfiguration {
        ReportConfiguration::new("Sales overview", scope).with_region(
            GridRegion::new(1, 0)
                .with_widget(ChartWidget::new(ChartType::GenericBar, 0, sales()).with_id("bar")),
        )
    }

    fn gateway() -> (Arc<MemoryStore>, PersistenceGateway) {
        let store = Arc::new(MemoryStore::new());
        let gateway = PersistenceGateway::new(store.clone());
        (store, gateway)
    }

    #[test]
    fn test_save_then_load() {
        let (_, gateway) = gateway();
        let config = valid(Scope::Global);
        let receipt = gateway.save(&config).unwrap();
        assert_eq!(receipt.id, config.id);
        assert_eq!(receipt.scope, Scope::Global);

        let loaded = gateway.load(&Scope::Global).unwrap();
        assert_eq!(loaded, receipt.configuration);
        assert!(loaded.updated_at >= config.updated_at);
        assert_eq!(gateway.list().len(), 1);
    }

    #[test]
    fn test_invalid_config_is_not_written() {
        let (store, gateway) = gateway();
        let config = ReportConfiguration::new("", Scope::Global);
        let err = gateway.save(&config).unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert!(err.to_string().contains("Configuration name is required"));
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_missing_and_corrupt_are_distinct() {
        let (store, gateway) = gateway();
        assert!(gateway.load(&Scope::client("acme")).unwrap_err().is_not_found());

        store.set("config:client:acme", "{not json");
        let err = gateway.load(&Scope::client("acme")).unwrap_err();
        assert!(err.is_corrupt());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_save_clears_draft() {
        let (_, gateway) = gateway();
        let config = valid(Scope::Global);
        gateway.save_draft(&config).unwrap();
        assert!(gateway.load_draft(&config.id).unwrap().is_some());

        gateway.save(&config).unwrap();
        assert!(gateway.load_draft(&config.id).unwrap().is_none());
    }

    #[test]
    fn test_draft_skips_validation() {
        let (_, gateway) = gateway();
        let broken = ReportConfiguration::new("", Scope::Global);
        gateway.save_draft(&broken).unwrap();
        assert_eq!(gateway.load_draft(&broken.id).unwrap(), Some(broken.clone()));
        assert!(gateway.clear_draft(&broken.id));
        assert!(!gateway.clear_draft(&broken.id));
    }

    #[test]
    fn test_delete_keeps_drafts() {
        let (_, gateway) = gateway();
        let config = valid(Scope::client("acme"));
        gateway.save(&config).unwrap();
        gateway.save_draft(&config).unwrap();

        gateway.delete(&Scope::client("acme")).unwrap();
        assert!(gateway.load(&Scope::client("acme")).unwrap_err().is_not_found());
        assert!(gateway.list().is_empty());
        assert!(gateway.load_draft(&config.id).unwrap().is_some());
        assert!(gateway.delete(&Scope::client("acme")).unwrap_err().is_not_found());
    }

    #[test]
    fn test_duplicate_into_client() {
        let (_, gateway) = gateway();
        let original = gateway.save(&valid(Scope::Global)).unwrap().configuration;

        let receipt = gateway.duplicate(&Scope::Global, "acme").unwrap();
        let copy = gateway.load(&Scope::client("acme")).unwrap();
        assert_eq!(receipt.id, copy.id);
        assert_ne!(copy.id, original.id);
        assert_eq!(copy.name, "Sales overview (acme)");
        assert_eq!(copy.owner_scope, Scope::client("acme"));
        assert_eq!(copy.regions, original.regions);
        assert_eq!(gateway.list().len(), 2);
    }

    #[test]
    fn test_full_store_surfaces_write_rejected() {
        let store = Arc::new(MemoryStore::with_quota(64));
        let gateway = PersistenceGateway::new(store);
        let err = gateway.save(&valid(Scope::Global)).unwrap_err();
        assert!(matches!(err, PersistenceError::WriteRejected { ref key } if key == "config:global"));
        assert!(gateway.load(&Scope::Global).unwrap_err().is_not_found());
    }

    #[test]
    fn test_unreadable_index_is_rebuilt() {
        let (store, gateway) = gateway();
        gateway.save(&valid(Scope::Global)).unwrap();
        gateway.save(&valid(Scope::client("acme"))).unwrap();
        store.set("config:client:junk", "{not json");
        store.set(INDEX_KEY, "[{]");

        let scopes: Vec<Scope> = gateway.list().into_iter().map(|e| e.scope).collect();
        assert_eq!(scopes, vec![Scope::Global, Scope::client("acme")]);

        // The next save writes a complete index, not just its own entry.
        gateway.save(&valid(Scope::client("beta"))).unwrap();
        assert!(serde_json::from_str::<Vec<IndexEntry>>(&store.get(INDEX_KEY).unwrap()).is_ok());
        assert_eq!(gateway.list().len(), 3);

        let exported = gateway.export_all().unwrap();
        assert_eq!(exported.matches("\"ownerScope\"").count(), 3);
    }
}

//! Export and import of every stored configuration as one JSON document.

use chrono::{DateTime, Utc};
use rpt_model::ReportConfiguration;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{PersistenceError, Result};
use crate::gateway::PersistenceGateway;

/// Current export schema version.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// The export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub schema_version: u32,
    #[serde(with = "rpt_model::tagged_date")]
    pub exported_at: DateTime<Utc>,
    pub configurations: Vec<ReportConfiguration>,
}

/// One entry an import could not save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFailure {
    /// 1-based position in the document.
    pub position: usize,
    pub id: Option<String>,
    pub message: String,
}

/// Outcome of a best-effort import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Ids of saved configurations, in document order.
    pub imported: Vec<String>,
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// One line per failed entry, joined with "; ".
    pub fn failure_message(&self) -> String {
        self.failures
            .iter()
            .map(|f| match &f.id {
                Some(id) => format!("Entry {} ({}): {}", f.position, id, f.message),
                None => format!("Entry {}: {}", f.position, f.message),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl PersistenceGateway {
    /// Serialize every indexed configuration.
    ///
    /// Entries whose partition is missing or unreadable are skipped with a
    /// warning.
    pub fn export_all(&self) -> Result<String> {
        let configurations: Vec<ReportConfiguration> = self
            .list()
            .iter()
            .filter_map(|entry| match self.load(&entry.scope) {
                Ok(config) => Some(config),
                Err(e) => {
                    warn!(scope = %entry.scope, error = %e, "skipping entry during export");
                    None
                }
            })
            .collect();

        let document = ExportDocument {
            schema_version: CURRENT_SCHEMA_VERSION,
            exported_at: rpt_model::now(),
            configurations,
        };
        info!(count = document.configurations.len(), "exported configurations");
        serde_json::to_string_pretty(&document).map_err(|e| PersistenceError::Serialization {
            reason: e.to_string(),
        })
    }

    /// Save every configuration in an export document.
    ///
    /// Each entry is saved on its own: failures are collected and the
    /// remaining entries still go through. Nothing is rolled back. Only an
    /// unreadable document or an unsupported schema version fails the whole
    /// call.
    pub fn import_all(&self, document: &str) -> Result<ImportReport> {
        let value: serde_json::Value =
            serde_json::from_str(document).map_err(|e| PersistenceError::InvalidDocument {
                reason: e.to_string(),
            })?;

        let version = value
            .get("schemaVersion")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| PersistenceError::InvalidDocument {
                reason: "missing schemaVersion".to_string(),
            })?;
        let version = u32::try_from(version).unwrap_or(u32::MAX);
        if version > CURRENT_SCHEMA_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: version,
                max_supported: CURRENT_SCHEMA_VERSION,
            });
        }

        let entries = value
            .get("configurations")
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| PersistenceError::InvalidDocument {
                reason: "missing configurations array".to_string(),
            })?;

        let mut report = ImportReport::default();
        for (i, entry) in entries.iter().enumerate() {
            let position = i + 1;
            let id = entry
                .get("id")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string);

            let config: ReportConfiguration = match serde_json::from_value(entry.clone()) {
                Ok(config) => config,
                Err(e) => {
                    report.failures.push(ImportFailure {
                        position,
                        id,
                        message: format!("unreadable entry: {e}"),
                    });
                    continue;
                }
            };

            match self.save(&config) {
                Ok(receipt) => report.imported.push(receipt.id),
                Err(e) => report.failures.push(ImportFailure {
                    position,
                    id,
                    message: e.to_string(),
                }),
            }
        }

        if report.is_complete() {
            info!(imported = report.imported.len(), "import complete");
        } else {
            warn!(
                imported = report.imported.len(),
                failed = report.failures.len(),
                "import finished with failures"
            );
        }
        Ok(report)
    }
}

//! Command implementations.
//!
//! Each command returns data; printing lives in the binary.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use rpt_model::{DataSource, ReportConfiguration, Scope};
use rpt_persistence::{
    AutoSaveConfig, EmptyReportProvider, FileStore, ImportReport, IndexEntry, PersistenceGateway,
    Resolution, ResolvedSource, SaveReceipt,
};
use rpt_placement::PlacementOp;
use rpt_session::ConfigurationController;
use rpt_sync::{InProcessChangeBus, SyncBroadcaster};
use rpt_validate::ValidationReport;
use tracing::{info, warn};

// =============================================================================
// SETUP
// =============================================================================

/// Open the file store at `store_dir`, with an optional data source catalog.
pub fn open_gateway(store_dir: &Path, catalog: Option<&Path>) -> Result<PersistenceGateway> {
    let store = FileStore::open(store_dir)
        .with_context(|| format!("open store at {}", store_dir.display()))?;
    let gateway = PersistenceGateway::new(Arc::new(store));
    match catalog {
        Some(path) => Ok(gateway.with_catalog(load_catalog(path)?)),
        None => Ok(gateway),
    }
}

/// Read a JSON array of data sources.
pub fn load_catalog(path: &Path) -> Result<Vec<DataSource>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read catalog {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parse catalog {}", path.display()))
}

/// Parse `global` or `client:<id>`.
pub fn parse_scope(value: &str) -> Result<Scope> {
    Scope::parse(value).ok_or_else(|| {
        anyhow!("invalid scope '{value}' (expected 'global' or 'client:<id>')")
    })
}

// =============================================================================
// READ-ONLY COMMANDS
// =============================================================================

/// Validate the configuration stored for `scope`.
pub fn validate_stored(
    gateway: &PersistenceGateway,
    scope: &Scope,
) -> Result<(ReportConfiguration, ValidationReport)> {
    let config = gateway
        .load(scope)
        .with_context(|| format!("load configuration for {scope}"))?;
    let report = rpt_validate::validate(&config, gateway.catalog());
    Ok((config, report))
}

/// Validate a configuration JSON file without storing it.
pub fn check_file(
    gateway: &PersistenceGateway,
    path: &Path,
) -> Result<(ReportConfiguration, ValidationReport)> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let config: ReportConfiguration = serde_json::from_str(&content)
        .with_context(|| format!("parse configuration {}", path.display()))?;
    let report = rpt_validate::validate(&config, gateway.catalog());
    Ok((config, report))
}

pub fn list(gateway: &PersistenceGateway) -> Vec<IndexEntry> {
    gateway.list()
}

/// Resolve what a viewer of `scope` would be served.
pub fn show(gateway: &PersistenceGateway, scope: &Scope) -> Resolution {
    gateway.resolve(scope.client_id(), &EmptyReportProvider)
}

// =============================================================================
// MUTATING COMMANDS
// =============================================================================

pub fn delete(gateway: &PersistenceGateway, scope: &Scope) -> Result<()> {
    gateway
        .delete(scope)
        .with_context(|| format!("delete configuration for {scope}"))
}

pub fn duplicate(
    gateway: &PersistenceGateway,
    source: &Scope,
    target_client_id: &str,
) -> Result<SaveReceipt> {
    if target_client_id.trim().is_empty() {
        bail!("target client id must not be empty");
    }
    gateway
        .duplicate(source, target_client_id)
        .with_context(|| format!("duplicate {source} to client:{target_client_id}"))
}

/// Export everything. Writes to `output` when given and returns the document.
pub fn export(gateway: &PersistenceGateway, output: Option<&Path>) -> Result<String> {
    let document = gateway.export_all().context("export configurations")?;
    if let Some(path) = output {
        std::fs::write(path, &document)
            .with_context(|| format!("write export to {}", path.display()))?;
        info!(path = %path.display(), "wrote export");
    }
    Ok(document)
}

pub fn import(gateway: &PersistenceGateway, path: &Path) -> Result<ImportReport> {
    let document =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    gateway
        .import_all(&document)
        .with_context(|| format!("import {}", path.display()))
}

/// Result of applying a batch of placement commands.
#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    pub source: ResolvedSource,
    pub applied: usize,
    pub report: ValidationReport,
    /// Set when the edited configuration was saved.
    pub receipt: Option<SaveReceipt>,
    /// Set when the save was refused and a draft was kept instead.
    pub save_error: Option<String>,
}

/// Open an editing session for `scope`, run the placement commands from
/// `ops_path` (a JSON array) and save unless `dry_run`.
///
/// A refused save keeps the edit as a draft.
pub async fn apply(
    gateway: &PersistenceGateway,
    autosave: &AutoSaveConfig,
    scope: Scope,
    ops_path: &Path,
    dry_run: bool,
) -> Result<ApplyOutcome> {
    let content = std::fs::read_to_string(ops_path)
        .with_context(|| format!("read {}", ops_path.display()))?;
    let ops: Vec<PlacementOp> = serde_json::from_str(&content)
        .with_context(|| format!("parse placement commands {}", ops_path.display()))?;
    info!(scope = %scope, commands = ops.len(), "applying placement commands");

    let broadcaster = SyncBroadcaster::new(Arc::new(InProcessChangeBus::default()));
    broadcaster.add_listener("cli-log", |n| {
        info!(kind = ?n.kind, scope = %n.scope, config_id = %n.config_id, "{}", n.message);
    });

    let session = ConfigurationController::new(gateway.clone(), Arc::new(EmptyReportProvider))
        .with_autosave(autosave.clone());
    session.attach(Arc::clone(&broadcaster));

    let source = session.load_for_scope(scope.clone()).await?;
    let mut report = session.report();
    for (i, op) in ops.iter().enumerate() {
        report = session
            .apply_placement(op)
            .with_context(|| format!("command {} ({})", i + 1, op.name()))?;
    }

    let mut outcome = ApplyOutcome {
        source,
        applied: ops.len(),
        report,
        receipt: None,
        save_error: None,
    };
    if dry_run || ops.is_empty() {
        broadcaster.shutdown();
        return Ok(outcome);
    }

    match session.save().await {
        Ok(receipt) => outcome.receipt = Some(receipt),
        Err(e) => {
            let message = e.user_message();
            warn!(scope = %scope, error = %message, "save refused, keeping draft");
            if let Some(config) = session.configuration() {
                gateway.save_draft(&config).context("write draft")?;
            }
            outcome.save_error = Some(message);
        }
    }
    broadcaster.shutdown();
    Ok(outcome)
}

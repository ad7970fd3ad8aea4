//! Resolution chain: client, then global, then a built-in default.

use rpt_model::{ReportConfiguration, Scope};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::PersistenceError;
use crate::gateway::PersistenceGateway;

/// Where a resolved configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolvedSource {
    Client,
    Global,
    BuiltIn,
}

impl ResolvedSource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Global => "global",
            Self::BuiltIn => "built-in",
        }
    }
}

impl std::fmt::Display for ResolvedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A configuration ready to render, plus its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub configuration: ReportConfiguration,
    pub source: ResolvedSource,
}

/// Supplies the report shown when nothing usable is stored.
pub trait DefaultReportProvider: Send + Sync {
    fn default_report(&self, scope: &Scope) -> ReportConfiguration;
}

/// Default provider: an empty, active configuration named "Default report".
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyReportProvider;

impl DefaultReportProvider for EmptyReportProvider {
    fn default_report(&self, scope: &Scope) -> ReportConfiguration {
        ReportConfiguration::new("Default report", scope.clone())
    }
}

impl PersistenceGateway {
    /// Resolve the configuration to render for a client (or for the global
    /// scope when `client_id` is `None`).
    ///
    /// A partition is skipped when it is empty, unreadable or inactive.
    /// Unreadable data is logged but never surfaced to the caller.
    pub fn resolve(
        &self,
        client_id: Option<&str>,
        defaults: &dyn DefaultReportProvider,
    ) -> Resolution {
        if let Some(client_id) = client_id {
            let scope = Scope::client(client_id);
            if let Some(configuration) = self.load_active(&scope) {
                return Resolution {
                    configuration,
                    source: ResolvedSource::Client,
                };
            }
        }

        if let Some(configuration) = self.load_active(&Scope::Global) {
            if client_id.is_some() {
                debug!(client_id, "falling back to global configuration");
            }
            return Resolution {
                configuration,
                source: ResolvedSource::Global,
            };
        }

        let requested = client_id.map_or(Scope::Global, Scope::client);
        warn!(scope = %requested, "no stored configuration usable, using built-in default");
        Resolution {
            configuration: defaults.default_report(&requested),
            source: ResolvedSource::BuiltIn,
        }
    }

    fn load_active(&self, scope: &Scope) -> Option<ReportConfiguration> {
        match self.load(scope) {
            Ok(config) if config.is_active => Some(config),
            Ok(config) => {
                debug!(scope = %scope, config_id = %config.id, "configuration is inactive");
                None
            }
            Err(PersistenceError::NotFound { .. }) => None,
            Err(e) => {
                warn!(scope = %scope, error = %e, "skipping unreadable configuration");
                None
            }
        }
    }
}

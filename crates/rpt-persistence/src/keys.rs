//! Store key layout.
//!
//! ```text
//! config:global          global partition
//! config:client:<id>     one partition per client
//! config:index           listing of stored configurations
//! draft:<config id>      unvalidated autosave copy
//! ```

use rpt_model::Scope;

pub const INDEX_KEY: &str = "config:index";

/// Prefix shared by the partitions and the index.
pub const CONFIG_PREFIX: &str = "config:";

/// Partition key for a scope.
pub fn config_key(scope: &Scope) -> String {
    match scope {
        Scope::Global => "config:global".to_string(),
        Scope::Client { client_id } => format!("config:client:{client_id}"),
    }
}

/// Draft key for a configuration id.
pub fn draft_key(config_id: &str) -> String {
    format!("draft:{config_id}")
}

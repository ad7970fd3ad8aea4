//! Autosave configuration.

use serde::{Deserialize, Serialize};

/// When drafts are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoSaveConfig {
    /// Whether drafts are written at all.
    pub enabled: bool,

    /// Quiet period after the last edit before a draft is written.
    pub debounce_ms: u64,

    /// Upper bound on how long edits can go without a draft, measured from
    /// the first edit since the last draft.
    pub max_delay_ms: u64,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: 1500,
            max_delay_ms: 20_000,
        }
    }
}

impl AutoSaveConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Whether a draft is due given the two elapsed times.
    pub fn should_save(&self, since_last_change_ms: u64, since_first_unsaved_ms: u64) -> bool {
        self.enabled
            && (since_last_change_ms >= self.debounce_ms
                || since_first_unsaved_ms >= self.max_delay_ms)
    }
}

//! Edit tracking for drafts.

use std::time::Instant;

use super::AutoSaveConfig;

/// Tracks unsaved edits of the configuration being edited.
///
/// `dirty` stays set until a real save succeeds; writing a draft only resets
/// the draft timer.
#[derive(Debug, Clone, Default)]
pub struct DraftTracker {
    dirty: bool,
    draft_pending: bool,
    saving: bool,
    last_change: Option<Instant>,
    /// First edit since the last draft or save.
    first_unsaved_change: Option<Instant>,
}

impl DraftTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Whether edits happened since the last draft.
    #[inline]
    pub fn has_pending_draft(&self) -> bool {
        self.draft_pending
    }

    /// Record an edit.
    pub fn mark_dirty(&mut self) {
        let now = Instant::now();
        self.dirty = true;
        self.draft_pending = true;
        self.last_change = Some(now);
        if self.first_unsaved_change.is_none() {
            self.first_unsaved_change = Some(now);
        }
    }

    pub fn start_save(&mut self) {
        self.saving = true;
    }

    pub fn save_complete(&mut self) {
        self.dirty = false;
        self.draft_pending = false;
        self.saving = false;
        self.first_unsaved_change = None;
    }

    pub fn save_failed(&mut self) {
        self.saving = false;
    }

    /// A draft was written; edits remain unsaved.
    pub fn draft_written(&mut self) {
        self.draft_pending = false;
        self.first_unsaved_change = None;
    }

    /// Forget everything, e.g. after loading another configuration.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn ms_since_last_change(&self) -> Option<u64> {
        self.last_change
            .map(|t| u64::try_from(t.elapsed().as_millis()).unwrap_or(u64::MAX))
    }

    pub fn ms_since_first_unsaved(&self) -> Option<u64> {
        self.first_unsaved_change
            .map(|t| u64::try_from(t.elapsed().as_millis()).unwrap_or(u64::MAX))
    }

    /// Whether the policy says a draft is due now.
    pub fn should_write_draft(&self, config: &AutoSaveConfig) -> bool {
        if !self.draft_pending || self.saving || !config.enabled {
            return false;
        }
        match (self.ms_since_last_change(), self.ms_since_first_unsaved()) {
            (Some(since_last), Some(since_first)) => config.should_save(since_last, since_first),
            _ => false,
        }
    }
}

//! Draft autosave policy.
//!
//! Provides:
//! - `DraftTracker` - Tracks unsaved edits and when a draft is due
//! - `AutoSaveConfig` - User settings for draft timing

mod config;
mod tracker;

pub use config::AutoSaveConfig;
pub use tracker::DraftTracker;

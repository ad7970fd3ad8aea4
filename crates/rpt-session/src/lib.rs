//! Editing sessions for report configurations.
//!
//! A [`ConfigurationController`] owns the buffer being edited for one scope
//! and drives it through the other crates:
//!
//! 1. `load_for_scope` resolves client, then global, then the built-in default
//! 2. `apply_placement` runs a [`PlacementOp`](rpt_placement::PlacementOp) and
//!    re-validates the result
//! 3. `save` validates and persists, then announces the change and
//!    invalidates caches for the scope
//!
//! Sessions attached to the same [`SyncBroadcaster`](rpt_sync::SyncBroadcaster)
//! (or to broadcasters sharing a change bus) mark each other stale on save;
//! `refresh_if_stale` reloads a session that has no unsaved edits.

mod controller;
mod error;
mod state;

pub use controller::ConfigurationController;
pub use error::{Result, SessionError};
pub use state::SessionState;

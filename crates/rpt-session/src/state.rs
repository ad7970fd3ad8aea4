//! Session lifecycle states.

use serde::Serialize;

/// Where a session is in its lifecycle.
///
/// ```text
/// Empty -> Loading -> Ready <-> Saving
/// ```
///
/// `Loading` and `Saving` are transient; while in either, every other
/// command is refused as busy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    #[default]
    Empty,
    Loading,
    Ready,
    Saving,
}

impl SessionState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Saving => "saving",
        }
    }

    #[inline]
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Loading | Self::Saving)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

//! Storage scope of a configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The partition a configuration belongs to.
///
/// `Global` is the default for every client; `Client(id)` overrides it for a
/// single client.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Scope {
    Global,
    Client {
        #[serde(rename = "clientId")]
        client_id: String,
    },
}

impl Scope {
    /// Scope for a single client.
    pub fn client(client_id: impl Into<String>) -> Self {
        Self::Client {
            client_id: client_id.into(),
        }
    }

    /// Client id, if this is a client scope.
    pub fn client_id(&self) -> Option<&str> {
        match self {
            Self::Global => None,
            Self::Client { client_id } => Some(client_id),
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global)
    }

    /// Parse the textual form used on the command line and in logs.
    ///
    /// Accepts `global` and `client:<id>`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("global") {
            return Some(Self::Global);
        }
        let id = s.strip_prefix("client:")?;
        if id.is_empty() {
            None
        } else {
            Some(Self::client(id))
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::Client { client_id } => write!(f, "client:{client_id}"),
        }
    }
}

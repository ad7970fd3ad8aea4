//! Persistence error types.
//!
//! All persistence operations return structured errors that provide
//! user-friendly messages and optional remediation hints.

use rpt_model::Scope;
use rpt_validate::ValidationReport;
use thiserror::Error;

/// Persistence operation error.
#[derive(Debug, Clone, Error)]
pub enum PersistenceError {
    /// Nothing stored for the scope.
    #[error("No configuration stored for {scope}")]
    NotFound { scope: Scope },

    /// Stored data exists but cannot be parsed.
    #[error("Stored data at '{key}' is corrupt: {reason}")]
    Corrupt { key: String, reason: String },

    /// Validation refused the configuration; nothing was written.
    #[error("Configuration is invalid: {}", report.error_message())]
    Validation { report: ValidationReport },

    /// The store refused a write (quota, I/O).
    #[error("Store rejected write to '{key}'")]
    WriteRejected { key: String },

    /// Serialization error.
    #[error("Failed to serialize configuration: {reason}")]
    Serialization { reason: String },

    /// Export document from a newer release.
    #[error("Export schema version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion { found: u32, max_supported: u32 },

    /// Export document that is not a valid export.
    #[error("Invalid export document: {reason}")]
    InvalidDocument { reason: String },
}

impl PersistenceError {
    /// Whether the failure means "nothing there" (fall back quietly).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether stored data exists but is unreadable (fall back, but report it).
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }

    /// Short machine-friendly name of the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not-found",
            Self::Corrupt { .. } => "corrupt",
            Self::Validation { .. } => "validation",
            Self::WriteRejected { .. } => "write-rejected",
            Self::Serialization { .. } => "serialization",
            Self::UnsupportedVersion { .. } => "unsupported-version",
            Self::InvalidDocument { .. } => "invalid-document",
        }
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { scope } => {
                format!("There is no saved report configuration for {scope}.")
            }
            Self::Corrupt { key, .. } => {
                format!("The saved report configuration at '{key}' could not be read. It may be corrupted.")
            }
            Self::Validation { report } => {
                format!(
                    "The report configuration was not saved: {}",
                    report.error_message()
                )
            }
            Self::WriteRejected { key } => {
                format!("The storage refused to save '{key}'.")
            }
            Self::Serialization { .. } => {
                "An error occurred while preparing the configuration for storage.".to_string()
            }
            Self::UnsupportedVersion {
                found,
                max_supported,
            } => {
                format!(
                    "This export was created by a newer version (schema {found}, this version \
                    supports up to {max_supported})."
                )
            }
            Self::InvalidDocument { reason } => {
                format!("The file is not a report configuration export: {reason}")
            }
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::NotFound { .. } => {
                Some("Create a configuration for this scope or rely on the global one.".into())
            }
            Self::Corrupt { .. } => {
                Some("Re-import the configuration from an export, or delete and recreate it.".into())
            }
            Self::Validation { .. } => {
                Some("Fix the listed issues and save again.".into())
            }
            Self::WriteRejected { .. } => {
                Some("Check free space and permissions of the storage location.".into())
            }
            Self::Serialization { .. } => None,
            Self::UnsupportedVersion { .. } => Some("Update the application and import again.".into()),
            Self::InvalidDocument { .. } => {
                Some("Make sure you selected a file produced by the export command.".into())
            }
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;

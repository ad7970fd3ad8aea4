//! Persistent storage for report configurations.
//!
//! This crate stores one configuration per scope in a string key-value
//! store and resolves which configuration a client sees.
//!
//! # Features
//!
//! - **Validated saves**: nothing is written unless validation passes
//! - **Resolution chain**: client, then global, then a built-in default
//! - **Drafts**: unvalidated autosave copies with a debounce policy
//! - **Export / import**: one JSON document, best-effort import
//!
//! # Storage layout
//!
//! ```text
//! config:global          ReportConfiguration (JSON)
//! config:client:<id>     ReportConfiguration (JSON)
//! config:index           [IndexEntry]
//! draft:<config id>      ReportConfiguration (JSON, unvalidated)
//! ```
//!
//! Timestamps are stored as `{"__type":"Date","value":"<ISO-8601>"}`.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rpt_persistence::{EmptyReportProvider, MemoryStore, PersistenceGateway};
//!
//! let gateway = PersistenceGateway::new(Arc::new(MemoryStore::new()));
//! gateway.save(&config)?;
//!
//! let resolved = gateway.resolve(Some("acme"), &EmptyReportProvider);
//! println!("serving {} from {}", resolved.configuration.name, resolved.source);
//! ```

mod autosave;
mod error;
mod gateway;
mod index;
pub mod keys;
mod resolve;
mod store;
mod transfer;

pub use autosave::{AutoSaveConfig, DraftTracker};
pub use error::{PersistenceError, Result};
pub use gateway::{PersistenceGateway, SaveReceipt};
pub use index::IndexEntry;
pub use resolve::{DefaultReportProvider, EmptyReportProvider, Resolution, ResolvedSource};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use transfer::{CURRENT_SCHEMA_VERSION, ExportDocument, ImportFailure, ImportReport};

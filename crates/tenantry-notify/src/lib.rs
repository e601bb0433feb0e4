//! # Tenantry Notify
//!
//! Pushes successfully created task records to a third-party document
//! management service.
//!
//! Notification happens strictly after the record has been stored. A failed
//! notification is reported to the caller but never undoes the stored record.
//!
//! ## Notifiers
//!
//! - **[HttpRecordNotifier]**: posts the record's index fields to a remote
//!   `add-record` endpoint with reqwest.
//! - **[NoopNotifier]**: logs and succeeds; used when no remote is configured.

mod client;
mod config;
mod error;

pub use client::{HttpRecordNotifier, NoopNotifier, RecordNotifier};
pub use config::{DEFAULT_NOTIFY_PATH, NotifierConfig};
pub use error::{NotificationError, NotificationResult};

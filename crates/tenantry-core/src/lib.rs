//! # Tenantry Core
//!
//! Core types shared by every Tenantry crate: the persisted task record, the
//! validated identifiers it is built from, the outcome of a conditional
//! update, and the error taxonomy of the storage layer.
//!
//! ## Example
//!
//! ```rust
//! use tenantry_core::{Description, TaskRecord, TenantId};
//!
//! let tenant = TenantId::parse("acme").unwrap();
//! let description = Description::parse("write the quarterly report").unwrap();
//! let record = TaskRecord::new(description, tenant.clone());
//!
//! assert!(record.is_owned_by(&tenant));
//! assert_eq!(record.description().as_str(), "write the quarterly report");
//! ```

pub mod error;
pub mod identifiers;
pub mod outcome;
pub mod record;

pub use error::{StoreError, StoreResult, ValidationError};
pub use identifiers::{TaskId, TenantId};
pub use outcome::UpdateOutcome;
pub use record::{Description, MAX_DESCRIPTION_UNITS, TaskRecord};

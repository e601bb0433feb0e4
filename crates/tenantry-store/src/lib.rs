//! # Tenantry Store
//!
//! The tenant-aware record store and the persistence backends underneath it.
//!
//! ## Layers
//!
//! - **[PersistentStore]**: durable storage of the whole record collection as
//!   one unit (`read_all` / `write_all`).
//! - **[JsonFileStore]**: the production backend, a single JSON array on disk
//!   that is fully rewritten on every mutation.
//! - **[InMemoryStore]**: a transient backend for tests and local development.
//! - **[TaskStore]**: the only component allowed to mutate a backend. It
//!   serializes read-modify-write cycles, enforces tenant ownership on update
//!   and reports update outcomes as [`UpdateOutcome`] values.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tenantry_core::{Description, TenantId, UpdateOutcome};
//! use tenantry_store::{JsonFileStore, TaskStore};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let store = TaskStore::new(JsonFileStore::new("data/tasks.json"));
//! let tenant = TenantId::parse("acme")?;
//!
//! let record = store.add(Description::parse("draft invoice")?, tenant.clone()).await?;
//! match store.update(&tenant, record.id(), Description::parse("send invoice")?).await? {
//!     UpdateOutcome::Updated(updated) => println!("now: {}", updated.description()),
//!     UpdateOutcome::NotFound => println!("gone"),
//!     UpdateOutcome::NotOwned => println!("not yours"),
//! }
//! # Ok(())
//! # }
//! ```

mod file_store;
mod in_memory;
mod persistent;
mod task_store;

pub use file_store::JsonFileStore;
pub use in_memory::InMemoryStore;
pub use persistent::PersistentStore;
pub use task_store::TaskStore;

pub use tenantry_core::{
    Description, StoreError, StoreResult, TaskId, TaskRecord, TenantId, UpdateOutcome,
};

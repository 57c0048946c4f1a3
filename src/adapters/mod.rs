//! Record store backends for Rowpack.
//!
//! - [`store`] - the [`RecordStore`](store::RecordStore) trait and factory
//! - [`memory`] - in-memory store used by tests and the JSON backend
//! - [`jsonfile`] - JSON document loaded from disk
//! - [`postgresql`] - PostgreSQL tables
//!
//! # Design Pattern
//!
//! Adapters isolate the storage technology from the export. The export only
//! sees the trait, so tests run against [`memory::InMemoryStore`]:
//!
//! ```rust
//! use rowpack::adapters::memory::InMemoryStore;
//! use rowpack::adapters::store::RecordStore;
//! use rowpack::domain::{Attribute, EntityDescriptor, EntityName, EntityRegistry, Filter, Record};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let user = EntityName::new("User")?;
//! let registry = EntityRegistry::new().with(EntityDescriptor::new(
//!     user.clone(),
//!     vec![Attribute::new("id"), Attribute::new("fullName")],
//! ));
//! let store = InMemoryStore::new(registry)
//!     .with_records([Record::new(user.clone()).with("id", 2).with("fullName", "Alice")])?;
//!
//! let alice = store.find_one(&Filter::all(user).with("id", 2))?;
//! assert!(alice.is_some());
//! # Ok(())
//! # }
//! ```

pub mod jsonfile;
pub mod memory;
pub mod postgresql;
pub mod store;

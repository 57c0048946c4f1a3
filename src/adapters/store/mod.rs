//! Record store abstraction layer
//!
//! The export reads records and appends diagnostics only through the
//! [`RecordStore`] trait; [`create_record_store`] picks the backend.

pub mod factory;
pub mod traits;

pub use factory::create_record_store;
pub use traits::RecordStore;

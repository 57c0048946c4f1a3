//! PostgreSQL integration
//!
//! Reads entity records from PostgreSQL tables and writes diagnostic
//! entries to a log table.

pub mod adapter;
pub mod client;
pub mod sql;

pub use adapter::PostgreSQLStore;
pub use client::PostgreSQLClient;

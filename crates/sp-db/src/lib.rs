//! sp-db - Database abstraction layer for sqlpatch
//!
//! This crate provides the `Database` trait and a DuckDB implementation.
//! Statement failures carry SQLSTATE and native codes so the patch engine
//! can tell already-applied changes from real errors.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::Database;

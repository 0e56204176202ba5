//! sp-sql - SQL script layer for sqlpatch
//!
//! This crate turns raw multi-statement patch scripts into individually
//! executable statements, honoring `DELIMITER` directives and placeholder
//! substitution, and recognizes DDL that needs special handling.

pub mod ddl;
pub mod delimiter;
pub mod splitter;

pub use ddl::{flatten_ddl_script, is_alter_ignore};
pub use delimiter::{DelimiterState, DEFAULT_DELIMITER};
pub use splitter::{split_statements, Placeholders, SplitOptions, Statement, Statements};

//! tm-db - History store layer for Tidemark
//!
//! This crate provides the `HistoryStore` trait that the migration
//! controller reads and writes applied-migration records through, its DuckDB
//! implementation, and the adapter that runs SQL-file migrations against a
//! DuckDB connection.

pub mod duckdb;
pub mod error;
pub mod sql;
pub mod traits;

pub use duckdb::DuckDbHistory;
pub use error::{DbError, DbResult};
pub use sql::{registry_from_sql, sql_migration};
pub use traits::HistoryStore;

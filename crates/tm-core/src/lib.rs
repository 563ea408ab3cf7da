//! tm-core - Core library for Tidemark
//!
//! This crate provides migration descriptors and records, the version-sorted
//! migration registry, the reconciliation engine that lines up applied
//! history against the registry, project configuration, and the SQL-file
//! migration loader. It has no database dependency: migrations are generic
//! over the handle type their procedures receive.

pub mod config;
pub mod error;
pub mod migration;
pub mod reconcile;
pub mod registry;
pub mod sql_migration;

pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use migration::{
    ApplyFn, Migration, MigrationRecord, ProcedureError, Version, BASELINE_NAME,
    BASELINE_VERSION,
};
pub use reconcile::{correlate, merge, Correlation, Step};
pub use registry::Registry;
pub use sql_migration::{load_sql_migrations, SqlMigration};

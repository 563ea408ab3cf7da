//! tm-migrate - Migration controller for Tidemark
//!
//! This crate drives a [`tm_db::HistoryStore`] towards a requested version
//! using a [`tm_core::Registry`]: applying pending migrations, reverting the
//! latest one, resetting to the baseline, and rewriting the recorded history
//! without touching the schema. Every operation reports the versions before
//! and after it ran, including when it stops part-way.

pub mod command;
pub mod error;
pub mod migrator;
pub mod status;

pub use command::Command;
pub use error::{Halted, MigrateError, MigrateResult, Transition, UsageError};
pub use migrator::Migrator;
pub use status::{Status, StatusEntry};

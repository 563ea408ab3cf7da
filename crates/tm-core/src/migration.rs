//! Migration descriptors and the persisted records that mirror them.
//!
//! A [`Migration`] is compiled into (or loaded by) the driving program and
//! carries the forward/backward procedures. A [`MigrationRecord`] is the row
//! the history store keeps once a migration has been applied.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Migration version. Ascending order is chronological order.
pub type Version = i64;

/// Version of the baseline migration that represents "nothing applied".
pub const BASELINE_VERSION: Version = 1;

/// Display name of the baseline migration.
pub const BASELINE_NAME: &str = "-";

/// Error returned by a forward or backward procedure.
pub type ProcedureError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A schema-change procedure run against the store handle `H`.
pub type ApplyFn<H> = Arc<dyn Fn(&H) -> Result<(), ProcedureError> + Send + Sync>;

/// A single schema-change unit: a version, a label, and its two procedures.
pub struct Migration<H> {
    /// Unique, totally ordered version.
    pub version: Version,
    /// Display label. Not required to be unique.
    pub name: String,
    forward: ApplyFn<H>,
    backward: ApplyFn<H>,
}

impl<H: 'static> Migration<H> {
    /// Create a migration from its forward and backward procedures.
    pub fn new<F, B>(version: Version, name: impl Into<String>, forward: F, backward: B) -> Self
    where
        F: Fn(&H) -> Result<(), ProcedureError> + Send + Sync + 'static,
        B: Fn(&H) -> Result<(), ProcedureError> + Send + Sync + 'static,
    {
        Self {
            version,
            name: name.into(),
            forward: Arc::new(forward),
            backward: Arc::new(backward),
        }
    }

    /// Create a migration that only moves forward; its backward step is a no-op.
    pub fn forward_only<F>(version: Version, name: impl Into<String>, forward: F) -> Self
    where
        F: Fn(&H) -> Result<(), ProcedureError> + Send + Sync + 'static,
    {
        Self::new(version, name, forward, noop)
    }

    /// The baseline migration injected into every registry.
    pub fn baseline() -> Self {
        Self::new(BASELINE_VERSION, BASELINE_NAME, noop, noop)
    }
}

impl<H> Migration<H> {
    /// Whether this is the baseline migration.
    pub fn is_baseline(&self) -> bool {
        self.version == BASELINE_VERSION
    }

    /// Run the forward procedure.
    pub fn apply(&self, handle: &H) -> Result<(), ProcedureError> {
        (self.forward)(handle)
    }

    /// Run the backward procedure.
    pub fn revert(&self, handle: &H) -> Result<(), ProcedureError> {
        (self.backward)(handle)
    }

    /// The record that marks this migration as applied.
    pub fn record(&self) -> MigrationRecord {
        MigrationRecord::new(self.version, self.name.clone())
    }
}

impl<H> Clone for Migration<H> {
    fn clone(&self) -> Self {
        Self {
            version: self.version,
            name: self.name.clone(),
            forward: Arc::clone(&self.forward),
            backward: Arc::clone(&self.backward),
        }
    }
}

impl<H> fmt::Debug for Migration<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Migration")
            .field("version", &self.version)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<H> fmt::Display for Migration<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.version, self.name)
    }
}

fn noop<H>(_: &H) -> Result<(), ProcedureError> {
    Ok(())
}

/// A row of the history store: "this version has been applied".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MigrationRecord {
    /// Version of the applied migration
    pub version: Version,
    /// Name of the migration at the time it was applied
    pub name: String,
}

impl MigrationRecord {
    /// Create a record
    pub fn new(version: Version, name: impl Into<String>) -> Self {
        Self {
            version,
            name: name.into(),
        }
    }

    /// The record of the baseline migration.
    pub fn baseline() -> Self {
        Self::new(BASELINE_VERSION, BASELINE_NAME)
    }

    /// Whether this records the baseline migration.
    pub fn is_baseline(&self) -> bool {
        self.version == BASELINE_VERSION
    }
}

impl fmt::Display for MigrationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.version, self.name)
    }
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;

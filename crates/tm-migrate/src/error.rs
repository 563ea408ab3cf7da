//! Error types for the migration controller.

use std::fmt;
use thiserror::Error;
use tm_core::{ProcedureError, Version};
use tm_db::DbError;

/// Why a controller operation stopped.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// The history store failed
    #[error(transparent)]
    Store(#[from] DbError),

    /// A forward procedure failed (M001)
    #[error("[M001] Migration {version} ({name}) failed: {source}")]
    Forward {
        version: Version,
        name: String,
        #[source]
        source: ProcedureError,
    },

    /// A backward procedure failed (M002)
    #[error("[M002] Reverting migration {version} ({name}) failed: {source}")]
    Backward {
        version: Version,
        name: String,
        #[source]
        source: ProcedureError,
    },

    /// The requested version is not registered (M003)
    #[error("[M003] Target version {0} is not a registered migration")]
    VersionNotFound(Version),

    /// A recorded version has no registered migration (M004)
    #[error("[M004] Recorded migration {version} ({name}) is not registered; the migration set has diverged from the applied history")]
    MissingMigration { version: Version, name: String },

    /// The command line could not be interpreted
    #[error(transparent)]
    Usage(#[from] UsageError),
}

/// Command-line usage errors, detected before the store is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// No command given (U001)
    #[error("[U001] A command is required: init, up, down, reset, version, set_version")]
    CommandRequired,

    /// Unknown command (U002)
    #[error("[U002] Unexpected command '{0}'")]
    UnexpectedCommand(String),

    /// Missing required version argument (U003)
    #[error("[U003] A version number is required")]
    VersionRequired,

    /// Non-numeric version argument (U004)
    #[error("[U004] Invalid version argument '{0}': expected an integer")]
    InvalidVersion(String),
}

/// The versions before and after a controller operation.
///
/// `0` stands for "no record was read".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct Transition {
    /// Version before the operation
    pub old_version: Version,
    /// Version reached
    pub new_version: Version,
}

impl Transition {
    /// A transition that has not moved from `version`.
    pub fn at(version: Version) -> Self {
        Self {
            old_version: version,
            new_version: version,
        }
    }

    /// Whether the version changed.
    pub fn changed(&self) -> bool {
        self.old_version != self.new_version
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.old_version, self.new_version)
    }
}

/// A failed operation together with the versions it reached.
///
/// Steps completed before the failure are not rolled back, so
/// `transition.new_version` is the version the store is left at.
#[derive(Error, Debug)]
#[error("migration halted at version {}", .transition.new_version)]
pub struct Halted {
    /// Versions before the operation and at the point it stopped
    pub transition: Transition,
    /// The failure
    #[source]
    pub source: MigrateError,
}

/// Result type alias for controller operations
pub type MigrateResult<T> = Result<T, Halted>;

/// Attach the transition reached so far to an error.
pub(crate) trait HaltAt<T> {
    fn halt_at(self, transition: Transition) -> MigrateResult<T>;
}

impl<T, E: Into<MigrateError>> HaltAt<T> for Result<T, E> {
    fn halt_at(self, transition: Transition) -> MigrateResult<T> {
        self.map_err(|e| Halted {
            transition,
            source: e.into(),
        })
    }
}

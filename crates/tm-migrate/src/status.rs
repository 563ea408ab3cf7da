//! Applied-versus-registered overview of the history.

use serde::Serialize;
use tm_core::{MigrationRecord, Version};

/// One row of a [`Status`] report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    pub version: Version,
    pub name: String,
    /// Recorded in the history store
    pub applied: bool,
    /// Known to the registry
    pub registered: bool,
}

/// Every registered or recorded version, ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    /// Highest recorded version
    pub current: Option<Version>,
    /// Most recently inserted record
    pub last_applied: Option<MigrationRecord>,
    pub entries: Vec<StatusEntry>,
}

impl Status {
    /// Registered migrations not yet applied
    pub fn pending(&self) -> impl Iterator<Item = &StatusEntry> {
        self.entries.iter().filter(|e| !e.applied)
    }

    /// Recorded versions the registry no longer knows about
    pub fn unknown(&self) -> impl Iterator<Item = &StatusEntry> {
        self.entries.iter().filter(|e| !e.registered)
    }

    /// Whether the applied history is a prefix of the registry
    pub fn is_consistent(&self) -> bool {
        self.unknown().next().is_none()
            && self
                .entries
                .iter()
                .skip_while(|e| e.applied)
                .all(|e| !e.applied)
    }
}

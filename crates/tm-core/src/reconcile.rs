//! Reconciliation of applied history against the registry.
//!
//! Both functions walk two version-sorted sequences with a cursor each. They
//! are pure: nothing here reads or writes the history store.
//!
//! - [`merge`] produces every version to consider for forward application,
//!   tagging each as already applied or pending.
//! - [`correlate`] maps applied records back onto registry migrations so they
//!   can be reversed, and reports the first record with no migration.

use std::cmp::Ordering;
use std::fmt;

use crate::migration::{Migration, MigrationRecord, Version};

/// One entry of a merged sequence.
pub enum Step<'a, H> {
    /// Registered but not yet applied.
    Pending(&'a Migration<H>),
    /// Present in the history store.
    Applied(&'a MigrationRecord),
}

impl<'a, H> Step<'a, H> {
    /// Version of this step.
    pub fn version(&self) -> Version {
        match *self {
            Step::Pending(migration) => migration.version,
            Step::Applied(record) => record.version,
        }
    }

    /// Name of this step.
    pub fn name(&self) -> &'a str {
        match *self {
            Step::Pending(migration) => &migration.name,
            Step::Applied(record) => &record.name,
        }
    }

    /// Whether the step is already recorded.
    pub fn is_applied(&self) -> bool {
        matches!(self, Step::Applied(_))
    }

    /// The migration to run, if the step is pending.
    pub fn pending(&self) -> Option<&'a Migration<H>> {
        match *self {
            Step::Pending(migration) => Some(migration),
            Step::Applied(_) => None,
        }
    }
}

impl<H> Clone for Step<'_, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H> Copy for Step<'_, H> {}

impl<H> fmt::Debug for Step<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Pending(migration) => f.debug_tuple("Pending").field(migration).finish(),
            Step::Applied(record) => f.debug_tuple("Applied").field(record).finish(),
        }
    }
}

/// Merge applied records with registry migrations into one ascending sequence.
///
/// Registry migrations above `target` are left out; `None` means no bound.
/// Applied records are never bounded. A version present on both sides yields
/// a single [`Step::Applied`].
pub fn merge<'a, H>(
    applied: &'a [MigrationRecord],
    registry: &'a [Migration<H>],
    target: Option<Version>,
) -> Vec<Step<'a, H>> {
    let in_bound = |migration: &Migration<H>| target.map_or(true, |t| migration.version <= t);

    let mut merged = Vec::with_capacity(applied.len() + registry.len());
    let (mut i, mut j) = (0, 0);

    while i < applied.len() && j < registry.len() && in_bound(&registry[j]) {
        let record = &applied[i];
        let migration = &registry[j];
        match record.version.cmp(&migration.version) {
            Ordering::Equal => {
                merged.push(Step::Applied(record));
                i += 1;
                j += 1;
            }
            Ordering::Less => {
                merged.push(Step::Applied(record));
                i += 1;
            }
            Ordering::Greater => {
                merged.push(Step::Pending(migration));
                j += 1;
            }
        }
    }

    merged.extend(applied[i..].iter().map(Step::Applied));
    merged.extend(
        registry[j..]
            .iter()
            .take_while(|&m| in_bound(m))
            .map(Step::Pending),
    );
    merged
}

/// Applied records resolved to their registry migrations.
pub struct Correlation<'a, H> {
    /// Registry migrations matching the applied records, ascending.
    pub migrations: Vec<&'a Migration<H>>,
    /// The first applied record with no registry migration, if any.
    pub missing: Option<&'a MigrationRecord>,
}

impl<H> Correlation<'_, H> {
    /// Whether every applied record found its migration.
    pub fn is_complete(&self) -> bool {
        self.missing.is_none()
    }
}

impl<H> fmt::Debug for Correlation<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Correlation")
            .field("migrations", &self.migrations)
            .field("missing", &self.missing)
            .finish()
    }
}

/// Resolve every applied record to the registry migration with its version.
///
/// Registry migrations that were never applied are skipped. Resolution stops
/// at the first applied record with no migration; the migrations resolved up
/// to that point are still returned.
pub fn correlate<'a, H>(
    applied: &'a [MigrationRecord],
    registry: &'a [Migration<H>],
) -> Correlation<'a, H> {
    let mut migrations = Vec::with_capacity(applied.len());
    let (mut i, mut j) = (0, 0);

    while i < applied.len() && j < registry.len() {
        let record = &applied[i];
        let migration = &registry[j];
        match record.version.cmp(&migration.version) {
            Ordering::Equal => {
                migrations.push(migration);
                i += 1;
                j += 1;
            }
            Ordering::Less => {
                return Correlation {
                    migrations,
                    missing: Some(record),
                };
            }
            Ordering::Greater => j += 1,
        }
    }

    Correlation {
        migrations,
        missing: applied.get(i),
    }
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod tests;

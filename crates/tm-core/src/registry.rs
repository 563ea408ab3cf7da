//! The migration registry: every migration known to the running program.
//!
//! A [`Registry`] owns its descriptors, always contains the baseline
//! migration, and is sorted ascending by version. It is built once and never
//! mutated afterwards.

use crate::error::{CoreError, CoreResult};
use crate::migration::{Migration, MigrationRecord, Version, BASELINE_VERSION};

/// Immutable, version-sorted list of migrations including the baseline.
pub struct Registry<H> {
    migrations: Vec<Migration<H>>,
}

impl<H> Clone for Registry<H> {
    fn clone(&self) -> Self {
        Self {
            migrations: self.migrations.clone(),
        }
    }
}

impl<H> std::fmt::Debug for Registry<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(&self.migrations).finish()
    }
}

impl<H: 'static> Registry<H> {
    /// Build a registry from the caller's migrations.
    ///
    /// The baseline is injected and the result sorted by version. Versions at
    /// or below the baseline and duplicate versions are rejected.
    pub fn new(migrations: Vec<Migration<H>>) -> CoreResult<Self> {
        if let Some(reserved) = migrations.iter().find(|m| m.version <= BASELINE_VERSION) {
            return Err(CoreError::ReservedVersion {
                version: reserved.version,
                name: reserved.name.clone(),
            });
        }

        let mut all = Vec::with_capacity(migrations.len() + 1);
        all.push(Migration::baseline());
        all.extend(migrations);
        all.sort_by_key(|m| m.version);

        if let Some(pair) = all.windows(2).find(|w| w[0].version == w[1].version) {
            return Err(CoreError::DuplicateVersion {
                version: pair[0].version,
                first: pair[0].name.clone(),
                second: pair[1].name.clone(),
            });
        }

        log::debug!(
            "Registry built with {} migrations (latest v{})",
            all.len(),
            all.last().map_or(BASELINE_VERSION, |m| m.version)
        );
        Ok(Self { migrations: all })
    }

    /// A registry holding only the baseline.
    pub fn baseline_only() -> Self {
        Self {
            migrations: vec![Migration::baseline()],
        }
    }
}

impl<H> Registry<H> {
    /// All migrations, ascending by version.
    pub fn migrations(&self) -> &[Migration<H>] {
        &self.migrations
    }

    /// Iterate migrations ascending by version.
    pub fn iter(&self) -> std::slice::Iter<'_, Migration<H>> {
        self.migrations.iter()
    }

    /// Number of migrations, baseline included.
    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    /// Whether the registry holds no migrations. A registry built through
    /// [`Registry::new`] or [`Registry::baseline_only`] holds the baseline, so
    /// this is false for every constructed registry.
    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    /// Migration at `index` in version order.
    pub fn get(&self, index: usize) -> Option<&Migration<H>> {
        self.migrations.get(index)
    }

    /// Index of the migration with exactly `version`.
    pub fn position(&self, version: Version) -> Option<usize> {
        self.migrations
            .binary_search_by_key(&version, |m| m.version)
            .ok()
    }

    /// Migration with exactly `version`.
    pub fn find(&self, version: Version) -> Option<&Migration<H>> {
        self.position(version).map(|i| &self.migrations[i])
    }

    /// Whether a migration with `version` is registered.
    pub fn contains(&self, version: Version) -> bool {
        self.position(version).is_some()
    }

    /// The highest registered version.
    pub fn latest_version(&self) -> Version {
        self.migrations
            .last()
            .map_or(BASELINE_VERSION, |m| m.version)
    }

    /// Migrations from the baseline through `version` inclusive, or `None`
    /// if `version` is not registered.
    pub fn through(&self, version: Version) -> Option<&[Migration<H>]> {
        self.position(version).map(|i| &self.migrations[..=i])
    }

    /// Records for every migration from the baseline through `version`.
    pub fn records_through(&self, version: Version) -> Option<Vec<MigrationRecord>> {
        self.through(version)
            .map(|prefix| prefix.iter().map(Migration::record).collect())
    }
}

impl<'a, H> IntoIterator for &'a Registry<H> {
    type Item = &'a Migration<H>;
    type IntoIter = std::slice::Iter<'a, Migration<H>>;

    fn into_iter(self) -> Self::IntoIter {
        self.migrations.iter()
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;

//! The migration controller.
//!
//! Every operation reads the history store, reconciles it with the registry,
//! runs procedures in the resulting order, and writes the outcome back one
//! step at a time. Each step (procedure plus record write) runs in its own
//! store transaction; steps already committed are kept when a later step
//! fails.

use crate::command::Command;
use crate::error::{HaltAt, MigrateError, MigrateResult, Transition};
use crate::status::{Status, StatusEntry};
use tm_core::{correlate, merge, MigrationRecord, Registry, Step, Version, BASELINE_VERSION};
use tm_db::{DbError, HistoryStore};

/// Drives a history store towards a requested version.
pub struct Migrator<'a, S: HistoryStore> {
    store: &'a S,
    registry: &'a Registry<S::Handle>,
}

impl<'a, S: HistoryStore> Migrator<'a, S> {
    /// Bind a store and the registry of known migrations
    pub fn new(store: &'a S, registry: &'a Registry<S::Handle>) -> Self {
        Self { store, registry }
    }

    /// The history store
    pub fn store(&self) -> &'a S {
        self.store
    }

    /// The registry of known migrations
    pub fn registry(&self) -> &'a Registry<S::Handle> {
        self.registry
    }

    /// Parse `args` (without the program name) and run the command.
    pub fn run_args<I, A>(&self, args: I) -> MigrateResult<Transition>
    where
        I: IntoIterator<Item = A>,
        A: AsRef<str>,
    {
        let command = Command::parse(args).halt_at(Transition::default())?;
        self.run(command)
    }

    /// Run a parsed command
    pub fn run(&self, command: Command) -> MigrateResult<Transition> {
        log::debug!("Running '{command}' against {} store", self.store.store_type());
        match command {
            Command::Init => self.init(),
            Command::Up(target) => self.up(target),
            Command::Down => self.down(),
            Command::Reset => self.reset(),
            Command::Version => self.version(),
            Command::SetVersion(target) => self.set_version(target),
        }
    }

    /// Create the history table and record the baseline.
    pub fn init(&self) -> MigrateResult<Transition> {
        self.store
            .transaction(|store| -> Result<(), MigrateError> {
                store.create_table()?;
                store.insert_one(&MigrationRecord::baseline())?;
                Ok(())
            })
            .halt_at(Transition::default())?;

        log::info!("Initialized migration history at version {BASELINE_VERSION}");
        Ok(Transition {
            old_version: 0,
            new_version: BASELINE_VERSION,
        })
    }

    /// Apply pending migrations in ascending order, up to `target` inclusive
    /// or all of them when `target` is `None`.
    ///
    /// Stops at the first failure. Migrations applied before it stay applied.
    pub fn up(&self, target: Option<Version>) -> MigrateResult<Transition> {
        let applied = self
            .store
            .find_all_ordered_by_version_asc()
            .halt_at(Transition::default())?;
        let mut transition = Transition::at(applied.last().map_or(0, |r| r.version));

        if let Some(target) = target {
            if !self.registry.contains(target) {
                log::warn!("Target version {target} is not registered; applying migrations below it");
            }
        }

        let merged = merge(&applied, self.registry.migrations(), target);
        for migration in merged.iter().filter_map(Step::pending) {
            log::debug!("Applying migration {migration}");
            self.store
                .transaction(|store| -> Result<(), MigrateError> {
                    migration
                        .apply(store.handle())
                        .map_err(|source| MigrateError::Forward {
                            version: migration.version,
                            name: migration.name.clone(),
                            source,
                        })?;
                    store.insert_one(&migration.record())?;
                    Ok(())
                })
                .halt_at(transition)?;
            transition.new_version = migration.version;
            log::info!("Applied migration {migration}");
        }

        Ok(transition)
    }

    /// Revert the migration with the highest recorded version.
    ///
    /// The baseline is never reverted: at the baseline this is a no-op.
    pub fn down(&self) -> MigrateResult<Transition> {
        let latest = self
            .store
            .find_latest_by_version()
            .halt_at(Transition::default())?;
        let mut transition = Transition::at(latest.version);

        let index = self
            .registry
            .position(latest.version)
            .ok_or_else(|| MigrateError::MissingMigration {
                version: latest.version,
                name: latest.name.clone(),
            })
            .halt_at(transition)?;

        let migrations = self.registry.migrations();
        if index == 0 {
            log::info!("Already at the baseline; nothing to revert");
            return Ok(transition);
        }
        let migration = &migrations[index];

        log::debug!("Reverting migration {migration}");
        self.store
            .transaction(|store| -> Result<(), MigrateError> {
                migration
                    .revert(store.handle())
                    .map_err(|source| MigrateError::Backward {
                        version: migration.version,
                        name: migration.name.clone(),
                        source,
                    })?;
                store.delete_one(&latest)?;
                Ok(())
            })
            .halt_at(transition)?;

        transition.new_version = migrations[index - 1].version;
        log::info!("Reverted migration {migration}");
        Ok(transition)
    }

    /// Revert every applied migration, newest first, keeping the baseline
    /// record.
    ///
    /// Refuses to start if any recorded version is not registered. A failing
    /// backward procedure stops the reset part-way.
    pub fn reset(&self) -> MigrateResult<Transition> {
        let applied = self
            .store
            .find_all_ordered_by_version_asc()
            .halt_at(Transition::default())?;
        let mut transition = Transition::at(applied.last().map_or(0, |r| r.version));

        let correlation = correlate(&applied, self.registry.migrations());
        if let Some(missing) = correlation.missing {
            return Err(MigrateError::MissingMigration {
                version: missing.version,
                name: missing.name.clone(),
            })
            .halt_at(transition);
        }

        let migrations = &correlation.migrations;
        for (i, migration) in migrations.iter().enumerate().rev() {
            log::debug!("Reverting migration {migration}");
            self.store
                .transaction(|store| -> Result<(), MigrateError> {
                    migration
                        .revert(store.handle())
                        .map_err(|source| MigrateError::Backward {
                            version: migration.version,
                            name: migration.name.clone(),
                            source,
                        })?;
                    if !migration.is_baseline() {
                        store.delete_one(&migration.record())?;
                    }
                    Ok(())
                })
                .halt_at(transition)?;

            transition.new_version = match i {
                0 => migration.version,
                _ => migrations[i - 1].version,
            };
        }

        log::info!("Reset migration history to version {}", transition.new_version);
        Ok(transition)
    }

    /// The highest recorded version.
    pub fn version(&self) -> MigrateResult<Transition> {
        let latest = self
            .store
            .find_latest_by_version()
            .halt_at(Transition::default())?;
        Ok(Transition::at(latest.version))
    }

    /// Rewrite the history so that exactly the baseline through `target` are
    /// recorded. No procedure runs: the caller asserts the schema already
    /// matches `target`.
    pub fn set_version(&self, target: Version) -> MigrateResult<Transition> {
        let mut transition = self.version()?;

        let records = self
            .registry
            .records_through(target)
            .ok_or(MigrateError::VersionNotFound(target))
            .halt_at(transition)?;

        self.store
            .transaction(|store| -> Result<(), MigrateError> {
                store.delete_all()?;
                store.insert_many(&records)?;
                Ok(())
            })
            .halt_at(transition)?;

        transition.new_version = target;
        log::info!("Set migration history to version {target}");
        Ok(transition)
    }

    /// Every registered or recorded version with its applied state.
    pub fn status(&self) -> MigrateResult<Status> {
        let applied = self
            .store
            .find_all_ordered_by_version_asc()
            .halt_at(Transition::default())?;
        let last_applied = match self.store.find_last_inserted() {
            Ok(record) => Some(record),
            Err(DbError::NoRecords(_)) => None,
            Err(e) => return Err(e).halt_at(Transition::default()),
        };

        let entries = merge(&applied, self.registry.migrations(), None)
            .iter()
            .map(|step| StatusEntry {
                version: step.version(),
                name: step.name().to_string(),
                applied: step.is_applied(),
                registered: self.registry.contains(step.version()),
            })
            .collect();

        Ok(Status {
            current: applied.last().map(|r| r.version),
            last_applied,
            entries,
        })
    }
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;

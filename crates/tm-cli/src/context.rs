//! Runtime context for CLI commands

use anyhow::{Context, Result};
use duckdb::Connection;
use std::path::{Path, PathBuf};
use tm_core::config::resolve_database_path;
use tm_core::{load_sql_migrations, Config, Registry};
use tm_db::{registry_from_sql, DuckDbHistory};
use tm_migrate::Migrator;

use crate::cli::GlobalArgs;

/// History store and migration registry for the selected project
pub(crate) struct RuntimeContext {
    /// History store
    pub store: DuckDbHistory,

    /// Migrations loaded from the migrations directory
    pub registry: Registry<Connection>,
}

impl RuntimeContext {
    /// Create a new runtime context from global arguments
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        let root = PathBuf::from(&args.project_dir);

        let config = match &args.config {
            Some(config_path) => {
                Config::load(Path::new(config_path)).context("Failed to load configuration file")?
            }
            None => Config::load_from_dir(&root).context("Failed to load project configuration")?,
        };

        let db_path = match &args.database {
            Some(path) => resolve_database_path(path, &root),
            None => config.database_path(&root),
        };
        log::debug!("Using database {db_path}, history table {}", config.history_table);

        let store = DuckDbHistory::new(&db_path, &config.history_table)
            .with_context(|| format!("Failed to open database: {db_path}"))?;

        let migrations_dir = config.migrations_path_absolute(&root);
        let migrations = load_sql_migrations(&migrations_dir).with_context(|| {
            format!("Failed to load migrations from {}", migrations_dir.display())
        })?;
        log::debug!(
            "Loaded {} migrations from {}",
            migrations.len(),
            migrations_dir.display()
        );
        let registry = registry_from_sql(migrations).context("Invalid migration set")?;

        Ok(Self { store, registry })
    }

    /// A migrator over this context's store and registry
    pub fn migrator(&self) -> Migrator<'_, DuckDbHistory> {
        Migrator::new(&self.store, &self.registry)
    }
}

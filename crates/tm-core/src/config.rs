//! Configuration types and parsing for tidemark.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Default name of the history table.
pub const DEFAULT_HISTORY_TABLE: &str = "migrations";

/// Path value that selects an in-memory DuckDB database.
pub const IN_MEMORY: &str = ":memory:";

/// Project configuration from tidemark.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Table that records applied migrations (optionally schema-qualified)
    #[serde(default = "default_history_table")]
    pub history_table: String,

    /// Directory containing `<version>_<name>.up.sql` / `.down.sql` files
    #[serde(default = "default_migrations_path")]
    pub migrations_path: String,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// DuckDB file path, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            history_table: default_history_table(),
            migrations_path: default_migrations_path(),
        }
    }
}

fn default_db_path() -> String {
    "tidemark.duckdb".to_string()
}

fn default_history_table() -> String {
    DEFAULT_HISTORY_TABLE.to_string()
}

fn default_migrations_path() -> String {
    "migrations".to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    ///
    /// Looks for tidemark.yml or tidemark.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("tidemark.yml");
        let yaml_path = dir.join("tidemark.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    fn validate(&self) -> CoreResult<()> {
        if !is_valid_table_name(&self.history_table) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "history_table '{}' must be an identifier, optionally schema-qualified (schema.table)",
                    self.history_table
                ),
            });
        }

        if self.database.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }

        if self.migrations_path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migrations_path cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Migrations directory resolved against the project root
    pub fn migrations_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.migrations_path)
    }

    /// Database path resolved against the project root.
    ///
    /// `:memory:` is returned unchanged.
    pub fn database_path(&self, root: &Path) -> String {
        resolve_database_path(&self.database.path, root)
    }
}

/// Resolve a DuckDB path against `root`, leaving `:memory:` and absolute
/// paths untouched.
pub fn resolve_database_path(path: &str, root: &Path) -> String {
    if path == IN_MEMORY || Path::new(path).is_absolute() {
        path.to_string()
    } else {
        root.join(path).display().to_string()
    }
}

/// Whether `name` is usable as a history table name: a SQL identifier,
/// optionally qualified with a schema.
pub fn is_valid_table_name(name: &str) -> bool {
    static TABLE_NAME: OnceLock<regex::Regex> = OnceLock::new();
    TABLE_NAME
        .get_or_init(|| {
            regex::Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
                .expect("valid regex literal")
        })
        .is_match(name)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

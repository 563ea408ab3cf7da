//! Loading SQL-file migrations from a directory.
//!
//! Migrations are named `<version>_<name>.up.sql` with an optional
//! `<version>_<name>.down.sql`. A missing down file means the migration
//! cannot be undone and reverting it is a no-op.
//!
//! Each file runs inside the transaction that also records it in the
//! history table, so a file must not issue its own `BEGIN`, `COMMIT`,
//! `ROLLBACK`, or `START TRANSACTION`. Files that do are rejected at load
//! time.

use crate::error::{CoreError, CoreResult};
use crate::migration::Version;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// A migration read from SQL files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlMigration {
    /// Version parsed from the filename prefix
    pub version: Version,
    /// Name parsed from the filename
    pub name: String,
    /// Forward SQL
    pub up_sql: String,
    /// Backward SQL, if a down file exists
    pub down_sql: Option<String>,
    /// Path of the up file
    pub path: PathBuf,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

struct ParsedName {
    version: Version,
    name: String,
    direction: Direction,
}

#[derive(Default)]
struct FilePair {
    up: Option<(String, PathBuf)>,
    down: Option<(String, PathBuf)>,
}

fn parse_file_name(path: &Path, file_name: &str) -> CoreResult<ParsedName> {
    static FILE_NAME: OnceLock<regex::Regex> = OnceLock::new();
    let pattern = FILE_NAME.get_or_init(|| {
        regex::Regex::new(r"^(\d+)_([A-Za-z0-9_\-]+)\.(up|down)\.sql$")
            .expect("valid regex literal")
    });

    let invalid = |reason: String| CoreError::InvalidMigrationFile {
        path: path.display().to_string(),
        reason,
    };

    let caps = pattern.captures(file_name).ok_or_else(|| {
        invalid("expected <version>_<name>.up.sql or <version>_<name>.down.sql".to_string())
    })?;

    let version = caps[1]
        .parse::<Version>()
        .map_err(|e| invalid(format!("version '{}' is not a valid integer: {e}", &caps[1])))?;
    let direction = if &caps[3] == "up" {
        Direction::Up
    } else {
        Direction::Down
    };

    Ok(ParsedName {
        version,
        name: caps[2].to_string(),
        direction,
    })
}

/// Whether `sql` has a statement that opens or closes a transaction.
///
/// Only statement starts at the beginning of a line are recognized.
fn controls_transaction(sql: &str) -> bool {
    static TRANSACTION_CONTROL: OnceLock<regex::Regex> = OnceLock::new();
    TRANSACTION_CONTROL
        .get_or_init(|| {
            regex::Regex::new(
                r"(?im)^[ \t]*(BEGIN|START[ \t]+TRANSACTION|COMMIT|ROLLBACK|END[ \t]+TRANSACTION)\b",
            )
            .expect("valid regex literal")
        })
        .is_match(sql)
}

/// Load SQL migrations from `dir`, sorted ascending by version.
///
/// A missing directory yields no migrations. Files that do not end in `.sql`
/// are ignored; `.sql` files that do not follow the naming scheme are errors.
pub fn load_sql_migrations(dir: &Path) -> CoreResult<Vec<SqlMigration>> {
    if !dir.exists() {
        log::debug!("Migrations directory does not exist: {}", dir.display());
        return Ok(Vec::new());
    }

    let io_err = |path: &Path, e: std::io::Error| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    };

    let mut pairs: BTreeMap<Version, (String, FilePair)> = BTreeMap::new();

    for entry in std::fs::read_dir(dir).map_err(|e| io_err(dir, e))? {
        let path = entry.map_err(|e| io_err(dir, e))?.path();
        if !path.is_file() || path.extension().map_or(true, |ext| ext != "sql") {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let parsed = parse_file_name(&path, file_name)?;
        let sql = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        if controls_transaction(&sql) {
            return Err(CoreError::InvalidMigrationFile {
                path: path.display().to_string(),
                reason: "migrations run inside a transaction and must not contain BEGIN, COMMIT, ROLLBACK or START TRANSACTION".to_string(),
            });
        }

        let (name, pair) = pairs
            .entry(parsed.version)
            .or_insert_with(|| (parsed.name.clone(), FilePair::default()));

        if *name != parsed.name {
            return Err(CoreError::DuplicateVersion {
                version: parsed.version,
                first: name.clone(),
                second: parsed.name,
            });
        }

        let slot = match parsed.direction {
            Direction::Up => &mut pair.up,
            Direction::Down => &mut pair.down,
        };
        if slot.is_some() {
            return Err(CoreError::InvalidMigrationFile {
                path: path.display().to_string(),
                reason: format!("version {} is defined more than once", parsed.version),
            });
        }
        *slot = Some((sql, path));
    }

    let mut migrations = Vec::with_capacity(pairs.len());
    for (version, (name, pair)) in pairs {
        let Some((up_sql, path)) = pair.up else {
            let down_path = pair.down.map(|(_, p)| p).unwrap_or_default();
            return Err(CoreError::InvalidMigrationFile {
                path: down_path.display().to_string(),
                reason: format!("down migration for version {version} has no matching up file"),
            });
        };
        migrations.push(SqlMigration {
            version,
            name,
            up_sql,
            down_sql: pair.down.map(|(sql, _)| sql),
            path,
        });
    }

    log::debug!(
        "Loaded {} SQL migrations from {}",
        migrations.len(),
        dir.display()
    );
    Ok(migrations)
}

#[cfg(test)]
#[path = "sql_migration_test.rs"]
mod tests;

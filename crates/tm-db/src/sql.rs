//! SQL-file migrations as executable DuckDB migrations.

use duckdb::Connection;
use tm_core::{CoreResult, Migration, ProcedureError, Registry, SqlMigration};

/// Turn a loaded SQL migration into a migration that runs its SQL with
/// `execute_batch`. A missing down file reverts as a no-op.
pub fn sql_migration(migration: SqlMigration) -> Migration<Connection> {
    let SqlMigration {
        version,
        name,
        up_sql,
        down_sql,
        path,
    } = migration;
    let label = path.display().to_string();

    let forward = {
        let label = label.clone();
        move |conn: &Connection| -> Result<(), ProcedureError> {
            conn.execute_batch(&up_sql)
                .map_err(|e| format!("{label}: {e}").into())
        }
    };

    match down_sql {
        Some(down_sql) => Migration::new(version, name, forward, move |conn: &Connection| {
            conn.execute_batch(&down_sql)
                .map_err(|e| -> ProcedureError { format!("{label} (down): {e}").into() })
        }),
        None => Migration::forward_only(version, name, forward),
    }
}

/// Build a DuckDB registry from loaded SQL migrations
pub fn registry_from_sql(migrations: Vec<SqlMigration>) -> CoreResult<Registry<Connection>> {
    Registry::new(migrations.into_iter().map(sql_migration).collect())
}

#[cfg(test)]
#[path = "sql_test.rs"]
mod tests;

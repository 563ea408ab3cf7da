//! DuckDB history store implementation

use crate::error::{DbError, DbResult};
use crate::traits::HistoryStore;
use duckdb::Connection;
use std::path::Path;
use tm_core::config::{is_valid_table_name, IN_MEMORY};
use tm_core::MigrationRecord;

/// History store backed by a table in a DuckDB database.
///
/// The same connection is handed to migration procedures, so a procedure and
/// the record write that follows it share one transaction.
pub struct DuckDbHistory {
    conn: Connection,
    table: String,
}

impl DuckDbHistory {
    /// Wrap an open connection, recording history in `table`
    pub fn from_connection(conn: Connection, table: &str) -> DbResult<Self> {
        if !is_valid_table_name(table) {
            return Err(DbError::InvalidTableName(table.to_string()));
        }
        Ok(Self {
            conn,
            table: table.to_string(),
        })
    }

    /// Create a new in-memory DuckDB database
    pub fn in_memory(table: &str) -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Self::from_connection(conn, table)
    }

    /// Open (or create) a DuckDB database file
    pub fn from_path(path: &Path, table: &str) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Self::from_connection(conn, table)
    }

    /// Open from a path string (handles :memory: special case)
    pub fn new(path: &str, table: &str) -> DbResult<Self> {
        if path == IN_MEMORY {
            Self::in_memory(table)
        } else {
            Self::from_path(Path::new(path), table)
        }
    }

    /// Borrow the underlying DuckDB connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Name of the history table
    pub fn table(&self) -> &str {
        &self.table
    }

    fn split_table(&self) -> (&str, &str) {
        match self.table.rfind('.') {
            Some(pos) => (&self.table[..pos], &self.table[pos + 1..]),
            None => ("main", self.table.as_str()),
        }
    }

    fn query_one(&self, order_by: &str) -> DbResult<MigrationRecord> {
        let sql = format!(
            "SELECT version, name FROM {} ORDER BY {} DESC LIMIT 1",
            self.table, order_by
        );
        self.conn
            .query_row(&sql, [], |row| {
                Ok(MigrationRecord::new(row.get(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|e| match e {
                duckdb::Error::QueryReturnedNoRows => DbError::NoRecords(self.table.clone()),
                other => DbError::from(other),
            })
    }
}

impl HistoryStore for DuckDbHistory {
    type Handle = Connection;

    fn handle(&self) -> &Connection {
        &self.conn
    }

    fn store_type(&self) -> &'static str {
        "duckdb"
    }

    fn table_exists(&self) -> DbResult<bool> {
        let (schema, table) = self.split_table();
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
            duckdb::params![schema, table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn create_table(&self) -> DbResult<()> {
        if self.table_exists()? {
            return Err(DbError::TableExists(self.table.clone()));
        }

        let (schema, _) = self.split_table();
        if schema != "main" {
            self.conn
                .execute_batch(&format!("CREATE SCHEMA IF NOT EXISTS {schema}"))?;
        }

        self.conn.execute_batch(&format!(
            "CREATE TABLE {} (
                 version     BIGINT NOT NULL,
                 name        VARCHAR NOT NULL,
                 applied_seq BIGINT NOT NULL,
                 applied_at  TIMESTAMP NOT NULL DEFAULT now()
             )",
            self.table
        ))?;
        log::debug!("Created history table {}", self.table);
        Ok(())
    }

    fn find_all_ordered_by_version_asc(&self) -> DbResult<Vec<MigrationRecord>> {
        let sql = format!("SELECT version, name FROM {} ORDER BY version ASC", self.table);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(MigrationRecord::new(row.get(0)?, row.get::<_, String>(1)?))
        })?;
        let records = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn find_latest_by_version(&self) -> DbResult<MigrationRecord> {
        self.query_one("version")
    }

    fn find_last_inserted(&self) -> DbResult<MigrationRecord> {
        self.query_one("applied_seq")
    }

    fn insert_one(&self, record: &MigrationRecord) -> DbResult<()> {
        self.insert_many(std::slice::from_ref(record))
    }

    fn insert_many(&self, records: &[MigrationRecord]) -> DbResult<()> {
        let sql = format!(
            "INSERT INTO {t} (version, name, applied_seq)
             SELECT CAST(? AS BIGINT), CAST(? AS VARCHAR), COALESCE(MAX(applied_seq), 0) + 1 FROM {t}",
            t = self.table
        );
        // Uniqueness is checked here rather than with a PRIMARY KEY: DuckDB
        // rejects re-inserting a key deleted earlier in the same transaction.
        let exists_sql = format!("SELECT COUNT(*) FROM {} WHERE version = ?", self.table);
        let mut exists = self.conn.prepare(&exists_sql)?;
        let mut insert = self.conn.prepare(&sql)?;
        for record in records {
            let count: i64 =
                exists.query_row(duckdb::params![record.version], |row| row.get(0))?;
            if count > 0 {
                return Err(DbError::DuplicateRecord(format!(
                    "version {} already recorded in {}",
                    record.version, self.table
                )));
            }
            insert.execute(duckdb::params![record.version, record.name])?;
        }
        Ok(())
    }

    fn delete_one(&self, record: &MigrationRecord) -> DbResult<()> {
        let sql = format!("DELETE FROM {} WHERE version = ?", self.table);
        let deleted = self.conn.execute(&sql, duckdb::params![record.version])?;
        if deleted == 0 {
            log::debug!("No history record with version {} to delete", record.version);
        }
        Ok(())
    }

    fn delete_all(&self) -> DbResult<()> {
        self.conn
            .execute_batch(&format!("DELETE FROM {}", self.table))?;
        Ok(())
    }

    fn begin(&self) -> DbResult<()> {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))
    }

    fn commit(&self) -> DbResult<()> {
        self.conn
            .execute_batch("COMMIT")
            .map_err(|e| DbError::TransactionError(format!("COMMIT failed: {e}")))
    }

    fn rollback(&self) -> DbResult<()> {
        self.conn
            .execute_batch("ROLLBACK")
            .map_err(|e| DbError::TransactionError(format!("ROLLBACK failed: {e}")))
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;

//! Error types for tm-db

use thiserror::Error;

/// History store errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Table not found (D003)
    #[error("[D003] Table or view not found: {0}")]
    TableNotFound(String),

    /// History table already exists (D004)
    #[error("[D004] History table already exists: {0}")]
    TableExists(String),

    /// History table is empty (D005)
    #[error("[D005] History table has no records: {0}")]
    NoRecords(String),

    /// A record with the same version is already stored (D006)
    #[error("[D006] Duplicate history record: {0}")]
    DuplicateRecord(String),

    /// Transaction management error (D007)
    #[error("[D007] Transaction failed: {0}")]
    TransactionError(String),

    /// Table name is not a valid identifier (D008)
    #[error("[D008] Invalid history table name: {0}")]
    InvalidTableName(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        // duckdb::Error does not expose structured variants for catalog
        // failures, so classify by message.
        let msg = err.to_string();
        if msg.contains("Table with name")
            || msg.contains("Table or view with name")
            || (msg.contains("Catalog Error") && msg.contains("Table") && msg.contains("not found"))
        {
            DbError::TableNotFound(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }
}

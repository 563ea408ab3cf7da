//! History store trait definition

use crate::error::{DbError, DbResult};
use tm_core::MigrationRecord;

/// Persistence for the records of applied migrations.
///
/// Stores are used from a single thread by a single driving process; no
/// locking is performed here.
pub trait HistoryStore {
    /// Handle passed to migration procedures
    type Handle;

    /// Borrow the handle migration procedures run against
    fn handle(&self) -> &Self::Handle;

    /// Store type identifier for logging
    fn store_type(&self) -> &'static str;

    /// Check whether the history table exists
    fn table_exists(&self) -> DbResult<bool>;

    /// Create the history table, failing if it already exists
    fn create_table(&self) -> DbResult<()>;

    /// All records, ascending by version
    fn find_all_ordered_by_version_asc(&self) -> DbResult<Vec<MigrationRecord>>;

    /// The record with the highest version
    fn find_latest_by_version(&self) -> DbResult<MigrationRecord>;

    /// The record inserted most recently, regardless of version
    fn find_last_inserted(&self) -> DbResult<MigrationRecord>;

    /// Insert a single record
    fn insert_one(&self, record: &MigrationRecord) -> DbResult<()>;

    /// Insert records in slice order
    fn insert_many(&self, records: &[MigrationRecord]) -> DbResult<()>;

    /// Delete the record with `record.version`
    fn delete_one(&self, record: &MigrationRecord) -> DbResult<()>;

    /// Delete every record
    fn delete_all(&self) -> DbResult<()>;

    /// Start a transaction
    fn begin(&self) -> DbResult<()>;

    /// Commit the open transaction
    fn commit(&self) -> DbResult<()>;

    /// Roll back the open transaction
    fn rollback(&self) -> DbResult<()>;

    /// Execute `body` within a transaction, committing on `Ok` and rolling
    /// back on `Err`.
    fn transaction<T, E, F>(&self, body: F) -> Result<T, E>
    where
        Self: Sized,
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<DbError>,
    {
        self.begin()?;

        let result = body(self);

        match &result {
            Ok(_) => {
                if let Err(commit_err) = self.commit() {
                    if let Err(e) = self.rollback() {
                        log::warn!("Rollback after failed commit also failed: {e}");
                    }
                    return Err(commit_err.into());
                }
            }
            Err(_) => {
                if let Err(e) = self.rollback() {
                    log::warn!("Rollback failed: {e}");
                }
            }
        }
        result
    }
}

use super::*;
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, sql: &str) {
    fs::write(dir.path().join(name), sql).unwrap();
}

#[test]
fn test_missing_dir_is_empty() {
    let migrations = load_sql_migrations(Path::new("/nonexistent/tidemark/migrations")).unwrap();
    assert!(migrations.is_empty());
}

#[test]
fn test_loads_pairs_sorted_by_version() {
    let dir = TempDir::new().unwrap();
    write(&dir, "10_add_index.up.sql", "CREATE INDEX idx ON users(id);");
    write(&dir, "2_add_users.up.sql", "CREATE TABLE users(id INT);");
    write(&dir, "2_add_users.down.sql", "DROP TABLE users;");

    let migrations = load_sql_migrations(dir.path()).unwrap();
    assert_eq!(migrations.len(), 2);

    assert_eq!(migrations[0].version, 2);
    assert_eq!(migrations[0].name, "add_users");
    assert_eq!(migrations[0].up_sql, "CREATE TABLE users(id INT);");
    assert_eq!(migrations[0].down_sql.as_deref(), Some("DROP TABLE users;"));
    assert!(migrations[0].path.ends_with("2_add_users.up.sql"));

    assert_eq!(migrations[1].version, 10);
    assert_eq!(migrations[1].down_sql, None);
}

#[test]
fn test_ignores_non_sql_files() {
    let dir = TempDir::new().unwrap();
    write(&dir, "2_a.up.sql", "SELECT 1;");
    write(&dir, "README.md", "docs");
    write(&dir, "2_a.up.sql.bak", "backup");
    fs::create_dir(dir.path().join("3_nested.up.sql")).unwrap();

    let migrations = load_sql_migrations(dir.path()).unwrap();
    assert_eq!(migrations.len(), 1);
}

#[test]
fn test_malformed_sql_file_name_rejected() {
    let dir = TempDir::new().unwrap();
    write(&dir, "add_users.sql", "SELECT 1;");
    let err = load_sql_migrations(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::InvalidMigrationFile { .. }));
}

#[test]
fn test_version_overflow_rejected() {
    let dir = TempDir::new().unwrap();
    write(&dir, "99999999999999999999_big.up.sql", "SELECT 1;");
    let err = load_sql_migrations(dir.path()).unwrap_err();
    assert!(err.to_string().contains("not a valid integer"));
}

#[test]
fn test_orphan_down_rejected() {
    let dir = TempDir::new().unwrap();
    write(&dir, "3_drop.down.sql", "SELECT 1;");
    let err = load_sql_migrations(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::InvalidMigrationFile { .. }));
    assert!(err.to_string().contains("no matching up file"));
}

#[test]
fn test_same_version_different_names_rejected() {
    let dir = TempDir::new().unwrap();
    write(&dir, "4_first.up.sql", "SELECT 1;");
    write(&dir, "4_second.up.sql", "SELECT 2;");
    let err = load_sql_migrations(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::DuplicateVersion { version: 4, .. }));
}

#[test]
fn test_same_version_padded_twice_rejected() {
    let dir = TempDir::new().unwrap();
    write(&dir, "5_x.up.sql", "SELECT 1;");
    write(&dir, "005_x.up.sql", "SELECT 2;");
    let err = load_sql_migrations(dir.path()).unwrap_err();
    assert!(err.to_string().contains("defined more than once"));
}

#[test]
fn test_transaction_control_rejected() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "2_tx.up.sql",
        "BEGIN;\nCREATE TABLE users(id INT);\nCOMMIT;\n",
    );
    let err = load_sql_migrations(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::InvalidMigrationFile { .. }));
    assert!(err.to_string().contains("2_tx.up.sql"));
    assert!(err.to_string().contains("must not contain BEGIN"));
}

#[test]
fn test_transaction_control_in_down_file_rejected() {
    let dir = TempDir::new().unwrap();
    write(&dir, "2_tx.up.sql", "CREATE TABLE users(id INT);");
    write(&dir, "2_tx.down.sql", "start transaction;\nDROP TABLE users;\nrollback;");
    let err = load_sql_migrations(dir.path()).unwrap_err();
    assert!(err.to_string().contains("2_tx.down.sql"));
}

#[test]
fn test_transaction_words_inside_identifiers_allowed() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "2_commits.up.sql",
        "CREATE TABLE commits (\n    begin_at TIMESTAMP,\n    committed BOOLEAN\n);",
    );
    let migrations = load_sql_migrations(dir.path()).unwrap();
    assert_eq!(migrations.len(), 1);
}

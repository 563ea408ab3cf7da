use super::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_parse_minimal_config() {
    let yaml = r#"
database:
  path: dev.duckdb
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.database.path, "dev.duckdb");
    assert_eq!(config.history_table, "migrations");
    assert_eq!(config.migrations_path, "migrations");
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
database:
  path: ":memory:"
history_table: meta.schema_history
migrations_path: db/migrations
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.database.path, IN_MEMORY);
    assert_eq!(config.history_table, "meta.schema_history");
    let root = PathBuf::from("/srv/app");
    assert_eq!(
        config.migrations_path_absolute(&root),
        root.join("db/migrations")
    );
    assert_eq!(config.database_path(&root), ":memory:");
}

#[test]
fn test_unknown_field_rejected() {
    let yaml = r#"
database:
  path: dev.duckdb
histroy_table: typo
"#;
    assert!(serde_yaml::from_str::<Config>(yaml).is_err());
}

#[test]
fn test_database_path_resolution() {
    let root = Path::new("/srv/app");
    assert_eq!(
        resolve_database_path("dev.duckdb", root),
        root.join("dev.duckdb").display().to_string()
    );
    assert_eq!(resolve_database_path("/var/db/x.duckdb", root), "/var/db/x.duckdb");
    assert_eq!(resolve_database_path(IN_MEMORY, root), IN_MEMORY);
}

#[test]
fn test_table_name_validation() {
    assert!(is_valid_table_name("migrations"));
    assert!(is_valid_table_name("_history2"));
    assert!(is_valid_table_name("meta.migrations"));
    assert!(!is_valid_table_name(""));
    assert!(!is_valid_table_name("2migrations"));
    assert!(!is_valid_table_name("a.b.c"));
    assert!(!is_valid_table_name("migrations; DROP TABLE users"));
    assert!(!is_valid_table_name("my-table"));
}

#[test]
fn test_load_from_dir() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("tidemark.yml"),
        "database:\n  path: app.duckdb\nhistory_table: applied\n",
    )
    .unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.history_table, "applied");
}

#[test]
fn test_load_from_dir_yaml_extension() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("tidemark.yaml"), "migrations_path: sql\n").unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.migrations_path, "sql");
    assert_eq!(config.database.path, "tidemark.duckdb");
}

#[test]
fn test_load_missing_config() {
    let dir = tempdir().unwrap();
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_invalid_table_name() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tidemark.yml");
    fs::write(&path, "history_table: \"bad name\"\n").unwrap();
    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}

#[test]
fn test_load_malformed_yaml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tidemark.yml");
    fs::write(&path, "database: [unclosed\n").unwrap();
    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::YamlParse(_)));
}

//! Fixtures shared by the integration tests

#![allow(dead_code)]

use std::path::Path;
use tempfile::TempDir;

use vgsales::db::Database;
use vgsales::schema::ALL_TABLES;
use vgsales::snapshot::export_tables;
use vgsales::ui::SilentUi;

/// Small hand-checked dataset, also used by the unit tests
pub const SAMPLE_DATA: &str = include_str!("../fixtures/sample_data.sql");

/// A database in a temp dir with the schema and the sample rows
pub fn sample_database(dir: &Path) -> Database {
    let db = Database::new(dir.join("sample.db"));
    db.init_schema(ALL_TABLES).expect("Failed to create schema");
    db.connect()
        .expect("Failed to open database")
        .execute_batch(SAMPLE_DATA)
        .expect("Failed to insert sample data");
    db
}

/// Export every table of `db` into a fresh snapshot directory
pub fn export_snapshot(db: &Database) -> TempDir {
    let dir = TempDir::new().expect("Failed to create snapshot dir");
    export_tables(db, dir.path(), ALL_TABLES, &mut SilentUi::new()).expect("Failed to export");
    dir
}

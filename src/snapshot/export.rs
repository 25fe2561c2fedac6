use anyhow::{Context, Result};
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

use crate::db::{Database, SqlValue};
use crate::schema::TableSchema;
use crate::ui::{Phase, Ui};

/// Outcome of checking one expected snapshot file
#[derive(Debug, Clone, PartialEq)]
pub struct FileCheck {
    pub table: &'static str,
    pub path: PathBuf,
    pub present: bool,
}

/// Dump whole tables to `<out_dir>/<table>.csv`, then verify the files exist
pub fn export_tables(
    db: &Database,
    out_dir: &Path,
    tables: &[&'static TableSchema],
    ui: &mut impl Ui,
) -> Result<u64> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create snapshot directory {:?}", out_dir))?;

    let conn = db.connect()?;
    let mut total_rows: u64 = 0;

    ui.set_phase(Phase::Exporting);
    for (idx, schema) in tables.iter().enumerate() {
        let path = out_dir.join(schema.snapshot_file());
        let rows = export_table(&conn, schema, &path)?;
        total_rows += rows;

        ui.set_progress(idx as u64 + 1, tables.len() as u64, schema.name);
        ui.log(format!("{}: {} rows -> {:?}", schema.name, rows, path));
        log::info!("Exported table {} to {:?} ({} rows)", schema.name, path, rows);
    }

    ui.set_phase(Phase::Verifying);
    for check in verify_files(out_dir, tables) {
        if check.present {
            ui.log(format!("{}: ok", check.table));
        } else {
            ui.log(format!("{}: missing at {:?}", check.table, check.path));
            log::warn!("Snapshot file for {} not found at {:?}", check.table, check.path);
        }
    }

    ui.set_phase(Phase::Complete);
    Ok(total_rows)
}

/// Write one table as CSV with a header row of the schema's columns
fn export_table(conn: &Connection, schema: &TableSchema, path: &Path) -> Result<u64> {
    let columns = schema.column_names();
    let sql = format!("SELECT {} FROM {}", columns.join(", "), schema.name);

    let mut stmt = conn
        .prepare(&sql)
        .with_context(|| format!("Failed to read table {}", schema.name))?;

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {:?}", path))?;
    writer.write_record(&columns)?;

    let mut rows = stmt.query([])?;
    let mut count: u64 = 0;
    let mut record: Vec<String> = Vec::with_capacity(columns.len());

    while let Some(row) = rows.next()? {
        record.clear();
        for idx in 0..columns.len() {
            record.push(SqlValue::from(row.get_ref(idx)?).to_field());
        }
        writer
            .write_record(&record)
            .with_context(|| format!("Failed to write row to {:?}", path))?;
        count += 1;
    }

    writer.flush().with_context(|| format!("Failed to flush {:?}", path))?;
    Ok(count)
}

/// Check that every table has its CSV file in `dir`
pub fn verify_files(dir: &Path, tables: &[&'static TableSchema]) -> Vec<FileCheck> {
    tables
        .iter()
        .map(|schema| {
            let path = dir.join(schema.snapshot_file());
            FileCheck {
                table: schema.name,
                present: path.is_file(),
                path,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::queries::tests::sample_db;
    use crate::schema::tables::{GAME, GENRE};
    use crate::schema::ALL_TABLES;
    use crate::ui::SilentUi;
    use tempfile::TempDir;

    #[test]
    fn test_export_writes_header_and_rows() {
        let (_db_dir, db) = sample_db();
        let out = TempDir::new().unwrap();

        let total = export_tables(&db, out.path(), &[&GENRE], &mut SilentUi::new()).unwrap();
        assert_eq!(total, 3);

        let contents = fs::read_to_string(out.path().join("genre.csv")).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines[0], "id,genre_name");
        assert_eq!(lines[1], "1,Action");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_export_null_is_empty_field() {
        let (_db_dir, db) = sample_db();
        db.connect()
            .unwrap()
            .execute("UPDATE game SET release_year = NULL WHERE id = 3", [])
            .unwrap();
        let out = TempDir::new().unwrap();

        export_tables(&db, out.path(), &[&GAME], &mut SilentUi::new()).unwrap();

        let contents = fs::read_to_string(out.path().join("game.csv")).unwrap();
        assert!(contents.contains("3,3,Kickoff,2,\n"));
    }

    #[test]
    fn test_verify_reports_missing_files() {
        let (_db_dir, db) = sample_db();
        let out = TempDir::new().unwrap();
        export_tables(&db, out.path(), &[&GENRE], &mut SilentUi::new()).unwrap();

        let checks = verify_files(out.path(), ALL_TABLES);
        let present: Vec<_> = checks.iter().filter(|c| c.present).map(|c| c.table).collect();
        assert_eq!(present, vec!["genre"]);
        assert_eq!(checks.len(), ALL_TABLES.len());
    }
}

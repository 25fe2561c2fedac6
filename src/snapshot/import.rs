use anyhow::{bail, Context, Result};
use rusqlite::Transaction;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::db::{Database, SqlValue};
use crate::schema::TableSchema;
use crate::ui::{Phase, Ui};

const BATCH_SIZE: usize = 1000;

/// Load `<input_dir>/<table>.csv` files into the database, parents first.
/// Tables are created if missing; a missing file is skipped. The whole run
/// is one transaction, so a failure leaves the database as it was.
pub fn import_tables(
    db: &Database,
    input_dir: &Path,
    tables: &[&'static TableSchema],
    ui: &mut impl Ui,
) -> Result<u64> {
    db.init_schema(tables)?;

    let mut conn = db.connect()?;
    let tx = conn.transaction()?;
    let mut total_records: u64 = 0;

    ui.set_phase(Phase::Importing);
    for schema in tables {
        let file_path = input_dir.join(schema.snapshot_file());

        if !file_path.exists() {
            ui.log(format!("{}: skipped (file not found)", schema.name));
            log::warn!("No snapshot file for {} at {:?}", schema.name, file_path);
            continue;
        }

        let count = import_table(&tx, schema, &file_path, ui)?;
        ui.log(format!("{}: {} records", schema.name, count));
        log::info!("Imported {} rows into {}", count, schema.name);
        total_records += count;
    }

    tx.commit().context("Failed to commit import")?;

    conn.execute_batch("PRAGMA optimize;")?;
    ui.set_phase(Phase::Complete);

    Ok(total_records)
}

/// Import one CSV file into the open transaction
fn import_table(
    tx: &Transaction,
    schema: &TableSchema,
    file_path: &Path,
    ui: &mut impl Ui,
) -> Result<u64> {
    let file = File::open(file_path)
        .with_context(|| format!("Failed to open: {:?}", file_path))?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    // Map each schema column to its position in the CSV header
    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header of {:?}", file_path))?
        .clone();
    let mut positions = Vec::with_capacity(schema.columns.len());
    for col in schema.columns {
        match headers.iter().position(|h| h.trim() == col.name) {
            Some(pos) => positions.push(pos),
            None => bail!("{:?} has no column '{}'", file_path, col.name),
        }
    }

    let insert_sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        schema.name,
        schema.column_names().join(", "),
        vec!["?"; schema.columns.len()].join(", ")
    );

    let mut count: u64 = 0;
    let mut batch: Vec<Vec<SqlValue>> = Vec::with_capacity(BATCH_SIZE);

    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read {:?}", file_path))?;

        let mut row = Vec::with_capacity(positions.len());
        for (col, &pos) in schema.columns.iter().zip(&positions) {
            let field = record.get(pos).unwrap_or("");
            let value = SqlValue::parse(field, col.col_type).with_context(|| {
                format!("{}: line {}, column {}", schema.name, line + 2, col.name)
            })?;
            row.push(value);
        }
        batch.push(row);

        if batch.len() >= BATCH_SIZE {
            insert_batch(tx, &insert_sql, &batch)?;
            count += batch.len() as u64;
            ui.set_progress(count, 0, schema.name);
            batch.clear();
        }
    }

    if !batch.is_empty() {
        insert_batch(tx, &insert_sql, &batch)?;
        count += batch.len() as u64;
    }

    Ok(count)
}

/// Insert a batch of rows into the database
fn insert_batch(tx: &Transaction, sql: &str, batch: &[Vec<SqlValue>]) -> Result<()> {
    let mut stmt = tx.prepare_cached(sql)?;

    for row in batch {
        stmt.execute(rusqlite::params_from_iter(row.iter()))
            .context("Failed to insert row")?;
    }

    Ok(())
}

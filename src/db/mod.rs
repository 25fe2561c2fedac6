//! SQLite access for the sales dataset.
//!
//! There is no pool: every call to [`Database::connect`] opens a fresh
//! connection and each statement auto-commits unless a caller opens a
//! transaction itself.

pub mod games;
pub mod queries;
pub mod schema_gen;

pub use games::*;
pub use queries::*;

use anyhow::{bail, Context, Result};
use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{Connection, ToSql};
use std::path::PathBuf;

use crate::schema::{ColumnType, TableSchema};
use schema_gen::{generate_create_table, generate_indexes};

/// Handle to the database file. Cheap to clone; holds no open connection.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open a new connection with foreign keys enforced
    pub fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)
            .with_context(|| format!("Failed to open database {:?}", self.path))?;

        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .context("Failed to enable foreign keys")?;

        Ok(conn)
    }

    /// Create the given tables and their FK indexes if they do not exist yet
    pub fn init_schema(&self, schemas: &[&TableSchema]) -> Result<()> {
        let conn = self.connect()?;

        for schema in schemas {
            let sql = generate_create_table(schema);
            conn.execute(&sql, [])
                .with_context(|| format!("Failed to create table: {}", schema.name))?;

            for index_sql in generate_indexes(schema) {
                conn.execute(&index_sql, [])
                    .with_context(|| format!("Failed to create index for: {}", schema.name))?;
            }
        }

        log::info!("Schema ready in {:?} ({} tables)", self.path, schemas.len());
        Ok(())
    }

    /// Number of rows currently stored in a table
    pub fn count_rows(&self, table: &TableSchema) -> Result<u64> {
        let conn = self.connect()?;
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table.name), [], |row| {
                row.get(0)
            })
            .with_context(|| format!("Failed to count rows in {}", table.name))?;
        Ok(count.max(0) as u64)
    }
}

/// A single cell value moving between SQLite and CSV
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    /// Parse a CSV field for a column of the given type. Empty fields are NULL.
    /// Numbers may carry surrounding whitespace; text is kept verbatim.
    pub fn parse(field: &str, col_type: ColumnType) -> Result<Self> {
        if field.is_empty() {
            return Ok(SqlValue::Null);
        }

        let number = field.trim();
        if col_type != ColumnType::Text && number.is_empty() {
            return Ok(SqlValue::Null);
        }

        let value = match col_type {
            ColumnType::Integer => match number.parse::<i64>() {
                Ok(i) => SqlValue::Integer(i),
                // Integral floats such as "2006.0"
                Err(_) => match number.parse::<f64>() {
                    Ok(f) if f.fract() == 0.0 => SqlValue::Integer(f as i64),
                    _ => bail!("Expected an integer, got {:?}", field),
                },
            },
            ColumnType::Real => SqlValue::Real(
                number
                    .parse::<f64>()
                    .with_context(|| format!("Expected a number, got {:?}", field))?,
            ),
            ColumnType::Text => SqlValue::Text(field.to_string()),
        };

        Ok(value)
    }

    /// Render the value as a CSV field (NULL becomes an empty field)
    pub fn to_field(&self) -> String {
        match self {
            SqlValue::Null => String::new(),
            SqlValue::Integer(i) => i.to_string(),
            SqlValue::Real(f) => f.to_string(),
            SqlValue::Text(s) => s.clone(),
        }
    }
}

impl From<ValueRef<'_>> for SqlValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => SqlValue::Null,
            ValueRef::Integer(i) => SqlValue::Integer(i),
            ValueRef::Real(f) => SqlValue::Real(f),
            ValueRef::Text(t) => SqlValue::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => SqlValue::Text(String::from_utf8_lossy(b).into_owned()),
        }
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            SqlValue::Integer(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
            SqlValue::Real(f) => ToSqlOutput::Borrowed(ValueRef::Real(*f)),
            SqlValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

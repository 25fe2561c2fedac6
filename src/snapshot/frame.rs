//! In-memory tables loaded from snapshot CSV files.
//!
//! A [`Frame`] keeps named columns over row-major cells. [`Frame::merge`] is
//! an inner equi-join that keeps the left row order; column names present on
//! both sides get the left/right suffix appended, so later steps of a join
//! chain can refer to e.g. `id_x` and `id_y`.

use anyhow::{anyhow, bail, Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io::Read;
use std::path::Path;

/// A single cell, typed by what the CSV text parses as
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Infer the cell type from CSV text
    pub fn parse(field: &str) -> Self {
        if field.is_empty() {
            Cell::Null
        } else if let Ok(i) = field.parse::<i64>() {
            Cell::Int(i)
        } else if let Ok(f) = field.parse::<f64>() {
            Cell::Float(f)
        } else {
            Cell::Text(field.to_string())
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Hashable join key; nulls never match
    fn key(&self) -> Option<JoinKey> {
        match self {
            Cell::Null => None,
            Cell::Int(i) => Some(JoinKey::Int(*i)),
            Cell::Float(f) if f.fract() == 0.0 => Some(JoinKey::Int(*f as i64)),
            Cell::Float(f) => Some(JoinKey::Text(f.to_string())),
            Cell::Text(s) => Some(JoinKey::Text(s.clone())),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum JoinKey {
    Int(i64),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Frame {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        if let Some(bad) = rows.iter().position(|r| r.len() != columns.len()) {
            bail!(
                "Row {} has {} cells, expected {}",
                bad,
                rows[bad].len(),
                columns.len()
            );
        }
        Ok(Self { columns, rows })
    }

    pub fn read_csv(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open snapshot {:?}", path))?;
        Self::from_reader(file).with_context(|| format!("Failed to parse snapshot {:?}", path))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(Cell::parse).collect());
        }

        Self::new(columns, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| anyhow!("Column '{}' not found (have: {})", name, self.columns.join(", ")))
    }

    /// Inner join of `self` and `right` on `left_on == right_on`
    pub fn merge(
        &self,
        right: &Frame,
        left_on: &str,
        right_on: &str,
        suffixes: (&str, &str),
    ) -> Result<Frame> {
        let left_idx = self.column_index(left_on)?;
        let right_idx = right.column_index(right_on)?;

        // Joining on a shared name keeps one key column
        let shared_key = left_on == right_on;

        let overlaps = |name: &str| {
            !(shared_key && name == left_on)
                && self.columns.iter().any(|c| c == name)
                && right.columns.iter().any(|c| c == name)
        };

        let mut columns = Vec::with_capacity(self.columns.len() + right.columns.len());
        for name in &self.columns {
            if overlaps(name) {
                columns.push(format!("{}{}", name, suffixes.0));
            } else {
                columns.push(name.clone());
            }
        }
        for (idx, name) in right.columns.iter().enumerate() {
            if shared_key && idx == right_idx {
                continue;
            }
            if overlaps(name) {
                columns.push(format!("{}{}", name, suffixes.1));
            } else {
                columns.push(name.clone());
            }
        }

        let mut index: HashMap<JoinKey, Vec<usize>> = HashMap::new();
        for (pos, row) in right.rows.iter().enumerate() {
            if let Some(key) = row[right_idx].key() {
                index.entry(key).or_default().push(pos);
            }
        }

        let mut rows = Vec::new();
        for left_row in &self.rows {
            let Some(key) = left_row[left_idx].key() else {
                continue;
            };
            let Some(matches) = index.get(&key) else {
                continue;
            };
            for &pos in matches {
                let mut row = left_row.clone();
                row.extend(
                    right.rows[pos]
                        .iter()
                        .enumerate()
                        .filter(|(idx, _)| !(shared_key && *idx == right_idx))
                        .map(|(_, cell)| cell.clone()),
                );
                rows.push(row);
            }
        }

        Frame::new(columns, rows)
    }

    /// Sum `value` per distinct `key`, ordered by key.
    /// Rows with a null key are dropped and null values count as zero.
    pub fn sum_by(&self, key: &str, value: &str) -> Result<Vec<(String, f64)>> {
        let key_idx = self.column_index(key)?;
        let value_idx = self.column_index(value)?;

        let mut groups: BTreeMap<String, f64> = BTreeMap::new();
        for row in &self.rows {
            if row[key_idx] == Cell::Null {
                continue;
            }
            let amount = match &row[value_idx] {
                Cell::Null => 0.0,
                cell => cell
                    .as_f64()
                    .ok_or_else(|| anyhow!("Column '{}' holds non-numeric value {:?}", value, cell))?,
            };
            *groups.entry(row[key_idx].to_string()).or_insert(0.0) += amount;
        }

        Ok(groups.into_iter().collect())
    }
}

pub const DEFAULT_SUFFIXES: (&str, &str) = ("_x", "_y");

//! CSV snapshots of the database tables: export, import, and the
//! in-memory copy the table reports run on.

pub mod export;
pub mod frame;
pub mod import;

pub use export::*;
pub use frame::*;
pub use import::*;

use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::Path;

use crate::schema::ALL_TABLES;

/// Every snapshot table loaded into memory. Immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    frames: HashMap<&'static str, Frame>,
}

impl Snapshot {
    /// Load `<dir>/<table>.csv` for every table in the schema
    pub fn load(dir: &Path) -> Result<Self> {
        let mut frames = HashMap::new();

        for schema in ALL_TABLES {
            let frame = Frame::read_csv(&dir.join(schema.snapshot_file()))?;
            log::debug!("Loaded snapshot {} ({} rows)", schema.name, frame.len());
            frames.insert(schema.name, frame);
        }

        Ok(Self { frames })
    }

    pub fn table(&self, name: &str) -> Result<&Frame> {
        self.frames
            .get(name)
            .ok_or_else(|| anyhow!("Snapshot table '{}' is not loaded", name))
    }

    pub fn total_rows(&self) -> usize {
        self.frames.values().map(Frame::len).sum()
    }
}

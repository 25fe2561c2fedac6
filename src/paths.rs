use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_NAME: &str = "video_games.db";

/// Where the database file and the CSV snapshot live
#[derive(Debug, Clone)]
pub struct DataLocations {
    db_path: PathBuf,
    snapshot_dir: PathBuf,
}

impl DataLocations {
    /// Use `custom_db` if given, otherwise the platform data directory.
    /// The database's parent directory is created if needed.
    pub fn new(custom_db: Option<PathBuf>, snapshot_dir: PathBuf) -> Result<Self> {
        let db_path = match custom_db {
            Some(path) => path,
            None => {
                let proj_dirs = ProjectDirs::from("", "", "vgsales")
                    .context("Could not determine data directory")?;
                proj_dirs.data_dir().join(DEFAULT_DB_NAME)
            }
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        Ok(Self {
            db_path,
            snapshot_dir,
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn snapshot_dir(&self) -> &Path {
        &self.snapshot_dir
    }
}

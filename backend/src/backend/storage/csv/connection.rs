use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use super::entry_repository::EntryRepository;
use super::girl_repository::GirlRepository;
use crate::backend::storage::traits::Connection;

pub const GIRLS_FILE_NAME: &str = "girls.yaml";
pub const ENTRIES_FILE_NAME: &str = "entries.csv";
pub const ENTRIES_HEADER: [&str; 8] = [
    "id",
    "girl_id",
    "date",
    "amount_spent",
    "duration_minutes",
    "number_of_nuts",
    "created_at",
    "updated_at",
];

/// CsvConnection manages the data directory and the files inside it
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .with_context(|| format!("Failed to create data directory {}", base_path.display()))?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Get the base directory path
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn girls_file_path(&self) -> PathBuf {
        self.base_directory.join(GIRLS_FILE_NAME)
    }

    pub fn entries_file_path(&self) -> PathBuf {
        self.base_directory.join(ENTRIES_FILE_NAME)
    }

    /// Ensure the entries CSV exists with its header row
    pub fn ensure_entries_file_exists(&self) -> Result<()> {
        let file_path = self.entries_file_path();
        if !file_path.exists() {
            let header = format!("{}\n", ENTRIES_HEADER.join(","));
            fs::write(&file_path, header)
                .with_context(|| format!("Failed to create {}", file_path.display()))?;
            debug!("Created entries file: {}", file_path.display());
        }
        Ok(())
    }

    /// Serialise read-modify-write cycles across every repository of this connection
    pub(crate) async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }
}

/// Replace `path` with `contents` via a temp file and rename
pub(crate) fn write_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, contents)
        .with_context(|| format!("Failed to write {}", temp_path.display()))?;
    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to move {} into place", temp_path.display()))?;
    Ok(())
}

impl Connection for CsvConnection {
    type GirlRepository = GirlRepository;
    type EntryRepository = EntryRepository;

    fn create_girl_repository(&self) -> Self::GirlRepository {
        GirlRepository::new(self.clone())
    }

    fn create_entry_repository(&self) -> Self::EntryRepository {
        EntryRepository::new(self.clone())
    }
}

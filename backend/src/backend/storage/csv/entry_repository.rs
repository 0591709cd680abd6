use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use csv::{ByteRecord, ReaderBuilder, WriterBuilder};
use log::{info, warn};

use super::connection::{write_atomically, CsvConnection, ENTRIES_HEADER};
use super::girl_repository::GirlRepository;
use crate::backend::domain::models::{DataEntry, EntryValidationError, NotFoundError};
use crate::backend::io::rest::mappers::EntryMapper;
use crate::backend::storage::EntryStorage;

/// Contents of entries.csv. Rows that fail to parse are kept byte for byte
/// and written back after the readable ones.
#[derive(Default)]
pub(super) struct EntryRows {
    entries: Vec<DataEntry>,
    unreadable: Vec<ByteRecord>,
    girl_id_column: Option<usize>,
}

impl EntryRows {
    pub(super) fn len(&self) -> usize {
        self.entries.len() + self.unreadable.len()
    }

    /// Drop every row that belongs to `girl_id`, unreadable ones included
    pub(super) fn remove_girl(&mut self, girl_id: &str) -> usize {
        let before = self.len();
        self.entries.retain(|e| e.girl_id != girl_id);
        if let Some(column) = self.girl_id_column {
            self.unreadable
                .retain(|row| row.get(column) != Some(girl_id.as_bytes()));
        }
        before - self.len()
    }
}

/// Entry repository backed by entries.csv
#[derive(Clone)]
pub struct EntryRepository {
    connection: CsvConnection,
}

impl EntryRepository {
    /// Create a new entry repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    pub(super) fn read_rows(&self) -> Result<EntryRows> {
        self.connection.ensure_entries_file_exists()?;
        let path = self.connection.entries_file_path();

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let headers = reader
            .byte_headers()
            .with_context(|| format!("Failed to read header of {}", path.display()))?
            .clone();

        let mut rows = EntryRows {
            girl_id_column: headers.iter().position(|h| h == b"girl_id"),
            ..EntryRows::default()
        };
        for (line, record) in reader.byte_records().enumerate() {
            let record =
                record.with_context(|| format!("Failed to read row {} of {}", line + 2, path.display()))?;
            let parsed = record
                .deserialize::<shared::DataEntry>(Some(&headers))
                .map_err(anyhow::Error::from)
                .and_then(EntryMapper::to_domain);
            match parsed {
                Ok(entry) => rows.entries.push(entry),
                Err(e) => {
                    warn!("Keeping unreadable entry row {} as-is: {:#}", line + 2, e);
                    rows.unreadable.push(record);
                }
            }
        }
        Ok(rows)
    }

    pub(super) fn write_rows(&self, rows: &EntryRows) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(Vec::new());
        writer.write_record(ENTRIES_HEADER)?;
        for entry in &rows.entries {
            writer.serialize(EntryMapper::to_dto(entry.clone()))?;
        }
        for record in &rows.unreadable {
            writer.write_byte_record(record)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow!("Failed to flush entries CSV: {}", e))?;
        write_atomically(&self.connection.entries_file_path(), &bytes)
    }

    /// Caller must hold the write lock
    fn ensure_girl_exists(&self, girl_id: &str) -> Result<()> {
        let girls = GirlRepository::new(self.connection.clone()).read_records()?;
        if !girls.contains(girl_id) {
            return Err(EntryValidationError::UnknownGirl(girl_id.to_string()).into());
        }
        Ok(())
    }
}

#[async_trait]
impl EntryStorage for EntryRepository {
    async fn store_entry(&self, entry: &DataEntry) -> Result<()> {
        let _guard = self.connection.lock_writes().await;
        self.ensure_girl_exists(&entry.girl_id)?;
        let mut rows = self.read_rows()?;
        if rows.entries.iter().any(|e| e.id == entry.id) {
            anyhow::bail!("Entry already exists: {}", entry.id);
        }
        rows.entries.push(entry.clone());
        self.write_rows(&rows)?;
        info!("Stored entry {} for girl {}", entry.id, entry.girl_id);
        Ok(())
    }

    async fn get_entry(&self, entry_id: &str) -> Result<Option<DataEntry>> {
        Ok(self.read_rows()?.entries.into_iter().find(|e| e.id == entry_id))
    }

    async fn list_entries(&self) -> Result<Vec<DataEntry>> {
        Ok(self.read_rows()?.entries)
    }

    async fn list_entries_for_girl(&self, girl_id: &str) -> Result<Vec<DataEntry>> {
        Ok(self
            .read_rows()?
            .entries
            .into_iter()
            .filter(|e| e.girl_id == girl_id)
            .collect())
    }

    async fn update_entry(&self, entry: &DataEntry) -> Result<()> {
        let _guard = self.connection.lock_writes().await;
        let mut rows = self.read_rows()?;
        let slot = rows
            .entries
            .iter_mut()
            .find(|e| e.id == entry.id)
            .ok_or_else(|| NotFoundError::Entry(entry.id.clone()))?;
        self.ensure_girl_exists(&entry.girl_id)?;
        *slot = entry.clone();
        self.write_rows(&rows)
    }

    async fn delete_entry(&self, entry_id: &str) -> Result<bool> {
        let _guard = self.connection.lock_writes().await;
        let mut rows = self.read_rows()?;
        let before = rows.entries.len();
        rows.entries.retain(|e| e.id != entry_id);
        if rows.entries.len() == before {
            return Ok(false);
        }
        self.write_rows(&rows)?;
        Ok(true)
    }
}

//! In-process storage. Nothing touches disk; data lives as long as the
//! connection (and its clones) do.
//!
//! Operations that touch both tables lock girls before entries.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::backend::domain::models::{DataEntry, EntryValidationError, Girl, NotFoundError};
use crate::backend::storage::traits::{Connection, DeletedCounts, EntryStorage, GirlStorage};

#[derive(Clone, Default)]
pub struct MemoryConnection {
    girls: Arc<RwLock<Vec<Girl>>>,
    entries: Arc<RwLock<Vec<DataEntry>>>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Connection for MemoryConnection {
    type GirlRepository = MemoryGirlRepository;
    type EntryRepository = MemoryEntryRepository;

    fn create_girl_repository(&self) -> Self::GirlRepository {
        MemoryGirlRepository { store: self.clone() }
    }

    fn create_entry_repository(&self) -> Self::EntryRepository {
        MemoryEntryRepository { store: self.clone() }
    }
}

fn read<T>(lock: &RwLock<Vec<T>>) -> Result<RwLockReadGuard<'_, Vec<T>>> {
    lock.read().map_err(|_| anyhow!("In-memory store lock poisoned"))
}

fn write<T>(lock: &RwLock<Vec<T>>) -> Result<RwLockWriteGuard<'_, Vec<T>>> {
    lock.write().map_err(|_| anyhow!("In-memory store lock poisoned"))
}

#[derive(Clone)]
pub struct MemoryGirlRepository {
    store: MemoryConnection,
}

#[async_trait]
impl GirlStorage for MemoryGirlRepository {
    async fn store_girl(&self, girl: &Girl) -> Result<()> {
        let mut girls = write(&self.store.girls)?;
        if girls.iter().any(|g| g.id == girl.id) {
            anyhow::bail!("Girl already exists: {}", girl.id);
        }
        girls.push(girl.clone());
        Ok(())
    }

    async fn get_girl(&self, girl_id: &str) -> Result<Option<Girl>> {
        Ok(read(&self.store.girls)?.iter().find(|g| g.id == girl_id).cloned())
    }

    async fn list_girls(&self) -> Result<Vec<Girl>> {
        Ok(read(&self.store.girls)?.clone())
    }

    async fn update_girl(&self, girl: &Girl) -> Result<()> {
        let mut girls = write(&self.store.girls)?;
        let slot = girls
            .iter_mut()
            .find(|g| g.id == girl.id)
            .ok_or_else(|| NotFoundError::Girl(girl.id.clone()))?;
        *slot = girl.clone();
        Ok(())
    }

    async fn delete_girl(&self, girl_id: &str) -> Result<Option<usize>> {
        let mut girls = write(&self.store.girls)?;
        let mut entries = write(&self.store.entries)?;
        let before = girls.len();
        girls.retain(|g| g.id != girl_id);
        if girls.len() == before {
            return Ok(None);
        }
        let entries_before = entries.len();
        entries.retain(|e| e.girl_id != girl_id);
        Ok(Some(entries_before - entries.len()))
    }

    async fn delete_all_girls(&self) -> Result<DeletedCounts> {
        let mut girls = write(&self.store.girls)?;
        let mut entries = write(&self.store.entries)?;
        let counts = DeletedCounts {
            girls: girls.len(),
            entries: entries.len(),
        };
        girls.clear();
        entries.clear();
        Ok(counts)
    }
}

#[derive(Clone)]
pub struct MemoryEntryRepository {
    store: MemoryConnection,
}

#[async_trait]
impl EntryStorage for MemoryEntryRepository {
    async fn store_entry(&self, entry: &DataEntry) -> Result<()> {
        let girls = read(&self.store.girls)?;
        let mut entries = write(&self.store.entries)?;
        if !girls.iter().any(|g| g.id == entry.girl_id) {
            return Err(EntryValidationError::UnknownGirl(entry.girl_id.clone()).into());
        }
        if entries.iter().any(|e| e.id == entry.id) {
            anyhow::bail!("Entry already exists: {}", entry.id);
        }
        entries.push(entry.clone());
        Ok(())
    }

    async fn get_entry(&self, entry_id: &str) -> Result<Option<DataEntry>> {
        Ok(read(&self.store.entries)?.iter().find(|e| e.id == entry_id).cloned())
    }

    async fn list_entries(&self) -> Result<Vec<DataEntry>> {
        Ok(read(&self.store.entries)?.clone())
    }

    async fn list_entries_for_girl(&self, girl_id: &str) -> Result<Vec<DataEntry>> {
        Ok(read(&self.store.entries)?
            .iter()
            .filter(|e| e.girl_id == girl_id)
            .cloned()
            .collect())
    }

    async fn update_entry(&self, entry: &DataEntry) -> Result<()> {
        let girls = read(&self.store.girls)?;
        let mut entries = write(&self.store.entries)?;
        let slot = entries
            .iter_mut()
            .find(|e| e.id == entry.id)
            .ok_or_else(|| NotFoundError::Entry(entry.id.clone()))?;
        if !girls.iter().any(|g| g.id == entry.girl_id) {
            return Err(EntryValidationError::UnknownGirl(entry.girl_id.clone()).into());
        }
        *slot = entry.clone();
        Ok(())
    }

    async fn delete_entry(&self, entry_id: &str) -> Result<bool> {
        let mut entries = write(&self.store.entries)?;
        let before = entries.len();
        entries.retain(|e| e.id != entry_id);
        Ok(entries.len() != before)
    }
}

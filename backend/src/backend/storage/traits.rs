//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use async_trait::async_trait;

use crate::backend::domain::models::{DataEntry, Girl};

/// Rows removed by [`GirlStorage::delete_all_girls`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeletedCounts {
    pub girls: usize,
    pub entries: usize,
}

/// Trait defining the interface for girl storage operations
#[async_trait]
pub trait GirlStorage: Send + Sync {
    /// Store a new girl
    async fn store_girl(&self, girl: &Girl) -> Result<()>;

    /// Retrieve a specific girl by ID
    async fn get_girl(&self, girl_id: &str) -> Result<Option<Girl>>;

    /// List all girls in storage order
    async fn list_girls(&self) -> Result<Vec<Girl>>;

    /// Replace an existing girl. Fails with `NotFoundError` if the ID is unknown.
    async fn update_girl(&self, girl: &Girl) -> Result<()>;

    /// Delete a girl together with every entry recorded against her, as one step.
    /// Returns the number of entries removed, or `None` if the girl was not found.
    async fn delete_girl(&self, girl_id: &str) -> Result<Option<usize>>;

    /// Delete every girl and every entry as one step
    async fn delete_all_girls(&self) -> Result<DeletedCounts>;
}

/// Trait defining the interface for entry storage operations
#[async_trait]
pub trait EntryStorage: Send + Sync {
    /// Store a new entry. Fails with `EntryValidationError::UnknownGirl` unless
    /// the referenced girl exists at the moment of the write.
    async fn store_entry(&self, entry: &DataEntry) -> Result<()>;

    /// Retrieve a specific entry by ID
    async fn get_entry(&self, entry_id: &str) -> Result<Option<DataEntry>>;

    /// List all entries in storage order
    async fn list_entries(&self) -> Result<Vec<DataEntry>>;

    /// List the entries belonging to one girl
    async fn list_entries_for_girl(&self, girl_id: &str) -> Result<Vec<DataEntry>>;

    /// Replace an existing entry. Fails with `NotFoundError` if the ID is unknown
    /// and with `EntryValidationError::UnknownGirl` if the referenced girl is gone.
    async fn update_entry(&self, entry: &DataEntry) -> Result<()>;

    /// Delete a single entry
    /// Returns true if the entry was found and deleted, false otherwise
    async fn delete_entry(&self, entry_id: &str) -> Result<bool>;
}

/// Trait defining the interface for storage connections
///
/// This trait abstracts away the specific connection type (files, memory, etc.)
/// and provides factory methods for creating repositories. This allows the domain
/// layer to work with any storage backend without knowing the implementation details.
pub trait Connection: Send + Sync + Clone {
    /// The type of GirlStorage this connection creates
    type GirlRepository: GirlStorage + 'static;

    /// The type of EntryStorage this connection creates
    type EntryRepository: EntryStorage + 'static;

    /// Create a new girl repository for this connection
    fn create_girl_repository(&self) -> Self::GirlRepository;

    /// Create a new entry repository for this connection
    fn create_entry_repository(&self) -> Self::EntryRepository;
}

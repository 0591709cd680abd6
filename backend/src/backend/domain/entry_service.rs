use anyhow::Result;
use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;

use crate::backend::domain::commands::entry::{CreateEntryCommand, UpdateEntryCommand};
use crate::backend::domain::formatting::{format_currency, format_time_detailed};
use crate::backend::domain::models::{DataEntry, EntryValidationError, NotFoundError};
use crate::backend::storage::{EntryStorage, GirlStorage};

/// Service for recording dated entries against girls
#[derive(Clone)]
pub struct EntryService {
    girls: Arc<dyn GirlStorage>,
    entries: Arc<dyn EntryStorage>,
}

impl EntryService {
    pub fn new(girls: Arc<dyn GirlStorage>, entries: Arc<dyn EntryStorage>) -> Self {
        Self { girls, entries }
    }

    /// Record a new entry
    pub async fn create_entry(&self, command: CreateEntryCommand) -> Result<DataEntry> {
        info!(
            "Creating entry for girl {}: date={}, amount={}",
            command.girl_id, command.date, command.amount_spent
        );

        let date = DataEntry::parse_date(&command.date)?;
        DataEntry::validate_amount(command.amount_spent)?;

        let now = Utc::now();
        let entry = DataEntry {
            id: DataEntry::generate_id(),
            girl_id: command.girl_id,
            date,
            amount_spent: command.amount_spent,
            duration_minutes: command.duration_minutes,
            number_of_nuts: command.number_of_nuts,
            created_at: now,
            updated_at: now,
        };

        // the store checks the girl reference under its write lock
        self.entries.store_entry(&entry).await?;

        info!(
            "Created entry {} for girl {} ({} over {})",
            entry.id,
            entry.girl_id,
            format_currency(entry.amount_spent),
            format_time_detailed(u64::from(entry.duration_minutes))
        );
        Ok(entry)
    }

    pub async fn get_entry(&self, entry_id: &str) -> Result<Option<DataEntry>> {
        let entry = self.entries.get_entry(entry_id).await?;
        if entry.is_none() {
            warn!("Entry not found: {}", entry_id);
        }
        Ok(entry)
    }

    /// List every entry, newest date first
    pub async fn list_entries(&self) -> Result<Vec<DataEntry>> {
        let mut entries = self.entries.list_entries().await?;
        sort_newest_first(&mut entries);
        info!("Found {} entries", entries.len());
        Ok(entries)
    }

    /// List one girl's entries, newest date first
    pub async fn list_entries_for_girl(&self, girl_id: &str) -> Result<Vec<DataEntry>> {
        self.ensure_girl_exists(girl_id).await?;
        let mut entries = self.entries.list_entries_for_girl(girl_id).await?;
        sort_newest_first(&mut entries);
        info!("Found {} entries for girl {}", entries.len(), girl_id);
        Ok(entries)
    }

    /// Replace every field of an existing entry
    pub async fn update_entry(&self, entry_id: &str, command: UpdateEntryCommand) -> Result<DataEntry> {
        info!("Updating entry: {}", entry_id);

        let mut entry = self
            .entries
            .get_entry(entry_id)
            .await?
            .ok_or_else(|| NotFoundError::Entry(entry_id.to_string()))?;

        let date = DataEntry::parse_date(&command.date)?;
        DataEntry::validate_amount(command.amount_spent)?;

        entry.girl_id = command.girl_id;
        entry.date = date;
        entry.amount_spent = command.amount_spent;
        entry.duration_minutes = command.duration_minutes;
        entry.number_of_nuts = command.number_of_nuts;
        entry.updated_at = Utc::now();

        self.entries.update_entry(&entry).await?;

        info!("Updated entry {}", entry.id);
        Ok(entry)
    }

    pub async fn delete_entry(&self, entry_id: &str) -> Result<()> {
        info!("Deleting entry: {}", entry_id);
        if !self.entries.delete_entry(entry_id).await? {
            return Err(NotFoundError::Entry(entry_id.to_string()).into());
        }
        Ok(())
    }

    async fn ensure_girl_exists(&self, girl_id: &str) -> Result<()> {
        if self.girls.get_girl(girl_id).await?.is_none() {
            return Err(EntryValidationError::UnknownGirl(girl_id.to_string()).into());
        }
        Ok(())
    }
}

/// Date descending; same-day entries keep newest creation first
fn sort_newest_first(entries: &mut [DataEntry]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::Girl;
    use crate::backend::storage::{Connection, MemoryConnection};
    use chrono::NaiveDate;

    async fn setup_test() -> (EntryService, String) {
        let connection = MemoryConnection::new();
        let girls = connection.create_girl_repository();
        let now = Utc::now();
        let girl = Girl {
            id: "girl::alice".to_string(),
            name: "Alice".to_string(),
            age: 26,
            nationality: None,
            ethnicity: None,
            hair_color: None,
            rating: 7.5,
            created_at: now,
            updated_at: now,
        };
        girls.store_girl(&girl).await.unwrap();
        let service = EntryService::new(Arc::new(girls), Arc::new(connection.create_entry_repository()));
        (service, girl.id)
    }

    fn create_command(girl_id: &str, date: &str, amount: f64) -> CreateEntryCommand {
        CreateEntryCommand {
            girl_id: girl_id.to_string(),
            date: date.to_string(),
            amount_spent: amount,
            duration_minutes: 120,
            number_of_nuts: 2,
        }
    }

    #[tokio::test]
    async fn test_create_entry() {
        let (service, girl_id) = setup_test().await;

        let entry = service
            .create_entry(create_command(&girl_id, "2024-06-15", 150.0))
            .await
            .expect("Failed to create entry");

        assert!(entry.id.starts_with("entry::"));
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
        assert_eq!(entry.amount_spent, 150.0);
        assert_eq!(service.get_entry(&entry.id).await.unwrap(), Some(entry));
    }

    #[tokio::test]
    async fn test_create_entry_validation() {
        let (service, girl_id) = setup_test().await;

        let err = service
            .create_entry(create_command("girl::ghost", "2024-06-15", 10.0))
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<EntryValidationError>(),
            Some(&EntryValidationError::UnknownGirl("girl::ghost".to_string()))
        );

        assert!(service.create_entry(create_command(&girl_id, "2024-06-15", -5.0)).await.is_err());
        assert!(service.create_entry(create_command(&girl_id, "15/06/2024", 5.0)).await.is_err());
        assert!(service.create_entry(create_command(&girl_id, "2024-06-15", f64::NAN)).await.is_err());

        // zero spend with zero nuts is a valid record
        let mut free = create_command(&girl_id, "2024-06-15", 0.0);
        free.number_of_nuts = 0;
        assert!(service.create_entry(free).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_entries_newest_first() {
        let (service, girl_id) = setup_test().await;
        service.create_entry(create_command(&girl_id, "2024-01-10", 1.0)).await.unwrap();
        service.create_entry(create_command(&girl_id, "2024-03-01", 2.0)).await.unwrap();
        service.create_entry(create_command(&girl_id, "2023-12-31", 3.0)).await.unwrap();

        let dates: Vec<String> = service
            .list_entries()
            .await
            .unwrap()
            .iter()
            .map(|e| e.date.to_string())
            .collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-01-10", "2023-12-31"]);

        assert_eq!(service.list_entries_for_girl(&girl_id).await.unwrap().len(), 3);
        assert!(service.list_entries_for_girl("girl::ghost").await.is_err());
    }

    #[tokio::test]
    async fn test_update_entry() {
        let (service, girl_id) = setup_test().await;
        let created = service.create_entry(create_command(&girl_id, "2024-02-01", 80.0)).await.unwrap();

        let updated = service
            .update_entry(
                &created.id,
                UpdateEntryCommand {
                    girl_id: girl_id.clone(),
                    date: "2024-02-02".to_string(),
                    amount_spent: 95.5,
                    duration_minutes: 45,
                    number_of_nuts: 1,
                },
            )
            .await
            .expect("Failed to update entry");

        assert_eq!(updated.date, NaiveDate::from_ymd_opt(2024, 2, 2).unwrap());
        assert_eq!(updated.amount_spent, 95.5);
        assert_eq!(updated.created_at, created.created_at);

        let err = service
            .update_entry(
                &created.id,
                UpdateEntryCommand {
                    girl_id: "girl::ghost".to_string(),
                    date: "2024-02-03".to_string(),
                    amount_spent: 1.0,
                    duration_minutes: 1,
                    number_of_nuts: 1,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<EntryValidationError>(),
            Some(&EntryValidationError::UnknownGirl("girl::ghost".to_string()))
        );
        assert_eq!(service.get_entry(&created.id).await.unwrap(), Some(updated));

        let err = service
            .update_entry(
                "entry::missing",
                UpdateEntryCommand {
                    girl_id,
                    date: "2024-02-02".to_string(),
                    amount_spent: 1.0,
                    duration_minutes: 1,
                    number_of_nuts: 1,
                },
            )
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<NotFoundError>().is_some());
    }

    #[tokio::test]
    async fn test_delete_entry() {
        let (service, girl_id) = setup_test().await;
        let created = service.create_entry(create_command(&girl_id, "2024-02-01", 80.0)).await.unwrap();

        service.delete_entry(&created.id).await.expect("Failed to delete entry");
        assert!(service.get_entry(&created.id).await.unwrap().is_none());

        let err = service.delete_entry(&created.id).await.unwrap_err();
        assert!(err.downcast_ref::<NotFoundError>().is_some());
    }
}

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Serialize;
use std::fs;

use super::connection::{write_atomically, CsvConnection};
use super::entry_repository::EntryRepository;
use crate::backend::domain::models::{Girl, NotFoundError};
use crate::backend::io::rest::mappers::GirlMapper;
use crate::backend::storage::{DeletedCounts, GirlStorage};

/// Contents of girls.yaml. Records that fail to map are kept verbatim and
/// written back after the readable ones.
#[derive(Default)]
pub(super) struct GirlRecords {
    pub(super) girls: Vec<Girl>,
    unreadable: Vec<serde_yaml::Value>,
}

impl GirlRecords {
    pub(super) fn contains(&self, girl_id: &str) -> bool {
        self.girls.iter().any(|g| g.id == girl_id)
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum StoredGirl<'a> {
    Readable(shared::Girl),
    Unreadable(&'a serde_yaml::Value),
}

/// Girl repository backed by a YAML list in the data directory
#[derive(Clone)]
pub struct GirlRepository {
    connection: CsvConnection,
}

impl GirlRepository {
    /// Create a new girl repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    pub(super) fn read_records(&self) -> Result<GirlRecords> {
        let path = self.connection.girls_file_path();
        if !path.exists() {
            debug!("{} doesn't exist yet, returning empty girl list", path.display());
            return Ok(GirlRecords::default());
        }

        let yaml_content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if yaml_content.trim().is_empty() {
            return Ok(GirlRecords::default());
        }

        let values: Vec<serde_yaml::Value> = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        let mut records = GirlRecords::default();
        for (index, value) in values.into_iter().enumerate() {
            let mapped = serde_yaml::from_value::<shared::Girl>(value.clone())
                .map_err(anyhow::Error::from)
                .and_then(GirlMapper::to_domain);
            match mapped {
                Ok(girl) => records.girls.push(girl),
                Err(e) => {
                    warn!("Keeping unreadable girl record #{} as-is: {:#}", index + 1, e);
                    records.unreadable.push(value);
                }
            }
        }
        Ok(records)
    }

    pub(super) fn write_records(&self, records: &GirlRecords) -> Result<()> {
        let stored: Vec<StoredGirl<'_>> = records
            .girls
            .iter()
            .cloned()
            .map(|girl| StoredGirl::Readable(GirlMapper::to_dto(girl)))
            .chain(records.unreadable.iter().map(StoredGirl::Unreadable))
            .collect();
        let yaml_content = serde_yaml::to_string(&stored).context("Failed to serialize girls")?;
        write_atomically(&self.connection.girls_file_path(), yaml_content.as_bytes())
    }

    fn entries(&self) -> EntryRepository {
        EntryRepository::new(self.connection.clone())
    }
}

#[async_trait]
impl GirlStorage for GirlRepository {
    async fn store_girl(&self, girl: &Girl) -> Result<()> {
        let _guard = self.connection.lock_writes().await;
        let mut records = self.read_records()?;
        if records.contains(&girl.id) {
            anyhow::bail!("Girl already exists: {}", girl.id);
        }
        records.girls.push(girl.clone());
        self.write_records(&records)?;
        info!("Stored girl {} ({} total)", girl.id, records.girls.len());
        Ok(())
    }

    async fn get_girl(&self, girl_id: &str) -> Result<Option<Girl>> {
        Ok(self.read_records()?.girls.into_iter().find(|g| g.id == girl_id))
    }

    async fn list_girls(&self) -> Result<Vec<Girl>> {
        Ok(self.read_records()?.girls)
    }

    async fn update_girl(&self, girl: &Girl) -> Result<()> {
        let _guard = self.connection.lock_writes().await;
        let mut records = self.read_records()?;
        let slot = records
            .girls
            .iter_mut()
            .find(|g| g.id == girl.id)
            .ok_or_else(|| NotFoundError::Girl(girl.id.clone()))?;
        *slot = girl.clone();
        self.write_records(&records)
    }

    async fn delete_girl(&self, girl_id: &str) -> Result<Option<usize>> {
        let _guard = self.connection.lock_writes().await;
        let mut records = self.read_records()?;
        if !records.contains(girl_id) {
            return Ok(None);
        }

        // entries first so a failed girl write never leaves orphans behind
        let entries = self.entries();
        let mut rows = entries.read_rows()?;
        let removed = rows.remove_girl(girl_id);
        if removed > 0 {
            entries.write_rows(&rows)?;
        }

        records.girls.retain(|g| g.id != girl_id);
        self.write_records(&records)?;
        info!("Deleted girl {} and {} entries", girl_id, removed);
        Ok(Some(removed))
    }

    async fn delete_all_girls(&self) -> Result<DeletedCounts> {
        let _guard = self.connection.lock_writes().await;
        let records = self.read_records()?;
        let entries = self.entries();
        let rows = entries.read_rows()?;
        let counts = DeletedCounts {
            girls: records.girls.len() + records.unreadable.len(),
            entries: rows.len(),
        };

        entries.write_rows(&Default::default())?;
        self.write_records(&GirlRecords::default())?;
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn setup_test_repo() -> (GirlRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        (GirlRepository::new(connection), temp_dir)
    }

    fn test_girl(id: &str, name: &str) -> Girl {
        let now = Utc.with_ymd_and_hms(2024, 4, 1, 18, 30, 0).unwrap();
        Girl {
            id: id.to_string(),
            name: name.to_string(),
            age: 27,
            nationality: Some("Colombia".to_string()),
            ethnicity: None,
            hair_color: Some("Brunette".to_string()),
            rating: 8.5,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_store_and_list_girls() {
        let (repo, _temp_dir) = setup_test_repo();
        assert!(repo.list_girls().await.unwrap().is_empty());

        repo.store_girl(&test_girl("girl::1", "Alice")).await.expect("Failed to store girl");
        repo.store_girl(&test_girl("girl::2", "Bea")).await.expect("Failed to store girl");

        let girls = repo.list_girls().await.expect("Failed to list girls");
        assert_eq!(girls.len(), 2);
        assert_eq!(girls[0], test_girl("girl::1", "Alice"));

        let found = repo.get_girl("girl::2").await.unwrap();
        assert_eq!(found.map(|g| g.name), Some("Bea".to_string()));
        assert!(repo.get_girl("girl::missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_duplicate_id_fails() {
        let (repo, _temp_dir) = setup_test_repo();
        repo.store_girl(&test_girl("girl::1", "Alice")).await.unwrap();
        assert!(repo.store_girl(&test_girl("girl::1", "Again")).await.is_err());
    }

    #[tokio::test]
    async fn test_update_girl() {
        let (repo, _temp_dir) = setup_test_repo();
        repo.store_girl(&test_girl("girl::1", "Alice")).await.unwrap();

        let mut updated = test_girl("girl::1", "Alicia");
        updated.rating = 9.0;
        repo.update_girl(&updated).await.expect("Failed to update girl");

        let stored = repo.get_girl("girl::1").await.unwrap().unwrap();
        assert_eq!(stored.name, "Alicia");
        assert_eq!(stored.rating, 9.0);

        let err = repo.update_girl(&test_girl("girl::404", "Nobody")).await.unwrap_err();
        assert!(err.downcast_ref::<NotFoundError>().is_some());
    }

    #[tokio::test]
    async fn test_delete_girl() {
        let (repo, _temp_dir) = setup_test_repo();
        repo.store_girl(&test_girl("girl::1", "Alice")).await.unwrap();
        repo.store_girl(&test_girl("girl::2", "Bea")).await.unwrap();

        assert_eq!(repo.delete_girl("girl::1").await.unwrap(), Some(0));
        assert_eq!(repo.delete_girl("girl::1").await.unwrap(), None);
        assert_eq!(repo.list_girls().await.unwrap().len(), 1);

        let counts = repo.delete_all_girls().await.unwrap();
        assert_eq!(counts, DeletedCounts { girls: 1, entries: 0 });
        assert!(repo.list_girls().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_data_survives_new_connection() {
        let temp_dir = TempDir::new().unwrap();
        let repo = GirlRepository::new(CsvConnection::new(temp_dir.path()).unwrap());
        repo.store_girl(&test_girl("girl::1", "Alice")).await.unwrap();

        let reopened = GirlRepository::new(CsvConnection::new(temp_dir.path()).unwrap());
        let girls = reopened.list_girls().await.unwrap();
        assert_eq!(girls, vec![test_girl("girl::1", "Alice")]);
    }

    #[tokio::test]
    async fn test_unreadable_records_survive_writes() {
        let (repo, _temp_dir) = setup_test_repo();
        let yaml = r#"
- id: "girl::ok"
  name: Alice
  age: 30
  rating: 7.5
  created_at: "2024-01-01T00:00:00+00:00"
  updated_at: "2024-01-01T00:00:00+00:00"
- id: "girl::bad"
  name: Broken
  age: 30
  rating: 7.5
  created_at: "yesterday"
  updated_at: "2024-01-01T00:00:00+00:00"
"#;
        fs::write(repo.connection.girls_file_path(), yaml).unwrap();

        let girls = repo.list_girls().await.unwrap();
        assert_eq!(girls.len(), 1);
        assert_eq!(girls[0].id, "girl::ok");

        repo.store_girl(&test_girl("girl::new", "Carla")).await.unwrap();
        repo.delete_girl("girl::ok").await.unwrap();

        let content = fs::read_to_string(repo.connection.girls_file_path()).unwrap();
        assert!(content.contains("girl::bad"));
        assert!(content.contains("yesterday"));
        assert!(!content.contains("girl::ok"));

        let ids: Vec<String> = repo.list_girls().await.unwrap().into_iter().map(|g| g.id).collect();
        assert_eq!(ids, vec!["girl::new"]);
    }
}

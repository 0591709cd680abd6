use anyhow::Result;
use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;

use crate::backend::domain::commands::girl::{CreateGirlCommand, UpdateGirlCommand};
use crate::backend::domain::analytics::sort_by_name;
use crate::backend::domain::formatting::format_rating;
use crate::backend::domain::models::{Girl, NotFoundError};
use crate::backend::storage::GirlStorage;

/// Service for managing tracked girls
#[derive(Clone)]
pub struct GirlService {
    girls: Arc<dyn GirlStorage>,
}

impl GirlService {
    /// Create a new GirlService
    pub fn new(girls: Arc<dyn GirlStorage>) -> Self {
        Self { girls }
    }

    /// Create a new girl
    pub async fn create_girl(&self, command: CreateGirlCommand) -> Result<Girl> {
        info!("Creating girl: name={}, age={}", command.name, command.age);

        Girl::validate_fields(&command.name, command.age, command.rating)?;

        let now = Utc::now();
        let girl = Girl {
            id: Girl::generate_id(),
            name: command.name.trim().to_string(),
            age: command.age,
            nationality: Girl::normalize_attribute(command.nationality),
            ethnicity: Girl::normalize_attribute(command.ethnicity),
            hair_color: Girl::normalize_attribute(command.hair_color),
            rating: command.rating,
            created_at: now,
            updated_at: now,
        };

        self.girls.store_girl(&girl).await?;

        info!(
            "Created girl: {} ({}) with ID: {}",
            girl.name,
            format_rating(girl.rating),
            girl.id
        );
        Ok(girl)
    }

    /// Get a girl by ID
    pub async fn get_girl(&self, girl_id: &str) -> Result<Option<Girl>> {
        let girl = self.girls.get_girl(girl_id).await?;
        if girl.is_none() {
            warn!("Girl not found: {}", girl_id);
        }
        Ok(girl)
    }

    /// List all girls ordered by name
    pub async fn list_girls(&self) -> Result<Vec<Girl>> {
        let mut girls = self.girls.list_girls().await?;
        sort_by_name(&mut girls);
        info!("Found {} girls", girls.len());
        Ok(girls)
    }

    /// Replace every editable field of an existing girl
    pub async fn update_girl(&self, girl_id: &str, command: UpdateGirlCommand) -> Result<Girl> {
        info!("Updating girl: {}", girl_id);

        let mut girl = self
            .girls
            .get_girl(girl_id)
            .await?
            .ok_or_else(|| NotFoundError::Girl(girl_id.to_string()))?;

        Girl::validate_fields(&command.name, command.age, command.rating)?;

        girl.name = command.name.trim().to_string();
        girl.age = command.age;
        girl.nationality = Girl::normalize_attribute(command.nationality);
        girl.ethnicity = Girl::normalize_attribute(command.ethnicity);
        girl.hair_color = Girl::normalize_attribute(command.hair_color);
        girl.rating = command.rating;
        girl.updated_at = Utc::now();

        self.girls.update_girl(&girl).await?;

        info!("Updated girl: {} with ID: {}", girl.name, girl.id);
        Ok(girl)
    }

    /// Delete a girl and every entry recorded against her.
    /// Returns the number of entries removed with her.
    pub async fn delete_girl(&self, girl_id: &str) -> Result<usize> {
        info!("Deleting girl: {}", girl_id);

        let girl = self
            .girls
            .get_girl(girl_id)
            .await?
            .ok_or_else(|| NotFoundError::Girl(girl_id.to_string()))?;

        let deleted_entries = self
            .girls
            .delete_girl(girl_id)
            .await?
            .ok_or_else(|| NotFoundError::Girl(girl_id.to_string()))?;

        info!(
            "Deleted girl: {} with ID: {} ({} entries removed)",
            girl.name, girl.id, deleted_entries
        );
        Ok(deleted_entries)
    }
}

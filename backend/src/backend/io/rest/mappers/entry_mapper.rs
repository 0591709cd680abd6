use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};

use crate::backend::domain::models::DataEntry as DomainEntry;
use shared::{DataEntry as SharedEntry, EntryListResponse, EntryResponse};

/// Mapper to convert between shared DataEntry DTOs and domain DataEntry models.
pub struct EntryMapper;

impl EntryMapper {
    /// Converts a shared DataEntry DTO to a domain DataEntry model.
    pub fn to_domain(dto: SharedEntry) -> Result<DomainEntry> {
        let date = NaiveDate::parse_from_str(&dto.date, DomainEntry::DATE_FORMAT)
            .context("Failed to parse date from shared DTO")?;
        let created_at = DateTime::parse_from_rfc3339(&dto.created_at)
            .context("Failed to parse created_at from shared DTO")?
            .with_timezone(&Utc);
        let updated_at = DateTime::parse_from_rfc3339(&dto.updated_at)
            .context("Failed to parse updated_at from shared DTO")?
            .with_timezone(&Utc);

        Ok(DomainEntry {
            id: dto.id,
            girl_id: dto.girl_id,
            date,
            amount_spent: dto.amount_spent,
            duration_minutes: dto.duration_minutes,
            number_of_nuts: dto.number_of_nuts,
            created_at,
            updated_at,
        })
    }

    /// Converts a domain DataEntry model to a shared DataEntry DTO.
    pub fn to_dto(domain: DomainEntry) -> SharedEntry {
        SharedEntry {
            id: domain.id,
            girl_id: domain.girl_id,
            date: domain.date.format(DomainEntry::DATE_FORMAT).to_string(),
            amount_spent: domain.amount_spent,
            duration_minutes: domain.duration_minutes,
            number_of_nuts: domain.number_of_nuts,
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }

    pub fn to_entry_response_dto(domain: DomainEntry, message: &str) -> EntryResponse {
        EntryResponse {
            entry: Self::to_dto(domain),
            success_message: message.to_string(),
        }
    }

    pub fn to_entry_list_dto(domain_entries: Vec<DomainEntry>) -> EntryListResponse {
        EntryListResponse {
            entries: domain_entries.into_iter().map(Self::to_dto).collect(),
        }
    }
}

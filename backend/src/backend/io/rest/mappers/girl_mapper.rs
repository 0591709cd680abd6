use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::backend::domain::models::{Girl as DomainGirl, GirlWithMetrics as DomainGirlWithMetrics};
use shared::{
    Girl as SharedGirl, GirlListResponse, GirlMetricsListResponse, GirlResponse,
    GirlWithMetrics as SharedGirlWithMetrics,
};

/// Mapper to convert between shared Girl DTOs and domain Girl models.
pub struct GirlMapper;

impl GirlMapper {
    /// Converts a shared Girl DTO to a domain Girl model.
    pub fn to_domain(dto: SharedGirl) -> Result<DomainGirl> {
        let created_at = DateTime::parse_from_rfc3339(&dto.created_at)
            .context("Failed to parse created_at from shared DTO")?
            .with_timezone(&Utc);
        let updated_at = DateTime::parse_from_rfc3339(&dto.updated_at)
            .context("Failed to parse updated_at from shared DTO")?
            .with_timezone(&Utc);

        Ok(DomainGirl {
            id: dto.id,
            name: dto.name,
            age: dto.age,
            nationality: dto.nationality,
            ethnicity: dto.ethnicity,
            hair_color: dto.hair_color,
            rating: dto.rating,
            created_at,
            updated_at,
        })
    }

    /// Converts a domain Girl model to a shared Girl DTO.
    pub fn to_dto(domain: DomainGirl) -> SharedGirl {
        SharedGirl {
            id: domain.id,
            name: domain.name,
            age: domain.age,
            nationality: domain.nationality,
            ethnicity: domain.ethnicity,
            hair_color: domain.hair_color,
            rating: domain.rating,
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }

    pub fn to_girl_response_dto(domain: DomainGirl, message: &str) -> GirlResponse {
        GirlResponse {
            girl: Self::to_dto(domain),
            success_message: message.to_string(),
        }
    }

    pub fn to_girl_list_dto(domain_girls: Vec<DomainGirl>) -> GirlListResponse {
        GirlListResponse {
            girls: domain_girls.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_metrics_dto(domain: DomainGirlWithMetrics) -> SharedGirlWithMetrics {
        SharedGirlWithMetrics {
            girl: Self::to_dto(domain.girl),
            metrics: domain.metrics,
            total_entries: domain.total_entries,
        }
    }

    pub fn to_metrics_list_dto(domain: Vec<DomainGirlWithMetrics>) -> GirlMetricsListResponse {
        GirlMetricsListResponse {
            girls: domain.into_iter().map(Self::to_metrics_dto).collect(),
        }
    }
}

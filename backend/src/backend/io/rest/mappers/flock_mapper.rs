use shared::{
    CreateFlockRequest, Flock as SharedFlock, FlockType as SharedFlockType, UpdateFlockRequest,
};

use crate::backend::domain::commands::flocks::{CreateFlockCommand, UpdateFlockCommand};
use crate::backend::domain::models::flock::{Flock as DomainFlock, FlockType as DomainFlockType};

pub struct FlockMapper;

impl FlockMapper {
    pub fn to_dto(domain: DomainFlock) -> SharedFlock {
        SharedFlock {
            id: domain.id,
            name: domain.name,
            slug: domain.slug,
            breed: domain.breed,
            flock_type: Self::to_dto_type(domain.flock_type),
            start_date: domain.start_date.format("%Y-%m-%d").to_string(),
            initial_population: domain.initial_population,
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }

    pub fn to_create_command(request: CreateFlockRequest) -> CreateFlockCommand {
        CreateFlockCommand {
            name: request.name,
            breed: request.breed,
            flock_type: Self::to_domain_type(request.flock_type),
            start_date: request.start_date,
            initial_population: request.initial_population,
        }
    }

    pub fn to_update_command(flock_id: String, request: UpdateFlockRequest) -> UpdateFlockCommand {
        UpdateFlockCommand {
            flock_id,
            name: request.name,
            breed: request.breed,
        }
    }

    pub fn to_domain_type(dto_type: SharedFlockType) -> DomainFlockType {
        match dto_type {
            SharedFlockType::Grower => DomainFlockType::Grower,
            SharedFlockType::Layer => DomainFlockType::Layer,
        }
    }

    pub fn to_dto_type(domain_type: DomainFlockType) -> SharedFlockType {
        match domain_type {
            DomainFlockType::Grower => SharedFlockType::Grower,
            DomainFlockType::Layer => SharedFlockType::Layer,
        }
    }
}

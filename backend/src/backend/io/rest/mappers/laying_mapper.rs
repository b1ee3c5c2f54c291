use shared::{CreateLayingRecordRequest, LayingRecord as SharedLayingRecord};

use crate::backend::domain::commands::laying::CreateLayingRecordCommand;
use crate::backend::domain::models::laying::LayingRecord as DomainLayingRecord;

pub struct LayingMapper;

impl LayingMapper {
    pub fn to_dto(domain: DomainLayingRecord) -> SharedLayingRecord {
        SharedLayingRecord {
            id: domain.id,
            flock_id: domain.flock_id,
            date: domain.date.format("%Y-%m-%d").to_string(),
            previous_population: domain.previous_population,
            dead_count: domain.dead_count,
            culled_count: domain.culled_count,
            current_population: domain.current_population,
            feed_sacks: domain.feed_sacks,
            feed_grams: domain.feed_grams,
            egg_trays: domain.egg_trays,
            extra_eggs: domain.extra_eggs,
            eggs_collected: domain.eggs_collected,
            production_rate: domain.production_rate,
            created_at: domain.created_at.to_rfc3339(),
            created_by: domain.created_by,
        }
    }

    pub fn to_create_command(
        flock_id: String,
        request: CreateLayingRecordRequest,
        created_by: String,
    ) -> CreateLayingRecordCommand {
        CreateLayingRecordCommand {
            flock_id,
            date: request.date,
            dead_count: request.dead_count,
            culled_count: request.culled_count,
            feed_sacks: request.feed_sacks,
            egg_trays: request.egg_trays,
            extra_eggs: request.extra_eggs,
            created_by,
        }
    }
}

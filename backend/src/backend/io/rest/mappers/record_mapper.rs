use shared::{
    CatalogEntry as SharedCatalogEntry, CatalogResponse, CreateRecordRequest,
    DailyRecord as SharedDailyRecord, FieldKind as SharedFieldKind, FieldSpec as SharedFieldSpec,
    NamedItem as SharedNamedItem, RecordDefaultsResponse, RecordFormSchemaResponse,
    UpdateRecordRequest,
};

use crate::backend::domain::catalog::{Catalog, Catalogs};
use crate::backend::domain::commands::records::{
    CreateRecordCommand, ItemInput, RecordDefaultsResult, RecordForm, UpdateRecordCommand,
};
use crate::backend::domain::models::record::{DailyRecord as DomainRecord, NamedItem};
use crate::backend::domain::schema::{FieldKind, FieldSpec};

pub struct RecordMapper;

impl RecordMapper {
    pub fn to_dto(domain: DomainRecord) -> SharedDailyRecord {
        SharedDailyRecord {
            id: domain.id,
            flock_id: domain.flock_id,
            date: domain.date.format("%Y-%m-%d").to_string(),
            day_age: domain.day_age,
            week_age: domain.week_age,
            previous_population: domain.previous_population,
            feed_grams: domain.feed_grams,
            dead_count: domain.dead_count,
            current_population: domain.current_population,
            medications: domain.medications.into_iter().map(Self::item_to_dto).collect(),
            vaccinations: domain
                .vaccinations
                .into_iter()
                .map(Self::item_to_dto)
                .collect(),
            created_at: domain.created_at.to_rfc3339(),
            created_by: domain.created_by,
        }
    }

    pub fn to_create_command(
        flock_id: String,
        request: CreateRecordRequest,
        created_by: String,
    ) -> CreateRecordCommand {
        CreateRecordCommand {
            flock_id,
            form: RecordForm {
                date: request.date,
                feed_grams: request.feed_grams,
                dead_count: request.dead_count,
                medications: Self::to_item_input(request.medication_ids, request.medications_text),
                vaccinations: Self::to_item_input(
                    request.vaccination_ids,
                    request.vaccinations_text,
                ),
            },
            created_by,
        }
    }

    pub fn to_update_command(
        flock_id: String,
        record_id: String,
        request: UpdateRecordRequest,
    ) -> UpdateRecordCommand {
        UpdateRecordCommand {
            flock_id,
            record_id,
            feed_grams: request.feed_grams,
            dead_count: request.dead_count,
            medications: Self::to_item_input(request.medication_ids, request.medications_text),
            vaccinations: Self::to_item_input(request.vaccination_ids, request.vaccinations_text),
        }
    }

    pub fn defaults_to_dto(result: RecordDefaultsResult) -> RecordDefaultsResponse {
        RecordDefaultsResponse {
            date: result.defaults.date.format("%Y-%m-%d").to_string(),
            day_age: result.defaults.day_age,
            week_age: result.defaults.week_age,
            previous_population: result.defaults.previous_population,
            dead_count_options: result.dead_count_options,
        }
    }

    pub fn schema_to_dto(schema: &[FieldSpec]) -> RecordFormSchemaResponse {
        RecordFormSchemaResponse {
            fields: schema
                .iter()
                .map(|spec| SharedFieldSpec {
                    name: spec.name.to_string(),
                    kind: Self::kind_to_dto(spec.kind),
                    read_only: spec.read_only,
                    min: spec.min,
                })
                .collect(),
        }
    }

    pub fn catalogs_to_dto(catalogs: &Catalogs) -> CatalogResponse {
        CatalogResponse {
            medications: Self::catalog_to_dto(&catalogs.medications),
            vaccinations: Self::catalog_to_dto(&catalogs.vaccinations),
        }
    }

    fn catalog_to_dto(catalog: &Catalog) -> Vec<SharedCatalogEntry> {
        catalog
            .entries()
            .iter()
            .map(|entry| SharedCatalogEntry {
                identifier: entry.identifier.clone(),
                display_name: entry.display_name.clone(),
            })
            .collect()
    }

    /// Structured catalog selection wins over legacy free text when a
    /// request carries both.
    fn to_item_input(identifiers: Option<Vec<String>>, text: Option<String>) -> ItemInput {
        match (identifiers, text) {
            (Some(identifiers), _) => ItemInput::Selected(identifiers),
            (None, Some(text)) if !text.trim().is_empty() => ItemInput::FreeText(text),
            _ => ItemInput::Empty,
        }
    }

    fn item_to_dto(item: NamedItem) -> SharedNamedItem {
        SharedNamedItem {
            name: item.name,
            slug: item.slug,
        }
    }

    fn kind_to_dto(kind: FieldKind) -> SharedFieldKind {
        match kind {
            FieldKind::Date => SharedFieldKind::Date,
            FieldKind::Integer => SharedFieldKind::Integer,
            FieldKind::Decimal => SharedFieldKind::Decimal,
            FieldKind::MultiSelect => SharedFieldKind::MultiSelect,
            FieldKind::Text => SharedFieldKind::Text,
        }
    }
}

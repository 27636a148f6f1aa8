//! Repository layer: connector operations over a [`HubClient`](crate::hub::HubClient)

pub mod database;
pub mod golden_record;
pub mod match_entity;
pub mod quarantine;
pub mod type_provider;

pub use database::RawDatabase;
pub use golden_record::GoldenRecordRepository;
pub use match_entity::MatchEntityRepository;
pub use quarantine::QuarantineRepository;
pub use type_provider::{TypeProvider, describe_universes};

use crate::error::{ConnectorError, Result};
use crate::hub::{BatchEntity, BatchUpdateRequest};
use crate::matching::group_by_source;
use crate::records::{FlatRecord, RecordMapper, ensure_identifier};
use crate::schema::Universe;

/// Build one batch per source for the given records
///
/// Records without an external id get one first, written into the universe id field.
/// Each entity in the batch carries its external id in that field.
pub(crate) fn batch_requests(
    universe: &Universe,
    records: &mut [FlatRecord],
    op: Option<&str>,
) -> Result<Vec<BatchUpdateRequest>> {
    let id_field = universe
        .id_field()
        .ok_or_else(|| ConnectorError::MissingIdField {
            universe: universe.id.clone(),
        })?;

    for record in records.iter_mut() {
        ensure_identifier(record, Some(id_field));
    }

    let mapper = RecordMapper::for_universe(universe);
    let model_name = universe.model_name();

    let requests = group_by_source(records)?
        .into_iter()
        .map(|group| BatchUpdateRequest {
            source: group.source_id,
            entities: group
                .records
                .into_iter()
                .map(|record| BatchEntity {
                    op: op.map(str::to_string),
                    entity: mapper.to_entity(record, model_name),
                })
                .collect(),
        })
        .collect();

    Ok(requests)
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::records::Entity;
    use serde_json::json;

    #[test]
    fn test_batch_requests_group_and_back_fill() {
        let universe = customer_universe();
        let mut records = vec![
            customer("1", "Acme", "crm"),
            customer("", "Globex", ""),
            customer("3", "Initech", "crm"),
        ];

        let requests = batch_requests(&universe, &mut records, Some("DELETE")).unwrap();

        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].source, "crm");
        assert_eq!(requests[0].entities.len(), 2);
        assert_eq!(requests[1].source, "DEFAULT");
        assert!(requests.iter().flat_map(|r| &r.entities).all(|e| e.op.as_deref() == Some("DELETE")));

        let generated = records[1].external_id.clone();
        assert!(!generated.is_empty());
        let expected: Entity = serde_json::from_value(json!({
            "Customer": { "id": generated, "name": "Globex" }
        }))
        .unwrap();
        assert!(requests[1].entities[0].entity.equivalent(&expected));
    }

    #[test]
    fn test_batch_requests_need_id_field() {
        let mut universe = customer_universe();
        if let Some(layout) = universe.layout.as_mut() {
            layout.id_xpath.clear();
        }

        let err = batch_requests(&universe, &mut [customer("1", "Acme", "crm")], None).unwrap_err();
        assert!(matches!(err, ConnectorError::MissingIdField { .. }));
    }
}

//! Quarantine entry reads

use std::sync::Arc;

use anyhow::Context;

use crate::constants::{
    CAUSE_FIELD, CREATED_DATE_FIELD, END_DATE_FIELD, REASON_FIELD, RESOLUTION_FIELD,
    SOURCE_ENTITY_ID_FIELD, SOURCE_ID_FIELD, TRANSACTION_ID_FIELD,
};
use crate::error::Result;
use crate::hub::{HubClient, QuarantineEntry};
use crate::naming::quarantine_type_name;
use crate::query::{ListFilter, translate_quarantine};
use crate::records::{FlatRecord, Property, RecordMapper, dates};
use crate::schema::ContentType;

pub struct QuarantineRepository {
    client: Arc<dyn HubClient>,
}

impl QuarantineRepository {
    pub fn new(client: Arc<dyn HubClient>) -> Self {
        Self { client }
    }

    /// Query a universe's quarantine entries
    pub async fn find_all(&self, universe_id: &str, filter: Option<&ListFilter>) -> Result<Vec<FlatRecord>> {
        let universe = self
            .client
            .find_universe(universe_id)
            .await
            .with_context(|| format!("Failed to load universe {}", universe_id))?;

        let request = translate_quarantine(filter)?;
        let response = self
            .client
            .query_quarantine_entries(universe_id, &request)
            .await
            .context("Failed to query quarantine entries")?;

        let type_name = quarantine_type_name(universe_id);
        let mapper = RecordMapper::new().with_schema(universe.fields());

        let records: Vec<FlatRecord> = response
            .entries
            .iter()
            .map(|entry| entry_record(&mapper, &type_name, entry))
            .collect();

        log::info!(
            "Loaded {} quarantine entries from universe {}",
            records.len(),
            universe_id
        );
        Ok(records)
    }
}

fn entry_record(mapper: &RecordMapper, type_name: &str, entry: &QuarantineEntry) -> FlatRecord {
    let mut record = mapper
        .to_record(type_name, &entry.transaction_id, &entry.entity, None)
        .unwrap_or_else(|| FlatRecord::new(type_name, entry.transaction_id.as_str()));

    record.properties.retain(has_data);

    let text = |value: &Option<String>| value.clone();
    let date = |value: &Option<String>| value.as_deref().map(dates::hub_to_engine);

    record.properties.extend([
        Property::typed(CAUSE_FIELD, ContentType::Text, text(&entry.cause)),
        Property::datetime(CREATED_DATE_FIELD, date(&entry.created_date)),
        Property::datetime(END_DATE_FIELD, date(&entry.end_date)),
        Property::typed(REASON_FIELD, ContentType::Text, text(&entry.reason)),
        Property::typed(RESOLUTION_FIELD, ContentType::Text, text(&entry.resolution)),
        Property::content(TRANSACTION_ID_FIELD, entry.transaction_id.as_str()),
        Property::typed(SOURCE_ENTITY_ID_FIELD, ContentType::Text, text(&entry.source_entity_id)),
        Property::typed(SOURCE_ID_FIELD, ContentType::Text, text(&entry.source_id)),
    ]);

    record
}

/// Object properties are kept only when some child record has properties
fn has_data(property: &Property) -> bool {
    match property.objects() {
        Some(children) => children.iter().any(|child| !child.properties.is_empty()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::memory::MemoryHub;
    use crate::query::FilterWhere;
    use crate::repository::fixtures::customer_universe;
    use crate::constants::STATUS_FIELD;
    use serde_json::json;

    #[tokio::test]
    async fn test_find_all_maps_entries() {
        let mut hub = MemoryHub::with_universe(customer_universe());
        hub.quarantine_entries = serde_json::from_value(json!({
            "resultCount": 1,
            "entries": [{
                "transactionId": "tx-1",
                "sourceId": "crm",
                "sourceEntityId": "c-1",
                "cause": "DUPLICATE",
                "reason": "Looks like 42",
                "createdDate": "2018-02-04T12:34:00Z",
                "entity": {
                    "Customer": {
                        "id": "c-1",
                        "name": "Acme",
                        "born": "",
                        "address": {}
                    }
                }
            }]
        }))
        .unwrap();
        let hub = Arc::new(hub);
        let repository = QuarantineRepository::new(hub.clone());
        let filter = ListFilter::default().with_where(FilterWhere::new(STATUS_FIELD, "Equal", "ACTIVE"));

        let records = repository.find_all("u1", Some(&filter)).await.unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.developer_name, "u1-quarantine");
        assert_eq!(record.external_id, "tx-1");

        let values: Vec<(&str, Option<&str>)> = record
            .properties
            .iter()
            .map(|p| (p.developer_name.as_str(), p.as_content()))
            .collect();
        assert_eq!(
            values,
            vec![
                ("id", Some("c-1")),
                ("name", Some("Acme")),
                (CAUSE_FIELD, Some("DUPLICATE")),
                (CREATED_DATE_FIELD, Some("2018-02-04T12:34Z")),
                (END_DATE_FIELD, None),
                (REASON_FIELD, Some("Looks like 42")),
                (RESOLUTION_FIELD, None),
                (TRANSACTION_ID_FIELD, Some("tx-1")),
                (SOURCE_ENTITY_ID_FIELD, Some("c-1")),
                (SOURCE_ID_FIELD, Some("crm")),
            ]
        );

        let queries = hub.quarantine_queries.lock().unwrap();
        assert_eq!(queries[0].entry_type.as_deref(), Some("ACTIVE"));
        assert!(queries[0].include_data);
    }

    #[tokio::test]
    async fn test_entry_without_entity() {
        let mut hub = MemoryHub::with_universe(customer_universe());
        hub.quarantine_entries.entries.push(QuarantineEntry {
            transaction_id: "tx-2".to_string(),
            ..Default::default()
        });
        let repository = QuarantineRepository::new(Arc::new(hub));

        let records = repository.find_all("u1", None).await.unwrap();
        assert_eq!(records[0].external_id, "tx-2");
        assert_eq!(records[0].properties.len(), 8);
    }
}

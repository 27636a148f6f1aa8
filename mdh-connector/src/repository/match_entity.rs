//! Match requests against a universe

use std::sync::Arc;

use anyhow::Context;

use super::batch_requests;
use crate::error::{ConnectorError, Result};
use crate::hub::HubClient;
use crate::matching::{MatchContext, assemble};
use crate::records::FlatRecord;

pub struct MatchEntityRepository {
    client: Arc<dyn HubClient>,
}

impl MatchEntityRepository {
    pub fn new(client: Arc<dyn HubClient>) -> Self {
        Self { client }
    }

    /// Match records against a universe, enriching them in place with matches,
    /// duplicates and already-linked entities
    pub async fn match_entities(&self, universe_id: &str, records: &mut [FlatRecord]) -> Result<()> {
        let universe = self
            .client
            .find_universe(universe_id)
            .await
            .with_context(|| format!("Failed to load universe {}", universe_id))?;

        let id_field = universe
            .id_field()
            .ok_or_else(|| ConnectorError::MissingIdField {
                universe: universe.id.clone(),
            })?;

        let requests = batch_requests(&universe, records, None)?;

        let mut results = Vec::new();
        for request in &requests {
            let response = self
                .client
                .query_match_entity(universe_id, request)
                .await
                .with_context(|| format!("Failed to match entities from source {}", request.source))?;
            log::debug!(
                "Source {} returned {} match results for {} entities",
                request.source,
                response.match_results.len(),
                request.entities.len()
            );
            results.extend(response.match_results);
        }

        let ctx = MatchContext::new(universe_id, universe.model_name(), id_field).with_schema(universe.fields());
        assemble(records, &results, &ctx);

        log::info!(
            "Matched {} records against universe {} ({} results)",
            records.len(),
            universe_id,
            results.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ALREADY_LINKED_FIELD, DUPLICATE_FIELD, FUZZY_MATCH_DETAILS_FIELD, MATCH_FIELD};
    use crate::hub::memory::MemoryHub;
    use crate::matching::MatchEntityResponse;
    use crate::repository::fixtures::{customer, customer_universe};
    use serde_json::json;

    #[tokio::test]
    async fn test_match_entities_end_to_end() {
        let mut hub = MemoryHub::with_universe(customer_universe());
        let crm: MatchEntityResponse = serde_json::from_value(json!({
            "matchResults": [{
                "status": "SUCCESS",
                "entity": { "Customer": { "id": "A", "name": "Acme" } },
                "match": [{
                    "Customer": { "id": "G1", "name": "Acme Inc", "address": { "city": "NYC" } },
                    "fuzzyMatchDetails": {
                        "field": "name",
                        "first": "Acme",
                        "second": "Acme Inc",
                        "method": "jarowinkler",
                        "matchStrength": 0.90666664,
                        "threshold": 0.85
                    }
                }]
            }]
        }))
        .unwrap();
        let erp: MatchEntityResponse = serde_json::from_value(json!({
            "matchResults": [{
                "status": "ALREADY_LINKED",
                "entity": { "Customer": { "id": "B", "name": "Globex" } }
            }]
        }))
        .unwrap();
        hub.match_responses.insert("crm".to_string(), crm);
        hub.match_responses.insert("erp".to_string(), erp);
        let hub = Arc::new(hub);
        let repository = MatchEntityRepository::new(hub.clone());

        let mut records = vec![
            customer("A", "Acme", "crm"),
            customer("B", "Globex", "erp"),
            customer("C", "Initech", "crm"),
        ];
        records[0].developer_name = "u1-match".to_string();

        repository.match_entities("u1", &mut records).await.unwrap();

        let requests = hub.match_requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].source, "crm");
        assert_eq!(requests[0].entities.len(), 2);

        let matches = records[0].objects(MATCH_FIELD).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].external_id, "G1");
        assert_eq!(matches[0].developer_name, "u1-match");
        assert_eq!(
            matches[0].objects("address").unwrap()[0].developer_name,
            "Customer - address"
        );
        let details = &matches[0].objects(FUZZY_MATCH_DETAILS_FIELD).unwrap()[0];
        assert_eq!(details.content("Match Strength"), Some("0.90666664"));
        assert_eq!(details.content("Threshold"), Some("0.85"));

        let linked = records[1].objects(ALREADY_LINKED_FIELD).unwrap();
        assert_eq!(linked[0].external_id, "B");
        assert!(records[1].objects(MATCH_FIELD).unwrap().is_empty());

        for field in [MATCH_FIELD, DUPLICATE_FIELD, ALREADY_LINKED_FIELD] {
            assert!(records[2].objects(field).unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_match_entities_missing_source() {
        let hub = Arc::new(MemoryHub::with_universe(customer_universe()));
        let repository = MatchEntityRepository::new(hub.clone());
        let mut records = vec![FlatRecord::new("u1-match", "A")];

        let err = repository.match_entities("u1", &mut records).await.unwrap_err();
        assert!(matches!(err, ConnectorError::MissingSourceId));
        assert!(hub.match_requests.lock().unwrap().is_empty());
    }
}

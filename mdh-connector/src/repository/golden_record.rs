//! Golden-record reads and batch writes

use std::sync::Arc;

use anyhow::Context;

use super::batch_requests;
use crate::constants::{CREATED_DATE_FIELD, UPDATED_DATE_FIELD};
use crate::error::Result;
use crate::hub::{DELETE_OP, HubClient};
use crate::naming::golden_record_type_name;
use crate::query::{ListFilter, translate_with};
use crate::records::{FlatRecord, Property, RecordMapper, dates};

pub struct GoldenRecordRepository {
    client: Arc<dyn HubClient>,
}

impl GoldenRecordRepository {
    pub fn new(client: Arc<dyn HubClient>) -> Self {
        Self { client }
    }

    /// Query a universe's golden records
    ///
    /// Filter columns are resolved to hub field ids through the universe layout. Each
    /// record carries its links, record id and created/updated dates after its fields.
    pub async fn find_all(&self, universe_id: &str, filter: Option<&ListFilter>) -> Result<Vec<FlatRecord>> {
        let universe = self
            .client
            .find_universe(universe_id)
            .await
            .with_context(|| format!("Failed to load universe {}", universe_id))?;

        let request = translate_with(filter, |column| universe.field_id(column))?;
        let response = self
            .client
            .query_golden_records(universe_id, &request)
            .await
            .context("Failed to query golden records")?;

        if response.result_count == 0 {
            log::info!("No golden records found in universe {}", universe_id);
            return Ok(Vec::new());
        }
        let entries = response.records.unwrap_or_default();

        let type_name = golden_record_type_name(universe_id);
        let mapper = RecordMapper::for_universe(&universe);

        let records: Vec<FlatRecord> = entries
            .iter()
            .filter_map(|entry| {
                let mut record =
                    mapper.to_record(&type_name, &entry.record_id, &entry.entity, Some(entry.links.as_slice()))?;
                record.properties.push(Property::datetime(
                    CREATED_DATE_FIELD,
                    entry.created_date.as_deref().map(dates::hub_to_engine),
                ));
                record.properties.push(Property::datetime(
                    UPDATED_DATE_FIELD,
                    entry.updated_date.as_deref().map(dates::hub_to_engine),
                ));
                Some(record)
            })
            .collect();

        log::info!(
            "Loaded {} golden records from universe {} ({} reported)",
            records.len(),
            universe_id,
            response.result_count
        );
        Ok(records)
    }

    /// Create or update golden records, one batch per source
    pub async fn update(&self, universe_id: &str, records: &mut [FlatRecord]) -> Result<()> {
        self.submit(universe_id, records, None).await
    }

    /// Delete golden records, one batch per source
    pub async fn delete(&self, universe_id: &str, records: &mut [FlatRecord]) -> Result<()> {
        self.submit(universe_id, records, Some(DELETE_OP)).await
    }

    async fn submit(&self, universe_id: &str, records: &mut [FlatRecord], op: Option<&str>) -> Result<()> {
        let universe = self
            .client
            .find_universe(universe_id)
            .await
            .with_context(|| format!("Failed to load universe {}", universe_id))?;

        let requests = batch_requests(&universe, records, op)?;
        for request in &requests {
            log::info!(
                "Submitting {} entities from source {} to universe {}",
                request.entities.len(),
                request.source,
                universe_id
            );
            self.client
                .update_golden_records(universe_id, request)
                .await
                .with_context(|| format!("Failed to update golden records from source {}", request.source))?;
        }

        Ok(())
    }
}

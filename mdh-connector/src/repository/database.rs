//! Routing of raw record operations by type name
//!
//! `<universe>-golden-record` supports find-all, save and delete; `<universe>-quarantine`
//! find-all only; `<universe>-match` find-all over the submitted records only.

use std::sync::Arc;

use super::{GoldenRecordRepository, MatchEntityRepository, QuarantineRepository};
use crate::error::{ConnectorError, Result};
use crate::hub::HubClient;
use crate::naming::TypeKind;
use crate::query::ListFilter;
use crate::records::FlatRecord;

pub struct RawDatabase {
    golden_records: GoldenRecordRepository,
    quarantine: QuarantineRepository,
    matches: MatchEntityRepository,
}

impl RawDatabase {
    pub fn new(client: Arc<dyn HubClient>) -> Self {
        RawDatabase {
            golden_records: GoldenRecordRepository::new(client.clone()),
            quarantine: QuarantineRepository::new(client.clone()),
            matches: MatchEntityRepository::new(client),
        }
    }

    /// Single-record loads are not available for any type
    pub async fn find(&self, type_name: &str, external_id: &str) -> Result<FlatRecord> {
        log::debug!("Rejecting load of {} from {}", external_id, type_name);
        Err(ConnectorError::unsupported(type_name, "loading"))
    }

    /// List records of a type
    ///
    /// For match types the `submitted` records are matched and returned enriched; other
    /// types ignore them.
    pub async fn find_all(
        &self,
        type_name: &str,
        filter: Option<&ListFilter>,
        mut submitted: Vec<FlatRecord>,
    ) -> Result<Vec<FlatRecord>> {
        log::info!("Listing records of {}", type_name);
        match TypeKind::from_type_name(type_name) {
            Some((TypeKind::GoldenRecord, universe_id)) => {
                self.golden_records.find_all(universe_id, filter).await
            }
            Some((TypeKind::Quarantine, universe_id)) => self.quarantine.find_all(universe_id, filter).await,
            Some((TypeKind::Match, universe_id)) => {
                self.matches.match_entities(universe_id, &mut submitted).await?;
                Ok(submitted)
            }
            None => Err(ConnectorError::unsupported(type_name, "loading")),
        }
    }

    pub async fn create(&self, type_name: &str, records: Vec<FlatRecord>) -> Result<Vec<FlatRecord>> {
        self.save(type_name, records).await
    }

    pub async fn update(&self, type_name: &str, records: Vec<FlatRecord>) -> Result<Vec<FlatRecord>> {
        self.save(type_name, records).await
    }

    pub async fn delete(&self, type_name: &str, mut records: Vec<FlatRecord>) -> Result<()> {
        match TypeKind::from_type_name(type_name) {
            Some((TypeKind::GoldenRecord, universe_id)) => {
                log::info!("Deleting {} records of {}", records.len(), type_name);
                self.golden_records.delete(universe_id, &mut records).await
            }
            _ => Err(ConnectorError::unsupported(type_name, "deleting")),
        }
    }

    async fn save(&self, type_name: &str, mut records: Vec<FlatRecord>) -> Result<Vec<FlatRecord>> {
        match TypeKind::from_type_name(type_name) {
            Some((TypeKind::GoldenRecord, universe_id)) => {
                log::info!("Saving {} records of {}", records.len(), type_name);
                self.golden_records.update(universe_id, &mut records).await?;
                Ok(records)
            }
            _ => Err(ConnectorError::unsupported(type_name, "saving")),
        }
    }
}

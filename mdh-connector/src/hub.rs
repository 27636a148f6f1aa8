//! Master-data hub boundary
//!
//! The connector never talks HTTP itself; it drives a [`HubClient`] and translates what
//! comes back. Request/response payloads are modeled here.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::matching::MatchEntityResponse;
use crate::query::{GoldenRecordQueryRequest, QuarantineQueryRequest};
use crate::records::Entity;
use crate::schema::Universe;

/// Operation marker for batch entities that should be removed
pub const DELETE_OP: &str = "DELETE";

/// A link between a golden record and a source entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub source: String,
    pub entity_id: String,
    #[serde(default)]
    pub established_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoldenRecordEntry {
    pub record_id: String,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub updated_date: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
    /// Enveloped entity (`{ model: fields }`)
    #[serde(default)]
    pub entity: Entity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoldenRecordQueryResponse {
    #[serde(default)]
    pub result_count: u64,
    #[serde(default)]
    pub records: Option<Vec<GoldenRecordEntry>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarantineEntry {
    #[serde(default)]
    pub transaction_id: String,
    #[serde(default)]
    pub source_id: Option<String>,
    #[serde(default)]
    pub source_entity_id: Option<String>,
    #[serde(default)]
    pub cause: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    /// Enveloped entity held in quarantine
    #[serde(default)]
    pub entity: Entity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarantineQueryResponse {
    #[serde(default)]
    pub result_count: u64,
    #[serde(default)]
    pub entries: Vec<QuarantineEntry>,
}

/// One entity in a batch; `op` is absent for upserts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op: Option<String>,
    #[serde(flatten)]
    pub entity: Entity,
}

impl BatchEntity {
    pub fn upsert(entity: Entity) -> Self {
        BatchEntity { op: None, entity }
    }

    pub fn delete(entity: Entity) -> Self {
        BatchEntity {
            op: Some(DELETE_OP.to_string()),
            entity,
        }
    }
}

/// Entities submitted together under one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchUpdateRequest {
    pub source: String,
    pub entities: Vec<BatchEntity>,
}

/// Calls the connector makes against the hub
#[async_trait]
pub trait HubClient: Send + Sync {
    async fn find_universe(&self, universe_id: &str) -> Result<Universe>;

    async fn find_universes(&self) -> Result<Vec<Universe>>;

    async fn query_golden_records(
        &self,
        universe_id: &str,
        request: &GoldenRecordQueryRequest,
    ) -> Result<GoldenRecordQueryResponse>;

    async fn query_quarantine_entries(
        &self,
        universe_id: &str,
        request: &QuarantineQueryRequest,
    ) -> Result<QuarantineQueryResponse>;

    /// Submit a batch; the hub applies it asynchronously
    async fn update_golden_records(&self, universe_id: &str, request: &BatchUpdateRequest) -> Result<()>;

    async fn query_match_entity(
        &self,
        universe_id: &str,
        request: &BatchUpdateRequest,
    ) -> Result<MatchEntityResponse>;
}

//! Hub-side query requests

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::filter::CriteriaType;
use crate::records::dates;

/// Inclusive timestamp range; either end may be open
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl DateFilter {
    /// Fold one comparison into the range
    ///
    /// Returns `false` when the operator does not describe a range bound.
    pub fn apply(&mut self, criteria: &CriteriaType, value: &DateTime<Utc>) -> bool {
        let value = dates::to_hub(value);
        match criteria {
            CriteriaType::Equal => {
                self.from = Some(value.clone());
                self.to = Some(value);
            }
            CriteriaType::GreaterThan | CriteriaType::GreaterThanOrEqual => self.from = Some(value),
            CriteriaType::LessThan | CriteriaType::LessThanOrEqual => self.to = Some(value),
            _ => return false,
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortField {
    pub field_name: String,
    pub direction: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    #[serde(default)]
    pub fields: Vec<SortField>,
}

/// A predicate on an ordinary field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValue {
    pub field_id: String,
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoldenRecordFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<DateFilter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_value: Vec<FieldValue>,
}

/// Golden-record query sent to the hub
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldenRecordQueryRequest {
    #[serde(default)]
    pub sort: Sort,
    #[serde(default)]
    pub filter: GoldenRecordFilter,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarantineFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_entity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateFilter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cause: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resolution: Vec<String>,
}

/// Quarantine query sent to the hub
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarantineQueryRequest {
    /// Entry status to list (`ACTIVE`, `RESOLVED`, ...)
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub entry_type: Option<String>,
    #[serde(default)]
    pub filter: QuarantineFilter,
    #[serde(default)]
    pub include_data: bool,
}

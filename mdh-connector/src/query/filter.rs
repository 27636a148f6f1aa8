//! Host-side list filter

use serde::{Deserialize, Serialize};

/// Comparison operators the host can put in a where clause
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CriteriaType {
    Contains,
    EndsWith,
    Equal,
    GreaterThan,
    GreaterThanOrEqual,
    IsEmpty,
    LessThan,
    LessThanOrEqual,
    NotEqual,
    StartsWith,
    Other(String),
}

impl CriteriaType {
    pub fn as_str(&self) -> &str {
        match self {
            CriteriaType::Contains => "Contains",
            CriteriaType::EndsWith => "EndsWith",
            CriteriaType::Equal => "Equal",
            CriteriaType::GreaterThan => "GreaterThan",
            CriteriaType::GreaterThanOrEqual => "GreaterThanOrEqual",
            CriteriaType::IsEmpty => "IsEmpty",
            CriteriaType::LessThan => "LessThan",
            CriteriaType::LessThanOrEqual => "LessThanOrEqual",
            CriteriaType::NotEqual => "NotEqual",
            CriteriaType::StartsWith => "StartsWith",
            CriteriaType::Other(other) => other,
        }
    }
}

impl From<String> for CriteriaType {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "contains" => CriteriaType::Contains,
            "endswith" => CriteriaType::EndsWith,
            "equal" => CriteriaType::Equal,
            "greaterthan" => CriteriaType::GreaterThan,
            "greaterthanorequal" => CriteriaType::GreaterThanOrEqual,
            "isempty" => CriteriaType::IsEmpty,
            "lessthan" => CriteriaType::LessThan,
            "lessthanorequal" => CriteriaType::LessThanOrEqual,
            "notequal" => CriteriaType::NotEqual,
            "startswith" => CriteriaType::StartsWith,
            _ => CriteriaType::Other(value),
        }
    }
}

impl From<&str> for CriteriaType {
    fn from(value: &str) -> Self {
        CriteriaType::from(value.to_string())
    }
}

impl From<CriteriaType> for String {
    fn from(value: CriteriaType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for CriteriaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One where clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterWhere {
    pub column_name: String,
    pub criteria_type: CriteriaType,
    #[serde(default)]
    pub content_value: Option<String>,
}

impl FilterWhere {
    pub fn new(
        column_name: impl Into<String>,
        criteria_type: impl Into<CriteriaType>,
        content_value: impl Into<String>,
    ) -> Self {
        FilterWhere {
            column_name: column_name.into(),
            criteria_type: criteria_type.into(),
            content_value: Some(content_value.into()),
        }
    }

    pub fn value(&self) -> &str {
        self.content_value.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBy {
    pub column_name: String,
    #[serde(default)]
    pub direction: String,
}

/// Sort and where clauses for a find-all
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilter {
    #[serde(default)]
    pub order_by: Vec<OrderBy>,
    #[serde(default, rename = "where")]
    pub where_clauses: Vec<FilterWhere>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

impl ListFilter {
    pub fn with_where(mut self, clause: FilterWhere) -> Self {
        self.where_clauses.push(clause);
        self
    }

    pub fn with_order_by(mut self, column_name: impl Into<String>, direction: impl Into<String>) -> Self {
        self.order_by.push(OrderBy {
            column_name: column_name.into(),
            direction: direction.into(),
        });
        self
    }
}

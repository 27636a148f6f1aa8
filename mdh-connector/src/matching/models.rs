//! Match engine responses

use serde::{Deserialize, Serialize};

use crate::constants::{
    FUZZY_FIELD, FUZZY_FIRST, FUZZY_MATCH_DETAILS_TYPE, FUZZY_MATCH_STRENGTH, FUZZY_METHOD,
    FUZZY_SECOND, FUZZY_THRESHOLD, HUB_FUZZY_MATCH_DETAILS_KEY,
};
use crate::records::{Entity, EntityValue, FlatRecord, Property, new_identifier};
use crate::schema::ContentType;

/// Outcome of matching one submitted entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MatchStatus {
    Success,
    AlreadyLinked,
    Other(String),
}

impl MatchStatus {
    pub fn as_str(&self) -> &str {
        match self {
            MatchStatus::Success => "SUCCESS",
            MatchStatus::AlreadyLinked => "ALREADY_LINKED",
            MatchStatus::Other(other) => other,
        }
    }
}

impl From<String> for MatchStatus {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "SUCCESS" => MatchStatus::Success,
            "ALREADY_LINKED" => MatchStatus::AlreadyLinked,
            _ => MatchStatus::Other(value),
        }
    }
}

impl From<MatchStatus> for String {
    fn from(value: MatchStatus) -> Self {
        value.as_str().to_string()
    }
}

/// How strongly a candidate matched on one field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuzzyMatchDetails {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub first: Option<String>,
    #[serde(default)]
    pub second: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub match_strength: Option<f64>,
    #[serde(default)]
    pub threshold: Option<f64>,
}

impl FuzzyMatchDetails {
    pub fn from_entity(entity: &Entity) -> Self {
        let text = |name: &str| entity.get_scalar(name).map(str::to_string);
        let number = |name: &str| entity.get_scalar(name).and_then(|value| value.trim().parse::<f64>().ok());

        FuzzyMatchDetails {
            field: text("field"),
            first: text("first"),
            second: text("second"),
            method: text("method"),
            match_strength: number("matchStrength"),
            threshold: number("threshold"),
        }
    }

    pub fn to_record(&self) -> FlatRecord {
        let number = |value: Option<f64>| value.map(|value| value.to_string());

        FlatRecord::new(FUZZY_MATCH_DETAILS_TYPE, new_identifier())
            .with_property(Property::typed(FUZZY_FIELD, ContentType::Text, self.field.clone()))
            .with_property(Property::typed(FUZZY_FIRST, ContentType::Text, self.first.clone()))
            .with_property(Property::typed(FUZZY_SECOND, ContentType::Text, self.second.clone()))
            .with_property(Property::typed(FUZZY_METHOD, ContentType::Text, self.method.clone()))
            .with_property(Property::typed(
                FUZZY_MATCH_STRENGTH,
                ContentType::Number,
                number(self.match_strength),
            ))
            .with_property(Property::typed(
                FUZZY_THRESHOLD,
                ContentType::Number,
                number(self.threshold),
            ))
    }
}

/// A match or duplicate: the candidate entity and, optionally, why it matched
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    /// Enveloped candidate entity
    pub entity: Entity,
    pub fuzzy_match_details: Option<FuzzyMatchDetails>,
}

impl MatchCandidate {
    /// Split a hub candidate wrapper (`{ model: {...}, fuzzyMatchDetails: {...} }`)
    pub fn from_wrapper(wrapper: &Entity) -> Self {
        let mut entity = Entity::new();
        let mut fuzzy_match_details = None;

        for (name, value) in wrapper.iter() {
            match value {
                EntityValue::Nested(details) if name == HUB_FUZZY_MATCH_DETAILS_KEY => {
                    fuzzy_match_details = Some(FuzzyMatchDetails::from_entity(details));
                }
                _ => entity.insert(name, value.clone()),
            }
        }

        MatchCandidate {
            entity,
            fuzzy_match_details,
        }
    }

    /// Candidate fields, without the model envelope
    pub fn fields(&self, model_name: &str) -> Option<&Entity> {
        self.entity
            .get_nested(model_name)
            .or_else(|| self.entity.unwrap_envelope().map(|(_, fields)| fields))
    }
}

/// Match engine verdict for one submitted entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub status: MatchStatus,
    #[serde(default)]
    pub match_rule: Option<String>,
    /// The submitted entity, enveloped
    #[serde(default)]
    pub entity: Entity,
    #[serde(default, rename = "match")]
    pub matches: Vec<Entity>,
    #[serde(default, rename = "duplicate")]
    pub duplicates: Vec<Entity>,
    #[serde(default)]
    pub id_resource: Option<String>,
}

impl MatchResult {
    /// The submitted entity's fields
    pub fn subject(&self, model_name: &str) -> Option<&Entity> {
        self.entity
            .get_nested(model_name)
            .or_else(|| self.entity.unwrap_envelope().map(|(_, fields)| fields))
    }

    /// Value of the id field on the submitted entity
    pub fn subject_id(&self, model_name: &str, id_field: &str) -> Option<&str> {
        self.subject(model_name)?.get_scalar(id_field)
    }

    pub fn match_candidates(&self) -> Vec<MatchCandidate> {
        self.matches.iter().map(MatchCandidate::from_wrapper).collect()
    }

    pub fn duplicate_candidates(&self) -> Vec<MatchCandidate> {
        self.duplicates.iter().map(MatchCandidate::from_wrapper).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchEntityResponse {
    #[serde(default)]
    pub match_results: Vec<MatchResult>,
}

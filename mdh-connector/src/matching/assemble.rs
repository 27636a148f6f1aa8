//! Merging match responses back into the submitted records

use super::models::{MatchCandidate, MatchResult, MatchStatus};
use crate::constants::{
    ALREADY_LINKED_FIELD, DEFAULT_SOURCE_ID, DUPLICATE_FIELD, FUZZY_MATCH_DETAILS_FIELD,
    MATCH_FIELD, SOURCE_ID_FIELD,
};
use crate::error::{ConnectorError, Result};
use crate::naming::match_type_name;
use crate::records::{Entity, FlatRecord, Property, RecordMapper, new_identifier};
use crate::schema::FieldDescriptor;

/// What the assembler needs to know about the universe being matched
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    pub universe_id: &'a str,
    pub model_name: &'a str,
    pub id_field: &'a str,
    pub schema: Option<&'a [FieldDescriptor]>,
}

impl<'a> MatchContext<'a> {
    pub fn new(universe_id: &'a str, model_name: &'a str, id_field: &'a str) -> Self {
        MatchContext {
            universe_id,
            model_name,
            id_field,
            schema: None,
        }
    }

    pub fn with_schema(mut self, schema: &'a [FieldDescriptor]) -> Self {
        self.schema = Some(schema);
        self
    }

    fn mapper(&self) -> RecordMapper<'a> {
        match self.schema {
            Some(schema) => RecordMapper::new().with_schema(schema),
            None => RecordMapper::new(),
        }
    }
}

/// Records submitted under one source id
#[derive(Debug)]
pub struct SourceGroup<'r> {
    pub source_id: String,
    pub records: Vec<&'r FlatRecord>,
}

/// Source id of a record; blank values fall back to the default source
pub fn source_id(record: &FlatRecord) -> Result<String> {
    let property = record
        .property(SOURCE_ID_FIELD)
        .ok_or(ConnectorError::MissingSourceId)?;

    Ok(match property.as_content().map(str::trim) {
        Some(source) if !source.is_empty() => source.to_string(),
        _ => DEFAULT_SOURCE_ID.to_string(),
    })
}

/// Group records by source id, in first-seen order
///
/// Fails if any record has no source id property at all.
pub fn group_by_source(records: &[FlatRecord]) -> Result<Vec<SourceGroup<'_>>> {
    let mut groups: Vec<SourceGroup> = Vec::new();

    for record in records {
        let source_id = source_id(record)?;
        match groups.iter_mut().find(|group| group.source_id == source_id) {
            Some(group) => group.records.push(record),
            None => groups.push(SourceGroup {
                source_id,
                records: vec![record],
            }),
        }
    }

    Ok(groups)
}

/// Attach match results to the records they were produced for
///
/// Every record ends up with the matched, duplicate and already-linked list properties.
/// A record is paired with every result whose subject carries its external id in the id
/// field; records with no result keep empty lists.
pub fn assemble(records: &mut [FlatRecord], results: &[MatchResult], ctx: &MatchContext) {
    let mapper = ctx.mapper();
    let match_type = match_type_name(ctx.universe_id);

    for record in records.iter_mut() {
        record.ensure_list_property(MATCH_FIELD);
        record.ensure_list_property(DUPLICATE_FIELD);
        record.ensure_list_property(ALREADY_LINKED_FIELD);

        let external_id = record.external_id.clone();
        let correlated = results
            .iter()
            .filter(|result| result.subject_id(ctx.model_name, ctx.id_field) == Some(external_id.as_str()));

        for result in correlated {
            match &result.status {
                MatchStatus::Success => {
                    let matches: Vec<FlatRecord> = result
                        .match_candidates()
                        .iter()
                        .map(|candidate| candidate_record(&mapper, &match_type, candidate, ctx))
                        .collect();
                    let duplicates: Vec<FlatRecord> = result
                        .duplicate_candidates()
                        .iter()
                        .map(|candidate| candidate_record(&mapper, &match_type, candidate, ctx))
                        .collect();

                    record.ensure_list_property(MATCH_FIELD).extend(matches);
                    record.ensure_list_property(DUPLICATE_FIELD).extend(duplicates);
                }
                MatchStatus::AlreadyLinked => {
                    let subject = result.subject(ctx.model_name).cloned().unwrap_or_default();
                    let linked = entity_record(&mapper, &match_type, &subject, ctx);
                    record.ensure_list_property(ALREADY_LINKED_FIELD).push(linked);
                }
                MatchStatus::Other(status) => {
                    log::warn!(
                        "Ignoring a match result with status {} for record {}",
                        status,
                        external_id
                    );
                }
            }
        }
    }
}

fn candidate_record(
    mapper: &RecordMapper,
    match_type: &str,
    candidate: &MatchCandidate,
    ctx: &MatchContext,
) -> FlatRecord {
    let empty = Entity::new();
    let fields = candidate.fields(ctx.model_name).unwrap_or(&empty);

    let mut record = entity_record(mapper, match_type, fields, ctx);
    record.properties.push(Property::object(
        FUZZY_MATCH_DETAILS_FIELD,
        candidate
            .fuzzy_match_details
            .as_ref()
            .map(|details| details.to_record()),
    ));
    record
}

fn entity_record(mapper: &RecordMapper, match_type: &str, fields: &Entity, ctx: &MatchContext) -> FlatRecord {
    let external_id = fields
        .get_scalar(ctx.id_field)
        .filter(|id| !id.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(new_identifier);

    mapper
        .to_record_fields(match_type, &external_id, ctx.model_name, fields, None)
        .unwrap_or_else(|| FlatRecord::new(match_type, external_id.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FUZZY_MATCH_DETAILS_TYPE;
    use crate::matching::MatchEntityResponse;
    use serde_json::json;

    fn submitted(id: &str, source: Option<&str>) -> FlatRecord {
        let mut record = FlatRecord::new("u1-match", id)
            .with_property(Property::content("id", id))
            .with_property(Property::content("name", format!("name {}", id)));
        if let Some(source) = source {
            record.properties.push(Property::content(SOURCE_ID_FIELD, source));
        }
        record
    }

    fn results(value: serde_json::Value) -> Vec<MatchResult> {
        serde_json::from_value::<MatchEntityResponse>(value)
            .unwrap()
            .match_results
    }

    #[test]
    fn test_group_by_source() {
        let records = vec![
            submitted("A", Some("crm")),
            submitted("B", Some("  ")),
            submitted("C", Some("crm")),
            submitted("D", Some("erp")),
        ];

        let groups = group_by_source(&records).unwrap();
        let summary: Vec<(&str, Vec<&str>)> = groups
            .iter()
            .map(|group| {
                (
                    group.source_id.as_str(),
                    group.records.iter().map(|r| r.external_id.as_str()).collect(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                ("crm", vec!["A", "C"]),
                (DEFAULT_SOURCE_ID, vec!["B"]),
                ("erp", vec!["D"]),
            ]
        );
    }

    #[test]
    fn test_group_by_source_missing_field() {
        let records = vec![submitted("A", Some("crm")), submitted("B", None)];
        assert!(matches!(
            group_by_source(&records),
            Err(ConnectorError::MissingSourceId)
        ));
    }

    #[test]
    fn test_match_correlation() {
        let mut records = vec![submitted("A", Some("crm")), submitted("B", Some("crm"))];
        let results = results(json!({
            "matchResults": [{
                "status": "SUCCESS",
                "entity": { "Customer": { "id": "A" } },
                "match": [{
                    "Customer": { "id": "G1", "name": "Acme" },
                    "fuzzyMatchDetails": { "field": "name", "matchStrength": 0.9, "threshold": 0.85 }
                }],
                "duplicate": [{ "Customer": { "name": "Dupe" } }]
            }]
        }));

        assemble(&mut records, &results, &MatchContext::new("u1", "Customer", "id"));

        let matches = records[0].objects(MATCH_FIELD).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].developer_name, "u1-match");
        assert_eq!(matches[0].external_id, "G1");
        assert_eq!(matches[0].content("name"), Some("Acme"));
        let details = matches[0].objects(FUZZY_MATCH_DETAILS_FIELD).unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].developer_name, FUZZY_MATCH_DETAILS_TYPE);

        let duplicates = records[0].objects(DUPLICATE_FIELD).unwrap();
        assert_eq!(duplicates.len(), 1);
        assert!(duplicates[0].has_external_id());
        assert_eq!(duplicates[0].objects(FUZZY_MATCH_DETAILS_FIELD), Some(&[][..]));

        for field in [MATCH_FIELD, DUPLICATE_FIELD, ALREADY_LINKED_FIELD] {
            assert_eq!(records[1].objects(field), Some(&[][..]));
        }
        assert_eq!(records[0].objects(ALREADY_LINKED_FIELD), Some(&[][..]));
    }

    #[test]
    fn test_already_linked() {
        let mut records = vec![submitted("A", Some("crm"))];
        let results = results(json!({
            "matchResults": [{
                "status": "ALREADY_LINKED",
                "entity": { "Customer": { "id": "A", "name": "Acme" } }
            }]
        }));

        assemble(&mut records, &results, &MatchContext::new("u1", "Customer", "id"));

        let linked = records[0].objects(ALREADY_LINKED_FIELD).unwrap();
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].external_id, "A");
        let names: Vec<&str> = linked[0]
            .properties
            .iter()
            .map(|p| p.developer_name.as_str())
            .collect();
        assert_eq!(names, vec!["id", "name"]);
        assert!(records[0].objects(MATCH_FIELD).unwrap().is_empty());
    }

    #[test]
    fn test_all_correlated_results_apply() {
        let mut records = vec![submitted("A", Some("crm"))];
        let results = results(json!({
            "matchResults": [
                { "status": "SUCCESS", "entity": { "Customer": { "id": "A" } }, "match": [{ "Customer": { "id": "G1" } }] },
                { "status": "SUCCESS", "entity": { "Customer": { "id": "A" } }, "match": [{ "Customer": { "id": "G2" } }] },
                { "status": "PENDING", "entity": { "Customer": { "id": "A" } } }
            ]
        }));

        assemble(&mut records, &results, &MatchContext::new("u1", "Customer", "id"));

        let ids: Vec<&str> = records[0]
            .objects(MATCH_FIELD)
            .unwrap()
            .iter()
            .map(|m| m.external_id.as_str())
            .collect();
        assert_eq!(ids, vec!["G1", "G2"]);
    }
}

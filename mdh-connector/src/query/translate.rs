//! Host list filters -> hub query requests
//!
//! Where clauses on the reserved date columns fold into ranges; every other clause becomes
//! a field predicate, ordered by column name so identical inputs always produce
//! identical requests.

use super::filter::{CriteriaType, FilterWhere, ListFilter};
use super::request::{
    DateFilter, FieldValue, GoldenRecordFilter, GoldenRecordQueryRequest, QuarantineFilter,
    QuarantineQueryRequest, Sort, SortField,
};
use crate::constants::{
    CAUSE_FIELD, CREATED_DATE_FIELD, END_DATE_FIELD, RESOLUTION_FIELD, SOURCE_ENTITY_ID_FIELD,
    SOURCE_ID_FIELD, STATUS_FIELD, UPDATED_DATE_FIELD,
};
use crate::error::{ConnectorError, Result};
use crate::records::dates;

/// Hub operator for a host criteria type, `None` if the hub has no equivalent
pub fn operator_for(criteria: &CriteriaType) -> Option<&'static str> {
    match criteria {
        CriteriaType::Contains => Some("CONTAINS"),
        CriteriaType::EndsWith => Some("ENDS_WITH"),
        CriteriaType::Equal => Some("EQUALS"),
        CriteriaType::GreaterThan => Some("GREATER_THAN"),
        CriteriaType::GreaterThanOrEqual => Some("GREATER_THAN_EQUAL"),
        CriteriaType::IsEmpty => Some("IS_NULL"),
        CriteriaType::LessThan => Some("LESS_THAN"),
        CriteriaType::LessThanOrEqual => Some("LESS_THAN_EQUAL"),
        CriteriaType::NotEqual => Some("NOT_EQUAL_TO"),
        CriteriaType::StartsWith => Some("STARTS_WITH"),
        CriteriaType::Other(_) => None,
    }
}

/// Translate a golden-record filter, passing column names through as field ids
pub fn translate(filter: Option<&ListFilter>) -> Result<GoldenRecordQueryRequest> {
    translate_with(filter, str::to_string)
}

/// Translate a golden-record filter, resolving each predicate column to a hub field id
///
/// Fails on the first clause whose operator has no hub equivalent; nothing partial is
/// returned.
pub fn translate_with<F>(filter: Option<&ListFilter>, field_id: F) -> Result<GoldenRecordQueryRequest>
where
    F: Fn(&str) -> String,
{
    let Some(filter) = filter else {
        return Ok(GoldenRecordQueryRequest::default());
    };

    let sort = Sort {
        fields: filter
            .order_by
            .iter()
            .map(|order| SortField {
                field_name: order.column_name.clone(),
                direction: order.direction.clone(),
            })
            .collect(),
    };

    let mut created_date = None;
    let mut updated_date = None;
    let mut predicates: Vec<&FilterWhere> = Vec::new();

    for clause in &filter.where_clauses {
        match clause.column_name.as_str() {
            CREATED_DATE_FIELD => fold_date(&mut created_date, clause)?,
            UPDATED_DATE_FIELD => fold_date(&mut updated_date, clause)?,
            _ => predicates.push(clause),
        }
    }

    predicates.sort_by(|a, b| a.column_name.cmp(&b.column_name));

    let field_value = predicates
        .into_iter()
        .map(|clause| {
            let operator = operator_for(&clause.criteria_type).ok_or_else(|| unsupported(clause))?;
            Ok(FieldValue {
                field_id: field_id(clause.column_name.as_str()),
                operator: operator.to_string(),
                value: clause.content_value.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    log::debug!(
        "Translated {} where clauses into {} field predicates",
        filter.where_clauses.len(),
        field_value.len()
    );

    Ok(GoldenRecordQueryRequest {
        sort,
        filter: GoldenRecordFilter {
            created_date,
            updated_date,
            field_value,
        },
    })
}

/// Translate a quarantine filter
///
/// Status picks the entry type, cause and resolution clauses accumulate, and the
/// created/end dates fold into ranges. Entry data is always requested.
pub fn translate_quarantine(filter: Option<&ListFilter>) -> Result<QuarantineQueryRequest> {
    let mut request = QuarantineQueryRequest {
        include_data: true,
        ..Default::default()
    };

    let Some(filter) = filter else {
        return Ok(request);
    };

    for clause in &filter.where_clauses {
        let column = clause.column_name.as_str();
        match column {
            CREATED_DATE_FIELD => fold_date(&mut request.filter.created_date, clause)?,
            END_DATE_FIELD => fold_date(&mut request.filter.end_date, clause)?,
            STATUS_FIELD | SOURCE_ID_FIELD | SOURCE_ENTITY_ID_FIELD | CAUSE_FIELD
            | RESOLUTION_FIELD => {
                if clause.criteria_type != CriteriaType::Equal {
                    log::warn!(
                        "Ignoring the {} clause on {}: quarantine queries only support Equal",
                        clause.criteria_type,
                        column
                    );
                    continue;
                }

                let value = clause.value().to_string();
                match column {
                    STATUS_FIELD => request.entry_type = Some(value),
                    SOURCE_ID_FIELD => request.filter.source_id = Some(value),
                    SOURCE_ENTITY_ID_FIELD => request.filter.source_entity_id = Some(value),
                    CAUSE_FIELD => request.filter.cause.push(value),
                    _ => request.filter.resolution.push(value),
                }
            }
            _ => log::warn!("Ignoring the unsupported quarantine filter column {}", column),
        }
    }

    Ok(request)
}

fn fold_date(range: &mut Option<DateFilter>, clause: &FilterWhere) -> Result<()> {
    if operator_for(&clause.criteria_type).is_none() {
        return Err(unsupported(clause));
    }

    let value = dates::parse(clause.value()).ok_or_else(|| ConnectorError::InvalidFilterValue {
        column: clause.column_name.clone(),
        value: clause.value().to_string(),
    })?;

    let applied = range.get_or_insert_with(DateFilter::default).apply(&clause.criteria_type, &value);
    if !applied {
        log::warn!(
            "Ignoring the {} clause on the date column {}",
            clause.criteria_type,
            clause.column_name
        );
    }

    if range.as_ref().is_some_and(|range| range.from.is_none() && range.to.is_none()) {
        *range = None;
    }

    Ok(())
}

fn unsupported(clause: &FilterWhere) -> ConnectorError {
    ConnectorError::UnsupportedFilterOperator {
        column: clause.column_name.clone(),
        operator: clause.criteria_type.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_filter() {
        assert_eq!(translate(None).unwrap(), GoldenRecordQueryRequest::default());
        let quarantine = translate_quarantine(None).unwrap();
        assert!(quarantine.include_data);
        assert_eq!(quarantine.filter, QuarantineFilter::default());
    }

    #[test]
    fn test_date_filter_folding() {
        let filter = ListFilter::default().with_where(FilterWhere::new(
            CREATED_DATE_FIELD,
            CriteriaType::GreaterThanOrEqual,
            "2019-01-01T00:00Z",
        ));

        let request = translate(Some(&filter)).unwrap();
        let created = request.filter.created_date.unwrap();
        assert_eq!(created.from.as_deref(), Some("2019-01-01T00:00:00Z"));
        assert_eq!(created.to, None);
        assert!(request.filter.updated_date.is_none());
        assert!(request.filter.field_value.is_empty());
    }

    #[test]
    fn test_date_equal_sets_both_ends_and_last_wins() {
        let filter = ListFilter::default()
            .with_where(FilterWhere::new(UPDATED_DATE_FIELD, "Equal", "2019-01-01T00:00Z"))
            .with_where(FilterWhere::new(UPDATED_DATE_FIELD, "Equal", "2019-03-01T00:00Z"));

        let updated = translate(Some(&filter)).unwrap().filter.updated_date.unwrap();
        assert_eq!(updated.from.as_deref(), Some("2019-03-01T00:00:00Z"));
        assert_eq!(updated.to.as_deref(), Some("2019-03-01T00:00:00Z"));
    }

    #[test]
    fn test_date_clause_with_non_range_operator_is_ignored() {
        let filter = ListFilter::default()
            .with_where(FilterWhere::new(CREATED_DATE_FIELD, "Contains", "2019-01-01"));

        let request = translate(Some(&filter)).unwrap();
        assert!(request.filter.created_date.is_none());
    }

    #[test]
    fn test_invalid_date_value() {
        let filter = ListFilter::default()
            .with_where(FilterWhere::new(CREATED_DATE_FIELD, "Equal", "last tuesday"));

        let err = translate(Some(&filter)).unwrap_err();
        assert!(matches!(err, ConnectorError::InvalidFilterValue { ref value, .. } if value == "last tuesday"));
    }

    #[test]
    fn test_field_predicates_are_sorted_and_deterministic() {
        let forward = ListFilter::default()
            .with_order_by("name", "DESC")
            .with_where(FilterWhere::new("zip", "StartsWith", "10"))
            .with_where(FilterWhere::new("city", "Equal", "NYC"))
            .with_where(FilterWhere::new("age", "GreaterThan", "30"));
        let mut reversed = forward.clone();
        reversed.where_clauses.reverse();

        let first = translate(Some(&forward)).unwrap();
        let second = translate(Some(&forward)).unwrap();
        let third = translate(Some(&reversed)).unwrap();

        let bytes = serde_json::to_vec(&first).unwrap();
        assert_eq!(bytes, serde_json::to_vec(&second).unwrap());
        assert_eq!(bytes, serde_json::to_vec(&third).unwrap());

        let fields: Vec<(&str, &str)> = first
            .filter
            .field_value
            .iter()
            .map(|f| (f.field_id.as_str(), f.operator.as_str()))
            .collect();
        assert_eq!(
            fields,
            vec![("age", "GREATER_THAN"), ("city", "EQUALS"), ("zip", "STARTS_WITH")]
        );
        assert_eq!(first.sort.fields[0].field_name, "name");
        assert_eq!(first.sort.fields[0].direction, "DESC");
    }

    #[test]
    fn test_field_ids_are_resolved() {
        let filter = ListFilter::default().with_where(FilterWhere::new("Name", "IsEmpty", ""));

        let request = translate_with(Some(&filter), |column| format!("FIELD_{}", column)).unwrap();
        assert_eq!(request.filter.field_value[0].field_id, "FIELD_Name");
        assert_eq!(request.filter.field_value[0].operator, "IS_NULL");
    }

    #[test]
    fn test_unsupported_operator() {
        let filter = ListFilter::default()
            .with_where(FilterWhere::new("city", "Equal", "NYC"))
            .with_where(FilterWhere::new("age", "Between", "1,2"));

        let err = translate(Some(&filter)).unwrap_err();
        match &err {
            ConnectorError::UnsupportedFilterOperator { column, operator } => {
                assert_eq!(column, "age");
                assert_eq!(operator, "Between");
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("age"));
        assert!(err.to_string().contains("Between"));
    }

    #[test]
    fn test_quarantine_translation() {
        let filter = ListFilter::default()
            .with_where(FilterWhere::new(STATUS_FIELD, "Equal", "ACTIVE"))
            .with_where(FilterWhere::new(SOURCE_ID_FIELD, "Equal", "crm"))
            .with_where(FilterWhere::new(SOURCE_ENTITY_ID_FIELD, "Equal", "c-1"))
            .with_where(FilterWhere::new(CREATED_DATE_FIELD, "GreaterThan", "2018-02-04T12:34Z"))
            .with_where(FilterWhere::new(END_DATE_FIELD, "LessThan", "2018-03-04T12:34Z"))
            .with_where(FilterWhere::new(CAUSE_FIELD, "Equal", "DUPLICATE"))
            .with_where(FilterWhere::new(CAUSE_FIELD, "Equal", "INVALID"))
            .with_where(FilterWhere::new(RESOLUTION_FIELD, "Equal", "RESOLVED"))
            .with_where(FilterWhere::new(CAUSE_FIELD, "NotEqual", "IGNORED"))
            .with_where(FilterWhere::new("name", "Equal", "ignored"));

        let request = translate_quarantine(Some(&filter)).unwrap();

        assert_eq!(request.entry_type.as_deref(), Some("ACTIVE"));
        assert!(request.include_data);
        assert_eq!(request.filter.source_id.as_deref(), Some("crm"));
        assert_eq!(request.filter.source_entity_id.as_deref(), Some("c-1"));
        assert_eq!(
            request.filter.created_date,
            Some(DateFilter {
                from: Some("2018-02-04T12:34:00Z".to_string()),
                to: None,
            })
        );
        assert_eq!(
            request.filter.end_date,
            Some(DateFilter {
                from: None,
                to: Some("2018-03-04T12:34:00Z".to_string()),
            })
        );
        assert_eq!(request.filter.cause, vec!["DUPLICATE", "INVALID"]);
        assert_eq!(request.filter.resolution, vec!["RESOLVED"]);
    }

    #[test]
    fn test_quarantine_unsupported_date_operator() {
        let filter = ListFilter::default()
            .with_where(FilterWhere::new(END_DATE_FIELD, "Around", "2018-03-04T12:34Z"));

        assert!(matches!(
            translate_quarantine(Some(&filter)),
            Err(ConnectorError::UnsupportedFilterOperator { .. })
        ));
    }
}

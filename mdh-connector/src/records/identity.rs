//! External identifier generation and back-fill

use uuid::Uuid;

use super::record::{FlatRecord, PropertyValue};

/// A fresh random identifier
pub fn new_identifier() -> String {
    Uuid::new_v4().to_string()
}

/// Give a record, and every child record under it, an external id
///
/// Records that already have one keep it. When a root record gets a new id and
/// `id_field` names one of its scalar properties, the id is also written into that
/// property. Child records only ever get a fresh id.
pub fn ensure_identifier<'r>(record: &'r mut FlatRecord, id_field: Option<&str>) -> &'r mut FlatRecord {
    if !record.has_external_id() {
        let identifier = new_identifier();

        if let Some(property) = id_field.and_then(|field| record.property_mut(field)) {
            if !property.is_object_data() {
                property.value = PropertyValue::Content(Some(identifier.clone()));
            }
        }

        record.external_id = identifier;
    }

    for property in &mut record.properties {
        if let PropertyValue::Objects(children) = &mut property.value {
            for child in children {
                ensure_identifier(child, None);
            }
        }
    }

    record
}

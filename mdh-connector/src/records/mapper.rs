//! Entity <-> flat record translation
//!
//! Read path: hub entity -> [`FlatRecord`], nested groups becoming child records typed
//! `"<parent type> - <field>"`. Write path: the inverse, stripping that prefix back off to
//! find the group field.

use super::dates;
use super::entity::{Entity, EntityValue};
use super::identity::new_identifier;
use super::record::{FlatRecord, Property, PropertyValue};
use crate::constants::{
    LINK_ENTITY_ID, LINK_ESTABLISHED_DATE, LINK_SOURCE, LINK_TYPE, LINKS_FIELD, RECORD_ID_FIELD,
};
use crate::hub::Link;
use crate::naming::{child_type_name, is_reserved_field, strip_type_prefix};
use crate::schema::{ContentType, FieldDescriptor, Universe, models::find_field};

/// Schema-aware mapper between hub entities and flat records
///
/// Without a schema every scalar is text and groups are lists only when they arrive as
/// lists. With an id field, that field is carried as the record's external id instead of
/// as an ordinary property.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordMapper<'a> {
    schema: Option<&'a [FieldDescriptor]>,
    id_field: Option<&'a str>,
}

impl<'a> RecordMapper<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema(mut self, fields: &'a [FieldDescriptor]) -> Self {
        self.schema = Some(fields);
        self
    }

    pub fn with_id_field(mut self, id_field: &'a str) -> Self {
        self.id_field = Some(id_field);
        self
    }

    /// Mapper for golden records of a universe: its schema and its id field
    pub fn for_universe(universe: &'a Universe) -> Self {
        let mapper = Self::new().with_schema(universe.fields());
        match universe.id_field() {
            Some(id_field) => mapper.with_id_field(id_field),
            None => mapper,
        }
    }

    /// Translate an enveloped entity (`{ model: fields }`) into a flat record
    ///
    /// Returns `None` for an empty entity. Passing `links` selects golden-record shape:
    /// links (when any) and the record id are appended after the entity's fields.
    pub fn to_record(
        &self,
        type_name: &str,
        external_id: &str,
        entity: &Entity,
        links: Option<&[Link]>,
    ) -> Option<FlatRecord> {
        if entity.is_empty() {
            return None;
        }

        match entity.unwrap_envelope() {
            Some((model_name, fields)) => {
                self.to_record_fields(type_name, external_id, model_name, fields, links)
            }
            None => {
                log::debug!("Entity for {} has no model envelope, mapping it as-is", type_name);
                self.to_record_fields(type_name, external_id, type_name, entity, links)
            }
        }
    }

    /// Translate an entity's fields, with child types prefixed by `model_name`
    pub fn to_record_fields(
        &self,
        type_name: &str,
        external_id: &str,
        model_name: &str,
        fields: &Entity,
        links: Option<&[Link]>,
    ) -> Option<FlatRecord> {
        if fields.is_empty() {
            return None;
        }

        let mut record = FlatRecord::new(type_name, external_id);
        record.properties = self.read_properties(model_name, fields, self.schema, true);

        if let Some(links) = links {
            if !links.is_empty() {
                record
                    .properties
                    .push(Property::list(LINKS_FIELD, links.iter().map(link_record).collect()));
            }
            record
                .properties
                .push(Property::content(RECORD_ID_FIELD, external_id));
        }

        Some(record)
    }

    fn read_properties(
        &self,
        parent_type: &str,
        fields: &Entity,
        schema: Option<&[FieldDescriptor]>,
        root: bool,
    ) -> Vec<Property> {
        let mut properties = Vec::with_capacity(fields.len());

        for (name, value) in fields.iter() {
            if root && self.id_field == Some(name) {
                continue;
            }

            let field = schema.and_then(|schema| find_field(schema, name));

            match value {
                EntityValue::Scalar(value) => {
                    if let Some(property) = read_scalar(name, value, field) {
                        properties.push(property);
                    }
                }
                EntityValue::Nested(child) => {
                    let child = self.read_child(parent_type, name, child, field);
                    if field.is_some_and(FieldDescriptor::is_list) {
                        properties.push(Property::list(name, vec![child]));
                    } else {
                        properties.push(Property::object(name, Some(child)));
                    }
                }
                EntityValue::NestedList(children) => {
                    let children = children
                        .iter()
                        .map(|child| self.read_child(parent_type, name, child, field))
                        .collect();
                    properties.push(Property::list(name, children));
                }
            }
        }

        properties
    }

    fn read_child(
        &self,
        parent_type: &str,
        name: &str,
        child: &Entity,
        field: Option<&FieldDescriptor>,
    ) -> FlatRecord {
        let child_type = child_type_name(parent_type, name);
        let child_schema = field.map(|field| field.children.as_slice());
        let properties = self.read_properties(&child_type, child, child_schema, false);

        FlatRecord {
            developer_name: child_type,
            external_id: new_identifier(),
            properties,
        }
    }

    /// Translate a flat record back into an enveloped hub entity
    pub fn to_entity(&self, record: &FlatRecord, model_name: &str) -> Entity {
        Entity::envelope(model_name, self.to_entity_fields(record, model_name))
    }

    /// Translate a flat record into the entity's fields, without the envelope
    ///
    /// Reserved (`___`) properties are left out. With an id field configured, the external
    /// id is written to it.
    pub fn to_entity_fields(&self, record: &FlatRecord, model_name: &str) -> Entity {
        let mut entity = self.write_fields(model_name, &record.properties, self.schema);

        if let Some(id_field) = self.id_field {
            if record.has_external_id() {
                entity.insert(id_field, record.external_id.as_str());
            }
        }

        entity
    }

    fn write_fields(
        &self,
        parent_type: &str,
        properties: &[Property],
        schema: Option<&[FieldDescriptor]>,
    ) -> Entity {
        let mut entity = Entity::new();

        for property in properties {
            if is_reserved_field(&property.developer_name) {
                continue;
            }

            match &property.value {
                PropertyValue::Content(None) => {}
                PropertyValue::Content(Some(value)) => {
                    let field = schema.and_then(|schema| find_field(schema, &property.developer_name));
                    if let Some(value) = write_scalar(property, value, field) {
                        entity.insert(property.developer_name.as_str(), value);
                    }
                }
                PropertyValue::Objects(children) => {
                    // The child type, minus the parent's prefix, names the group field
                    let name = children
                        .first()
                        .and_then(|child| strip_type_prefix(&child.developer_name, parent_type))
                        .unwrap_or(&property.developer_name);
                    let field = schema.and_then(|schema| find_field(schema, name));
                    let child_schema = field.map(|field| field.children.as_slice());

                    let is_list = field.is_some_and(FieldDescriptor::is_list)
                        || property.content_type == ContentType::List
                        || children.len() > 1;

                    if is_list {
                        let nested = children
                            .iter()
                            .map(|child| {
                                self.write_fields(&child.developer_name, &child.properties, child_schema)
                            })
                            .collect::<Vec<_>>();
                        entity.insert(name, nested);
                    } else if let Some(child) = children.first() {
                        let nested =
                            self.write_fields(&child.developer_name, &child.properties, child_schema);
                        entity.insert(name, nested);
                    }
                }
            }
        }

        entity
    }
}

fn read_scalar(name: &str, value: &str, field: Option<&FieldDescriptor>) -> Option<Property> {
    let content_type = field
        .and_then(|field| ContentType::from_field(&field.kind, false))
        .filter(|content_type| !content_type.is_object_data())
        .unwrap_or_default();

    if content_type == ContentType::DateTime {
        if value.trim().is_empty() {
            return None;
        }
        return Some(Property::datetime(name, Some(dates::hub_to_engine(value))));
    }

    Some(Property::typed(name, content_type, Some(value.to_string())))
}

fn write_scalar(property: &Property, value: &str, field: Option<&FieldDescriptor>) -> Option<String> {
    let is_date = property.content_type == ContentType::DateTime
        || field.is_some_and(|field| field.kind.is_date());
    if !is_date {
        return Some(value.to_string());
    }

    if value.trim().is_empty() {
        return None;
    }

    match dates::parse(value) {
        Some(parsed) => Some(dates::to_hub(&parsed)),
        None => {
            log::warn!(
                "Unable to parse '{}' for the date field {}, sending it unchanged",
                value,
                property.developer_name
            );
            Some(value.to_string())
        }
    }
}

fn link_record(link: &Link) -> FlatRecord {
    FlatRecord::new(LINK_TYPE, format!("{}:{}", link.source, link.entity_id))
        .with_property(Property::content(LINK_SOURCE, link.source.as_str()))
        .with_property(Property::content(LINK_ENTITY_ID, link.entity_id.as_str()))
        .with_property(Property::datetime(
            LINK_ESTABLISHED_DATE,
            link.established_date.as_deref().map(dates::hub_to_engine),
        ))
}

//! XML hub payloads -> entities

use anyhow::{Context, Result};
use roxmltree::{Document, Node};

use super::entity::{Entity, EntityValue};
use crate::schema::{FieldDescriptor, models::find_field};

impl Entity {
    /// Parse an XML payload into an enveloped entity (`{ root tag: fields }`)
    ///
    /// With a schema, repeatable groups become lists even when a single element is
    /// present; without one, only repeated sibling tags do.
    pub fn from_xml(xml: &str, schema: Option<&[FieldDescriptor]>) -> Result<Entity> {
        let document = Document::parse(xml).context("Failed to parse entity XML")?;
        let root = document.root_element();

        Ok(Entity::envelope(
            root.tag_name().name(),
            element_fields(root, schema),
        ))
    }
}

fn element_fields(node: Node, schema: Option<&[FieldDescriptor]>) -> Entity {
    let mut entity = Entity::new();

    for child in node.children().filter(Node::is_element) {
        let name = child.tag_name().name();
        let field = schema.and_then(|schema| find_field(schema, name));

        let Some(value) = element_value(child, field) else {
            continue;
        };

        match (entity.get(name).is_some(), value) {
            (false, value) => entity.insert(name, value),
            (true, EntityValue::Nested(next)) => append_repeated(&mut entity, name, vec![next]),
            (true, EntityValue::NestedList(next)) => append_repeated(&mut entity, name, next),
            (true, EntityValue::Scalar(_)) => {
                log::warn!("Ignoring repeated scalar element <{}>", name);
            }
        }
    }

    entity
}

fn element_value(node: Node, field: Option<&FieldDescriptor>) -> Option<EntityValue> {
    let has_elements = node.children().any(|child| child.is_element());

    if !has_elements {
        let text = node.text().map(str::trim).unwrap_or_default();
        if text.is_empty() {
            return None;
        }
        return Some(EntityValue::Scalar(text.to_string()));
    }

    let child_schema = field.map(|field| field.children.as_slice());
    let fields = element_fields(node, child_schema);

    if field.is_some_and(FieldDescriptor::is_list) {
        Some(EntityValue::NestedList(vec![fields]))
    } else {
        Some(EntityValue::Nested(fields))
    }
}

fn append_repeated(entity: &mut Entity, name: &str, next: Vec<Entity>) {
    let mut items = match entity.get(name) {
        Some(EntityValue::Nested(existing)) => vec![existing.clone()],
        Some(EntityValue::NestedList(existing)) => existing.clone(),
        Some(EntityValue::Scalar(_)) | None => Vec::new(),
    };
    items.extend(next);
    entity.insert(name, items);
}

//! Hub entities: nested, dynamically-shaped records
//!
//! Field order is the order the hub delivered, kept through (de)serialization so that
//! mapping output is deterministic.

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Value of a single entity field
#[derive(Debug, Clone, PartialEq)]
pub enum EntityValue {
    Scalar(String),
    Nested(Entity),
    NestedList(Vec<Entity>),
}

impl EntityValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            EntityValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_nested(&self) -> Option<&Entity> {
        match self {
            EntityValue::Nested(entity) => Some(entity),
            _ => None,
        }
    }

    fn equivalent(&self, other: &EntityValue) -> bool {
        match (self, other) {
            (EntityValue::Scalar(a), EntityValue::Scalar(b)) => a == b,
            (EntityValue::Nested(a), EntityValue::Nested(b)) => a.equivalent(b),
            (EntityValue::NestedList(a), EntityValue::NestedList(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(a, b)| a.equivalent(b))
            }
            _ => false,
        }
    }
}

impl From<&str> for EntityValue {
    fn from(value: &str) -> Self {
        EntityValue::Scalar(value.to_string())
    }
}

impl From<String> for EntityValue {
    fn from(value: String) -> Self {
        EntityValue::Scalar(value)
    }
}

impl From<Entity> for EntityValue {
    fn from(entity: Entity) -> Self {
        EntityValue::Nested(entity)
    }
}

impl From<Vec<Entity>> for EntityValue {
    fn from(entities: Vec<Entity>) -> Self {
        EntityValue::NestedList(entities)
    }
}

/// An ordered map of field name to value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entity {
    fields: Vec<(String, EntityValue)>,
}

impl Entity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap fields in the hub's single-entry envelope `{ model: fields }`
    pub fn envelope(model_name: impl Into<String>, inner: Entity) -> Self {
        Entity {
            fields: vec![(model_name.into(), EntityValue::Nested(inner))],
        }
    }

    /// Builder form of [`Entity::insert`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<EntityValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a field, replacing an existing value in place or appending a new one
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<EntityValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&EntityValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn get_scalar(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(EntityValue::as_scalar)
    }

    pub fn get_nested(&self, name: &str) -> Option<&Entity> {
        self.get(name).and_then(EntityValue::as_nested)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntityValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Split the envelope into the model name and its fields
    ///
    /// Returns `None` unless the entity is exactly one nested field.
    pub fn unwrap_envelope(&self) -> Option<(&str, &Entity)> {
        match self.fields.as_slice() {
            [(model, EntityValue::Nested(inner))] => Some((model.as_str(), inner)),
            _ => None,
        }
    }

    /// Structural equality ignoring field order
    pub fn equivalent(&self, other: &Entity) -> bool {
        self.len() == other.len()
            && self.iter().all(|(name, value)| {
                other
                    .get(name)
                    .is_some_and(|other_value| value.equivalent(other_value))
            })
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for EntityValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EntityValue::Scalar(value) => serializer.serialize_str(value),
            EntityValue::Nested(entity) => entity.serialize(serializer),
            EntityValue::NestedList(entities) => {
                let mut seq = serializer.serialize_seq(Some(entities.len()))?;
                for entity in entities {
                    seq.serialize_element(entity)?;
                }
                seq.end()
            }
        }
    }
}

struct EntityVisitor;

impl<'de> Visitor<'de> for EntityVisitor {
    type Value = Entity;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("an entity object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entity = Entity::new();
        // Null-valued fields are absent rather than empty
        while let Some((name, value)) = map.next_entry::<String, Option<EntityValue>>()? {
            if let Some(value) = value {
                entity.insert(name, value);
            }
        }
        Ok(entity)
    }
}

impl<'de> Deserialize<'de> for Entity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EntityVisitor)
    }
}

struct EntityValueVisitor;

impl<'de> Visitor<'de> for EntityValueVisitor {
    type Value = EntityValue;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a scalar, an entity object or a list of entity objects")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(EntityValue::Scalar(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(EntityValue::Scalar(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(EntityValue::Scalar(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(EntityValue::Scalar(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(EntityValue::Scalar(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(EntityValue::Scalar(v.to_string()))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
        EntityVisitor.visit_map(map).map(EntityValue::Nested)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut entities = Vec::new();
        while let Some(item) = seq.next_element::<Option<EntityValue>>()? {
            match item {
                Some(EntityValue::Nested(entity)) => entities.push(entity),
                Some(EntityValue::NestedList(nested)) => entities.extend(nested),
                Some(EntityValue::Scalar(value)) => {
                    log::warn!("Dropping scalar list item '{}': lists hold entities only", value);
                }
                None => {}
            }
        }
        Ok(EntityValue::NestedList(entities))
    }
}

impl<'de> Deserialize<'de> for EntityValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EntityValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_preserves_order_and_shapes() {
        let entity: Entity = serde_json::from_value(json!({
            "zeta": "last-alphabetically",
            "alpha": 42,
            "flag": true,
            "skipped": null,
            "address": { "city": "NYC" },
            "phones": [{ "number": "1" }, { "number": "2" }]
        }))
        .unwrap();

        let names: Vec<&str> = entity.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "flag", "address", "phones"]);
        assert_eq!(entity.get_scalar("alpha"), Some("42"));
        assert_eq!(entity.get_scalar("flag"), Some("true"));
        assert_eq!(
            entity.get_nested("address").unwrap().get_scalar("city"),
            Some("NYC")
        );
        match entity.get("phones") {
            Some(EntityValue::NestedList(phones)) => assert_eq!(phones.len(), 2),
            other => panic!("unexpected phones value: {:?}", other),
        }
    }

    #[test]
    fn test_serialize_keeps_order() {
        let entity = Entity::new()
            .with("b", "2")
            .with("a", Entity::new().with("x", "1"));

        let json = serde_json::to_string(&entity).unwrap();
        assert_eq!(json, r#"{"b":"2","a":{"x":"1"}}"#);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut entity = Entity::new().with("a", "1").with("b", "2");
        entity.insert("a", "3");

        let pairs: Vec<(&str, Option<&str>)> = entity
            .iter()
            .map(|(name, value)| (name, value.as_scalar()))
            .collect();
        assert_eq!(pairs, vec![("a", Some("3")), ("b", Some("2"))]);
    }

    #[test]
    fn test_envelope() {
        let entity: Entity =
            serde_json::from_value(json!({ "testing": { "id": "42", "name": "Acme" } })).unwrap();

        let (model, inner) = entity.unwrap_envelope().unwrap();
        assert_eq!(model, "testing");
        assert_eq!(inner.get_scalar("name"), Some("Acme"));

        assert!(Entity::new().unwrap_envelope().is_none());
        assert!(Entity::new().with("a", "1").unwrap_envelope().is_none());
    }

    #[test]
    fn test_equivalent_ignores_order() {
        let a = Entity::new()
            .with("x", "1")
            .with("g", Entity::new().with("p", "1").with("q", "2"));
        let b = Entity::new()
            .with("g", Entity::new().with("q", "2").with("p", "1"))
            .with("x", "1");

        assert!(a.equivalent(&b));
        assert!(!a.equivalent(&b.clone().with("y", "extra")));
        assert!(!a.equivalent(&Entity::new().with("x", "1").with("g", "flat")));
    }
}

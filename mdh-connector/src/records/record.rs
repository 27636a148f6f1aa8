//! Flat records handed to the host runtime

use serde::{Deserialize, Serialize};

use crate::schema::ContentType;

/// Value carried by a property: a scalar or a list of child records
///
/// Object-valued properties hold at most one child record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Content(Option<String>),
    Objects(Vec<FlatRecord>),
}

/// A named value on a flat record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub developer_name: String,
    pub content_type: ContentType,
    pub value: PropertyValue,
}

impl Property {
    /// A text property
    pub fn content(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::typed(name, ContentType::Text, Some(value.into()))
    }

    pub fn typed(name: impl Into<String>, content_type: ContentType, value: Option<String>) -> Self {
        Property {
            developer_name: name.into(),
            content_type,
            value: PropertyValue::Content(value),
        }
    }

    pub fn datetime(name: impl Into<String>, value: Option<String>) -> Self {
        Self::typed(name, ContentType::DateTime, value)
    }

    /// A text property with no value
    pub fn empty(name: impl Into<String>) -> Self {
        Self::typed(name, ContentType::Text, None)
    }

    /// An object property holding zero or one child record
    pub fn object(name: impl Into<String>, child: Option<FlatRecord>) -> Self {
        Property {
            developer_name: name.into(),
            content_type: ContentType::Object,
            value: PropertyValue::Objects(child.into_iter().collect()),
        }
    }

    pub fn list(name: impl Into<String>, children: Vec<FlatRecord>) -> Self {
        Property {
            developer_name: name.into(),
            content_type: ContentType::List,
            value: PropertyValue::Objects(children),
        }
    }

    pub fn as_content(&self) -> Option<&str> {
        match &self.value {
            PropertyValue::Content(value) => value.as_deref(),
            PropertyValue::Objects(_) => None,
        }
    }

    pub fn objects(&self) -> Option<&[FlatRecord]> {
        match &self.value {
            PropertyValue::Objects(objects) => Some(objects),
            PropertyValue::Content(_) => None,
        }
    }

    pub fn is_object_data(&self) -> bool {
        matches!(self.value, PropertyValue::Objects(_))
    }
}

/// A typed, flat object instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatRecord {
    pub developer_name: String,
    /// Empty until assigned by the hub or by identifier back-fill
    #[serde(default)]
    pub external_id: String,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl FlatRecord {
    pub fn new(developer_name: impl Into<String>, external_id: impl Into<String>) -> Self {
        FlatRecord {
            developer_name: developer_name.into(),
            external_id: external_id.into(),
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn has_external_id(&self) -> bool {
        !self.external_id.trim().is_empty()
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.developer_name == name)
    }

    pub fn property_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.developer_name == name)
    }

    /// Scalar value of a property
    pub fn content(&self, name: &str) -> Option<&str> {
        self.property(name).and_then(Property::as_content)
    }

    /// Child records of an object or list property
    pub fn objects(&self, name: &str) -> Option<&[FlatRecord]> {
        self.property(name).and_then(Property::objects)
    }

    /// Child list of a property, turning it into an empty list property if it is
    /// missing or scalar
    pub fn ensure_list_property(&mut self, name: &str) -> &mut Vec<FlatRecord> {
        let index = match self.properties.iter().position(|p| p.developer_name == name) {
            Some(index) => index,
            None => {
                self.properties.push(Property::list(name, Vec::new()));
                self.properties.len() - 1
            }
        };

        let property = &mut self.properties[index];
        if !property.is_object_data() {
            property.content_type = ContentType::List;
            property.value = PropertyValue::Objects(Vec::new());
        }

        match &mut property.value {
            PropertyValue::Objects(objects) => objects,
            PropertyValue::Content(_) => unreachable!(),
        }
    }
}

//! Flat type descriptors exposed to the host runtime

use serde::{Deserialize, Serialize};

use super::models::FieldKind;

/// Content types understood by the host runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContentType {
    #[default]
    Text,
    Number,
    DateTime,
    Boolean,
    Object,
    List,
}

impl ContentType {
    /// Map a schema field kind to a host content type
    ///
    /// Returns `None` for kinds the host cannot represent.
    pub fn from_field(kind: &FieldKind, repeatable: bool) -> Option<ContentType> {
        match kind {
            FieldKind::Group if repeatable => Some(ContentType::List),
            FieldKind::Group => Some(ContentType::Object),
            FieldKind::String
            | FieldKind::Enumeration
            | FieldKind::Reference
            | FieldKind::TextBlob
            | FieldKind::Time => Some(ContentType::Text),
            FieldKind::Integer | FieldKind::Float => Some(ContentType::Number),
            FieldKind::Date | FieldKind::DateTime => Some(ContentType::DateTime),
            FieldKind::Boolean => Some(ContentType::Boolean),
            FieldKind::Other(_) => None,
        }
    }

    /// Whether values of this type are child records rather than scalars
    pub fn is_object_data(&self) -> bool {
        matches!(self, ContentType::Object | ContentType::List)
    }
}

/// A property declared on a type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeProperty {
    pub name: String,
    pub content_type: ContentType,
    /// Referenced type for object and list properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

impl TypeProperty {
    pub fn new(name: impl Into<String>, content_type: ContentType) -> Self {
        TypeProperty {
            name: name.into(),
            content_type,
            type_name: None,
        }
    }

    pub fn referencing(
        name: impl Into<String>,
        content_type: ContentType,
        type_name: impl Into<String>,
    ) -> Self {
        TypeProperty {
            name: name.into(),
            content_type,
            type_name: Some(type_name.into()),
        }
    }
}

/// Binds a displayed property to the raw field it reads from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyBinding {
    pub property_name: String,
    pub column_name: String,
    /// Child type the column holds, for object and list properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_type: Option<String>,
}

impl PropertyBinding {
    pub fn new(property_name: impl Into<String>, column_name: impl Into<String>) -> Self {
        PropertyBinding {
            property_name: property_name.into(),
            column_name: column_name.into(),
            column_type: None,
        }
    }
}

/// One way of consuming a type, backed by a host-facing table name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeBinding {
    pub name: String,
    pub summary: String,
    pub table_name: String,
    pub property_bindings: Vec<PropertyBinding>,
}

/// A synthesized flat type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    pub name: String,
    #[serde(default)]
    pub summary: String,
    pub properties: Vec<TypeProperty>,
    pub bindings: Vec<TypeBinding>,
}

impl TypeDescriptor {
    pub fn property(&self, name: &str) -> Option<&TypeProperty> {
        self.properties.iter().find(|property| property.name == name)
    }

    pub fn binding(&self, table_name: &str) -> Option<&TypeBinding> {
        self.bindings
            .iter()
            .find(|binding| binding.table_name == table_name)
    }
}

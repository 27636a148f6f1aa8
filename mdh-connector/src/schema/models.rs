//! Master-data hub universe models

use serde::{Deserialize, Serialize};

/// Field kinds in a universe layout
///
/// Parsed leniently: the hub's own spellings (`CONTAINER`, `CLOB`, `ENUMERATION`) and the
/// normalized ones (`GROUP`, `TEXT_BLOB`, `ENUM`) map to the same variant, and anything
/// unknown is kept as `Other` so a schema never fails to load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Date,
    DateTime,
    Time,
    Boolean,
    Enumeration,
    Reference,
    TextBlob,
    Group,
    Other(String),
}

impl FieldKind {
    pub fn as_str(&self) -> &str {
        match self {
            FieldKind::String => "STRING",
            FieldKind::Integer => "INTEGER",
            FieldKind::Float => "FLOAT",
            FieldKind::Date => "DATE",
            FieldKind::DateTime => "DATETIME",
            FieldKind::Time => "TIME",
            FieldKind::Boolean => "BOOLEAN",
            FieldKind::Enumeration => "ENUMERATION",
            FieldKind::Reference => "REFERENCE",
            FieldKind::TextBlob => "CLOB",
            FieldKind::Group => "CONTAINER",
            FieldKind::Other(other) => other,
        }
    }

    pub fn is_date(&self) -> bool {
        matches!(self, FieldKind::Date | FieldKind::DateTime)
    }
}

impl From<String> for FieldKind {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "STRING" => FieldKind::String,
            "INTEGER" => FieldKind::Integer,
            "FLOAT" => FieldKind::Float,
            "DATE" => FieldKind::Date,
            "DATETIME" => FieldKind::DateTime,
            "TIME" => FieldKind::Time,
            "BOOLEAN" => FieldKind::Boolean,
            "ENUM" | "ENUMERATION" => FieldKind::Enumeration,
            "REFERENCE" => FieldKind::Reference,
            "CLOB" | "TEXT_BLOB" => FieldKind::TextBlob,
            "CONTAINER" | "GROUP" => FieldKind::Group,
            _ => FieldKind::Other(value),
        }
    }
}

impl From<&str> for FieldKind {
    fn from(value: &str) -> Self {
        FieldKind::from(value.to_string())
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A node in a universe's field tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Raw field name as stored on hub entities
    pub name: String,
    /// Human label; falls back to `name` when the hub leaves it empty
    #[serde(default, alias = "prettyName")]
    pub display_name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub repeatable: bool,
    /// Hub-side field identifier used in query predicates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
    /// Nested fields; only populated for group fields
    #[serde(default, alias = "elements", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FieldDescriptor>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: impl Into<FieldKind>) -> Self {
        FieldDescriptor {
            name: name.into(),
            display_name: String::new(),
            kind: kind.into(),
            repeatable: false,
            unique_id: None,
            children: Vec::new(),
        }
    }

    /// A non-repeatable group with the given children
    pub fn group(name: impl Into<String>, children: Vec<FieldDescriptor>) -> Self {
        FieldDescriptor {
            children,
            ..FieldDescriptor::new(name, FieldKind::Group)
        }
    }

    /// A repeatable group with the given children
    pub fn list(name: impl Into<String>, children: Vec<FieldDescriptor>) -> Self {
        FieldDescriptor {
            repeatable: true,
            ..FieldDescriptor::group(name, children)
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = Some(unique_id.into());
        self
    }

    /// Display label, never empty
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }

    pub fn is_group(&self) -> bool {
        self.kind == FieldKind::Group
    }

    /// Group field holding a list of nested entities
    pub fn is_list(&self) -> bool {
        self.is_group() && self.repeatable
    }

    pub fn find_child(&self, name: &str) -> Option<&FieldDescriptor> {
        find_field(&self.children, name)
    }
}

/// Find a field by raw name among siblings
pub fn find_field<'a>(fields: &'a [FieldDescriptor], name: &str) -> Option<&'a FieldDescriptor> {
    fields.iter().find(|field| field.name == name)
}

/// Root model of a universe layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    #[serde(default, alias = "fields")]
    pub elements: Vec<FieldDescriptor>,
}

/// Universe layout: the model and where its identifier lives
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    /// XPath of the identifier element, e.g. `/item/id`
    #[serde(default, rename = "idXPath", alias = "idXpath")]
    pub id_xpath: String,
    #[serde(default)]
    pub model: Option<Model>,
}

/// A tenant-defined schema plus its record store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub layout: Option<Layout>,
}

impl Universe {
    pub fn model(&self) -> Option<&Model> {
        self.layout.as_ref()?.model.as_ref()
    }

    /// Model name, falling back to the universe name
    pub fn model_name(&self) -> &str {
        self.model()
            .map(|model| model.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.name)
    }

    /// Top-level schema fields, empty when the universe has no model
    pub fn fields(&self) -> &[FieldDescriptor] {
        self.model().map(|model| model.elements.as_slice()).unwrap_or(&[])
    }

    /// Raw name of the identifier field, taken from the layout's id XPath
    ///
    /// `/item/id` -> `id`
    pub fn id_field(&self) -> Option<&str> {
        let xpath = &self.layout.as_ref()?.id_xpath;
        xpath
            .split('/')
            .nth(2)
            .map(str::trim)
            .filter(|field| !field.is_empty())
    }

    /// Hub field id for a filter column
    ///
    /// Columns are matched against raw names first and display names second; a column
    /// with no schema counterpart is passed through as-is.
    pub fn field_id(&self, column: &str) -> String {
        let fields = self.fields();
        fields
            .iter()
            .find(|field| field.name == column)
            .or_else(|| fields.iter().find(|field| field.display_name == column))
            .map(|field| field.unique_id.clone().unwrap_or_else(|| field.name.clone()))
            .unwrap_or_else(|| column.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_kind_parses_hub_spellings() {
        assert_eq!(FieldKind::from("CONTAINER"), FieldKind::Group);
        assert_eq!(FieldKind::from("group"), FieldKind::Group);
        assert_eq!(FieldKind::from("CLOB"), FieldKind::TextBlob);
        assert_eq!(FieldKind::from("ENUMERATION"), FieldKind::Enumeration);
        assert_eq!(FieldKind::from("HOLOGRAM"), FieldKind::Other("HOLOGRAM".into()));
    }

    #[test]
    fn test_universe_deserialization() {
        let universe: Universe = serde_json::from_value(json!({
            "id": "12fa66f9-e14d-f642-878f-030b13b64731",
            "name": "customers",
            "layout": {
                "idXPath": "/item/id",
                "model": {
                    "name": "Customer",
                    "elements": [
                        {"name": "id", "prettyName": "ID", "type": "STRING"},
                        {"name": "address", "prettyName": "Address", "type": "CONTAINER", "elements": [
                            {"name": "city", "type": "STRING"}
                        ]},
                        {"name": "phones", "type": "CONTAINER", "repeatable": true, "uniqueId": "PHONES"}
                    ]
                }
            }
        }))
        .unwrap();

        assert_eq!(universe.model_name(), "Customer");
        assert_eq!(universe.id_field(), Some("id"));
        assert_eq!(universe.fields().len(), 3);
        assert!(universe.fields()[1].is_group());
        assert!(!universe.fields()[1].is_list());
        assert!(universe.fields()[2].is_list());
        assert_eq!(universe.fields()[1].label(), "Address");
        assert_eq!(universe.fields()[1].children[0].label(), "city");
    }

    #[test]
    fn test_universe_without_layout() {
        let universe = Universe {
            id: "u".into(),
            name: "fallback".into(),
            layout: None,
        };
        assert_eq!(universe.model_name(), "fallback");
        assert_eq!(universe.id_field(), None);
        assert!(universe.fields().is_empty());
    }

    #[test]
    fn test_field_id_lookup() {
        let universe = Universe {
            id: "u".into(),
            name: "c".into(),
            layout: Some(Layout {
                id_xpath: "/item/id".into(),
                model: Some(Model {
                    name: "c".into(),
                    elements: vec![
                        FieldDescriptor::new("name", "STRING")
                            .with_display_name("Name")
                            .with_unique_id("NAME"),
                        FieldDescriptor::new("city", "STRING"),
                    ],
                }),
            }),
        };

        assert_eq!(universe.field_id("name"), "NAME");
        assert_eq!(universe.field_id("Name"), "NAME");
        assert_eq!(universe.field_id("city"), "city");
        assert_eq!(universe.field_id("unknown"), "unknown");
    }
}

//! Schema synthesizer: universe field tree -> flat type catalogue
//!
//! Every group field at any depth becomes its own type, named by prefixing the parent
//! type name. The root type additionally carries the reserved fields of all three
//! consumption modes and one binding per mode.

use super::models::{FieldDescriptor, Universe};
use super::types::{ContentType, PropertyBinding, TypeBinding, TypeDescriptor, TypeProperty};
use crate::constants::*;
use crate::naming::{TypeKind, child_type_name};

/// Group nesting deeper than this is dropped with a warning
pub const MAX_SCHEMA_DEPTH: usize = 32;

/// Result of synthesizing one universe
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedTypes {
    pub root: TypeDescriptor,
    /// Child types, innermost groups before the groups containing them
    pub children: Vec<TypeDescriptor>,
}

impl SynthesizedTypes {
    pub fn find(&self, name: &str) -> Option<&TypeDescriptor> {
        if self.root.name == name {
            return Some(&self.root);
        }
        self.children.iter().find(|ty| ty.name == name)
    }

    /// All types, child types first and the root last
    pub fn into_types(self) -> Vec<TypeDescriptor> {
        let mut types = self.children;
        types.push(self.root);
        types
    }
}

/// What a reserved property references, if anything
#[derive(Clone, Copy)]
enum Reference {
    None,
    Link,
    FuzzyMatchDetails,
    Model,
}

struct ReservedField {
    name: &'static str,
    column: &'static str,
    content_type: ContentType,
    reference: Reference,
    modes: &'static [TypeKind],
}

const ALL_MODES: &[TypeKind] = &[TypeKind::GoldenRecord, TypeKind::Quarantine, TypeKind::Match];
const GOLDEN: &[TypeKind] = &[TypeKind::GoldenRecord];
const GOLDEN_AND_QUARANTINE: &[TypeKind] = &[TypeKind::GoldenRecord, TypeKind::Quarantine];
const QUARANTINE: &[TypeKind] = &[TypeKind::Quarantine];
const MATCHES: &[TypeKind] = &[TypeKind::Match];

/// Reserved fields appended to every root type, in emission order
const RESERVED_FIELDS: &[ReservedField] = &[
    ReservedField { name: RECORD_ID, column: RECORD_ID_FIELD, content_type: ContentType::Text, reference: Reference::None, modes: GOLDEN },
    ReservedField { name: SOURCE_ID, column: SOURCE_ID_FIELD, content_type: ContentType::Text, reference: Reference::None, modes: ALL_MODES },
    ReservedField { name: ENTITY_ID, column: ENTITY_ID_FIELD, content_type: ContentType::Text, reference: Reference::None, modes: GOLDEN },
    ReservedField { name: CREATED_DATE, column: CREATED_DATE_FIELD, content_type: ContentType::DateTime, reference: Reference::None, modes: GOLDEN_AND_QUARANTINE },
    ReservedField { name: UPDATED_DATE, column: UPDATED_DATE_FIELD, content_type: ContentType::DateTime, reference: Reference::None, modes: GOLDEN },
    ReservedField { name: LINKS, column: LINKS_FIELD, content_type: ContentType::List, reference: Reference::Link, modes: GOLDEN },
    ReservedField { name: STATUS, column: STATUS_FIELD, content_type: ContentType::Text, reference: Reference::None, modes: QUARANTINE },
    ReservedField { name: CAUSE, column: CAUSE_FIELD, content_type: ContentType::Text, reference: Reference::None, modes: QUARANTINE },
    ReservedField { name: REASON, column: REASON_FIELD, content_type: ContentType::Text, reference: Reference::None, modes: QUARANTINE },
    ReservedField { name: RESOLUTION, column: RESOLUTION_FIELD, content_type: ContentType::Text, reference: Reference::None, modes: QUARANTINE },
    ReservedField { name: TRANSACTION_ID, column: TRANSACTION_ID_FIELD, content_type: ContentType::Text, reference: Reference::None, modes: QUARANTINE },
    ReservedField { name: SOURCE_ENTITY_ID, column: SOURCE_ENTITY_ID_FIELD, content_type: ContentType::Text, reference: Reference::None, modes: QUARANTINE },
    ReservedField { name: END_DATE, column: END_DATE_FIELD, content_type: ContentType::DateTime, reference: Reference::None, modes: QUARANTINE },
    ReservedField { name: FUZZY_MATCH_DETAILS, column: FUZZY_MATCH_DETAILS_FIELD, content_type: ContentType::Object, reference: Reference::FuzzyMatchDetails, modes: MATCHES },
    ReservedField { name: MATCH, column: MATCH_FIELD, content_type: ContentType::List, reference: Reference::Model, modes: MATCHES },
    ReservedField { name: DUPLICATE, column: DUPLICATE_FIELD, content_type: ContentType::List, reference: Reference::Model, modes: MATCHES },
    ReservedField { name: ALREADY_LINKED, column: ALREADY_LINKED_FIELD, content_type: ContentType::List, reference: Reference::Model, modes: MATCHES },
];

impl ReservedField {
    fn referenced_type(&self, model_name: &str) -> Option<String> {
        match self.reference {
            Reference::None => None,
            Reference::Link => Some(LINK_TYPE.to_string()),
            Reference::FuzzyMatchDetails => Some(FUZZY_MATCH_DETAILS_TYPE.to_string()),
            Reference::Model => Some(model_name.to_string()),
        }
    }

    fn property(&self, model_name: &str) -> TypeProperty {
        TypeProperty {
            name: self.name.to_string(),
            content_type: self.content_type,
            type_name: self.referenced_type(model_name),
        }
    }

    fn binding(&self) -> PropertyBinding {
        PropertyBinding::new(self.name, self.column)
    }
}

/// Properties and bindings derived from one level of the schema tree
#[derive(Default)]
struct Level {
    properties: Vec<TypeProperty>,
    bindings: Vec<PropertyBinding>,
}

/// Synthesize the type catalogue for a model
///
/// Total over any schema: unsupported field kinds and groups nested beyond
/// [`MAX_SCHEMA_DEPTH`] are logged and left out.
pub fn synthesize(universe_id: &str, model_name: &str, fields: &[FieldDescriptor]) -> SynthesizedTypes {
    let mut children = Vec::new();
    let level = synthesize_level(model_name, model_name, fields, 0, &mut children);

    let mut properties = level.properties;
    properties.extend(RESERVED_FIELDS.iter().map(|field| field.property(model_name)));

    let bindings = vec![
        mode_binding(
            TypeKind::GoldenRecord,
            universe_id,
            format!("{} Golden Record", model_name),
            format!("The structure of a golden record for the {} universe", model_name),
            &level.bindings,
        ),
        mode_binding(
            TypeKind::Quarantine,
            universe_id,
            format!("{} Quarantine", model_name),
            format!("The structure of a Quarantine {} for the {} universe", model_name, model_name),
            &level.bindings,
        ),
        mode_binding(
            TypeKind::Match,
            universe_id,
            format!("{} Match", model_name),
            format!("The structure of matches for the {} universe", model_name),
            &level.bindings,
        ),
    ];

    log::debug!(
        "Synthesized {} child types and {} root properties for model '{}'",
        children.len(),
        properties.len(),
        model_name
    );

    SynthesizedTypes {
        root: TypeDescriptor {
            name: model_name.to_string(),
            summary: format!("The structure of the {} model", model_name),
            properties,
            bindings,
        },
        children,
    }
}

/// Synthesize a universe's catalogue, if it has a model
pub fn synthesize_universe(universe: &Universe) -> Option<SynthesizedTypes> {
    let model = universe.model()?;
    Some(synthesize(&universe.id, universe.model_name(), &model.elements))
}

/// Types shared by every universe: golden-record links and fuzzy-match details
pub fn shared_types() -> Vec<TypeDescriptor> {
    vec![
        flat_type(
            LINK_TYPE,
            "A link between a golden record and a source entity",
            &[
                (LINK_SOURCE, ContentType::Text),
                (LINK_ENTITY_ID, ContentType::Text),
                (LINK_ESTABLISHED_DATE, ContentType::DateTime),
            ],
        ),
        flat_type(
            FUZZY_MATCH_DETAILS_TYPE,
            "How strongly a candidate entity matched",
            &[
                (FUZZY_FIELD, ContentType::Text),
                (FUZZY_FIRST, ContentType::Text),
                (FUZZY_SECOND, ContentType::Text),
                (FUZZY_METHOD, ContentType::Text),
                (FUZZY_MATCH_STRENGTH, ContentType::Number),
                (FUZZY_THRESHOLD, ContentType::Number),
            ],
        ),
    ]
}

fn synthesize_level(
    model_name: &str,
    type_name: &str,
    fields: &[FieldDescriptor],
    depth: usize,
    types: &mut Vec<TypeDescriptor>,
) -> Level {
    let mut level = Level::default();

    for field in fields {
        let Some(content_type) = ContentType::from_field(&field.kind, field.repeatable) else {
            log::warn!(
                "Encountered an unsupported element type of {} for the field '{}' in {}",
                field.kind,
                field.name,
                type_name
            );
            continue;
        };

        if !content_type.is_object_data() {
            level.properties.push(TypeProperty::new(field.label(), content_type));
            level
                .bindings
                .push(PropertyBinding::new(field.label(), field.name.as_str()));
            continue;
        }

        if depth >= MAX_SCHEMA_DEPTH {
            log::warn!(
                "Dropping the group field '{}' in {}: nested deeper than {} levels",
                field.name,
                type_name,
                MAX_SCHEMA_DEPTH
            );
            continue;
        }

        let child_name = child_type_name(type_name, &field.name);
        let child = synthesize_level(model_name, &child_name, &field.children, depth + 1, types);
        types.push(child_type(model_name, &child_name, field, child));

        level.properties.push(TypeProperty::referencing(
            field.label(),
            content_type,
            child_name.as_str(),
        ));
        level.bindings.push(PropertyBinding {
            property_name: field.label().to_string(),
            column_name: field.name.clone(),
            column_type: Some(child_name),
        });
    }

    level
}

fn child_type(model_name: &str, name: &str, field: &FieldDescriptor, level: Level) -> TypeDescriptor {
    let summary = format!("The structure of a child Type {} for {}", field.label(), model_name);

    TypeDescriptor {
        name: name.to_string(),
        summary: summary.clone(),
        properties: level.properties,
        bindings: vec![TypeBinding {
            name: name.to_string(),
            summary,
            table_name: name.to_string(),
            property_bindings: level.bindings,
        }],
    }
}

fn mode_binding(
    kind: TypeKind,
    universe_id: &str,
    name: String,
    summary: String,
    schema_bindings: &[PropertyBinding],
) -> TypeBinding {
    let mut property_bindings = schema_bindings.to_vec();
    property_bindings.extend(
        RESERVED_FIELDS
            .iter()
            .filter(|field| field.modes.contains(&kind))
            .map(ReservedField::binding),
    );

    TypeBinding {
        name,
        summary,
        table_name: kind.type_name(universe_id),
        property_bindings,
    }
}

fn flat_type(name: &str, summary: &str, properties: &[(&str, ContentType)]) -> TypeDescriptor {
    TypeDescriptor {
        name: name.to_string(),
        summary: summary.to_string(),
        properties: properties
            .iter()
            .map(|(property, content_type)| TypeProperty::new(*property, *content_type))
            .collect(),
        bindings: vec![TypeBinding {
            name: name.to_string(),
            summary: summary.to_string(),
            table_name: name.to_string(),
            property_bindings: properties
                .iter()
                .map(|(property, _)| PropertyBinding::new(*property, *property))
                .collect(),
        }],
    }
}

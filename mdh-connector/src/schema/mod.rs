//! Universe schemas and the flat type catalogue synthesized from them

pub mod models;
pub mod synthesize;
pub mod types;

pub use models::{FieldDescriptor, FieldKind, Layout, Model, Universe};
pub use synthesize::{MAX_SCHEMA_DEPTH, SynthesizedTypes, shared_types, synthesize, synthesize_universe};
pub use types::{ContentType, PropertyBinding, TypeBinding, TypeDescriptor, TypeProperty};

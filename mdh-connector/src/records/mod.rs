//! Hub entities, flat records and the translation between them

pub mod dates;
pub mod entity;
pub mod identity;
pub mod mapper;
pub mod record;
pub mod xml;

pub use entity::{Entity, EntityValue};
pub use identity::{ensure_identifier, new_identifier};
pub use mapper::RecordMapper;
pub use record::{FlatRecord, Property, PropertyValue};

//! Translation layer between a master-data hub and a host workflow engine
//!
//! The hub stores nested, per-universe records; the host consumes flat objects whose
//! shape is declared up front. This crate synthesizes that type catalogue from universe
//! schemas, maps records in both directions, translates host filters into hub queries,
//! and folds match results back into submitted records.

pub mod config;
pub mod constants;
pub mod error;
pub mod hub;
pub mod matching;
pub mod naming;
pub mod query;
pub mod records;
pub mod repository;
pub mod schema;

pub use config::HubConfig;
pub use error::{ConnectorError, Result};
pub use hub::HubClient;
pub use records::{Entity, EntityValue, FlatRecord, Property, PropertyValue, RecordMapper};
pub use repository::{
    GoldenRecordRepository, MatchEntityRepository, QuarantineRepository, RawDatabase, TypeProvider,
};
pub use schema::{TypeDescriptor, Universe, synthesize};

//! Type catalogue for the host runtime

use std::sync::Arc;

use anyhow::Context;

use crate::config::HubConfig;
use crate::error::Result;
use crate::hub::HubClient;
use crate::naming::TypeKind;
use crate::schema::{TypeDescriptor, Universe, shared_types, synthesize_universe};

pub struct TypeProvider {
    client: Arc<dyn HubClient>,
}

impl TypeProvider {
    pub fn new(client: Arc<dyn HubClient>) -> Self {
        Self { client }
    }

    /// Whether a type name follows one of the record type conventions
    pub fn does_type_exist(type_name: &str) -> bool {
        TypeKind::from_type_name(type_name).is_some()
    }

    /// Describe every type for the configured hub
    ///
    /// An empty configuration describes nothing; a partial one is rejected before the hub
    /// is contacted.
    pub async fn describe_types(&self, config: &HubConfig) -> Result<Vec<TypeDescriptor>> {
        if config.is_empty() {
            log::info!("No hub configured, describing no types");
            return Ok(Vec::new());
        }
        config.validate()?;

        let universes = self
            .client
            .find_universes()
            .await
            .with_context(|| format!("Failed to list universes on {}", config.hostname))?;

        Ok(describe_universes(&universes))
    }
}

/// Synthesize the catalogue for a set of universes, followed by the shared types
///
/// Universes without a model are skipped.
pub fn describe_universes(universes: &[Universe]) -> Vec<TypeDescriptor> {
    let mut types = Vec::new();

    for universe in universes {
        match synthesize_universe(universe) {
            Some(synthesized) => types.extend(synthesized.into_types()),
            None => log::debug!("Universe {} has no model, skipping it", universe.id),
        }
    }

    types.extend(shared_types());
    log::info!(
        "Described {} types for {} universes",
        types.len(),
        universes.len()
    );
    types
}

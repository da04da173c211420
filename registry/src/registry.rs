//! The Schema - immutable entity lookup.

use crate::{Entity, RegistryError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The Schema provides runtime lookup of entity definitions.
/// It is immutable after construction and safe to share across threads.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    /// Entity definitions by name.
    entities: HashMap<String, Entity>,
}

impl Schema {
    /// Create a schema from already-checked entities (use SchemaBuilder for construction).
    pub(crate) fn new(entities: HashMap<String, Entity>) -> Self {
        Self { entities }
    }

    /// Decode the JSON produced by the schema compiler.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let schema: Schema =
            serde_json::from_str(json).map_err(|e| RegistryError::Decode(e.to_string()))?;

        for (key, entity) in &schema.entities {
            if key != &entity.name {
                return Err(RegistryError::EntityKeyMismatch {
                    key: key.clone(),
                    name: entity.name.clone(),
                });
            }
            for (field_key, field) in &entity.fields {
                if field_key != &field.name {
                    return Err(RegistryError::EntityKeyMismatch {
                        key: format!("{}.{}", key, field_key),
                        name: format!("{}.{}", key, field.name),
                    });
                }
            }
        }

        Ok(schema)
    }

    /// Encode in the compiler's JSON shape.
    pub fn to_json(&self) -> Result<String, RegistryError> {
        serde_json::to_string(self).map_err(|e| RegistryError::Encode(e.to_string()))
    }

    // ==================== Entity Lookups ====================

    /// Get an entity definition by name. `None` means the entity does not exist.
    pub fn get_entity(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    /// Check if an entity exists.
    pub fn has_entity(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    /// All entity names, sorted.
    pub fn entity_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entities.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get all entity definitions.
    pub fn all_entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Get the number of entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Name of the alphabetically first primary-key column of an entity.
    pub fn primary_key_column(&self, entity: &str) -> Option<&str> {
        self.get_entity(entity)?
            .primary_keys()
            .first()
            .map(|f| f.name.as_str())
    }

    /// Target entity of `relation` on `entity`.
    pub fn relation_target(&self, entity: &str, relation: &str) -> Option<&Entity> {
        let rel = self.get_entity(entity)?.relation(relation)?;
        self.get_entity(&rel.target_entity)
    }
}

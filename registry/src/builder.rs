//! SchemaBuilder for constructing an immutable Schema.

use crate::{Entity, Field, Relation, Schema};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during schema construction.
#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("Duplicate entity name: {0}")]
    DuplicateEntity(String),

    #[error("Duplicate field name: {field} on entity {entity}")]
    DuplicateField { entity: String, field: String },

    #[error("Duplicate relation name: {relation} on entity {entity}")]
    DuplicateRelation { entity: String, relation: String },

    #[error("Relation {entity}.{relation} targets unknown entity {target}")]
    UnknownRelationTarget {
        entity: String,
        relation: String,
        target: String,
    },

    #[error("Entity registered as '{key}' is named '{name}'")]
    EntityKeyMismatch { key: String, name: String },

    #[error("Failed to decode schema: {0}")]
    Decode(String),

    #[error("Failed to encode schema: {0}")]
    Encode(String),
}

/// Builder for constructing an immutable Schema.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    /// Entities being built.
    entities: HashMap<String, Entity>,
}

impl SchemaBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity definition.
    pub fn add_entity(&mut self, name: impl Into<String>) -> EntityBuilder<'_> {
        EntityBuilder {
            builder: self,
            entity: Entity::new(name),
            error: None,
        }
    }

    /// Check whether an entity has been added.
    pub fn has_entity(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    /// Build the immutable Schema.
    pub fn build(self) -> Result<Schema, RegistryError> {
        // Relations are resolved by name, so targets can only be checked once
        // every entity is known.
        let mut names: Vec<&String> = self.entities.keys().collect();
        names.sort();
        for name in names {
            let entity = &self.entities[name];
            let mut relations: Vec<&Relation> = entity.relations.values().collect();
            relations.sort_by(|a, b| a.name.cmp(&b.name));
            for rel in relations {
                if !self.entities.contains_key(&rel.target_entity) {
                    return Err(RegistryError::UnknownRelationTarget {
                        entity: entity.name.clone(),
                        relation: rel.name.clone(),
                        target: rel.target_entity.clone(),
                    });
                }
            }
        }

        Ok(Schema::new(self.entities))
    }
}

/// Builder for an entity definition.
pub struct EntityBuilder<'a> {
    builder: &'a mut SchemaBuilder,
    entity: Entity,
    /// First duplicate seen; reported by `done`.
    error: Option<RegistryError>,
}

impl<'a> EntityBuilder<'a> {
    /// Add a field.
    pub fn field(mut self, field: Field) -> Self {
        if self.entity.fields.contains_key(&field.name) {
            self.error.get_or_insert(RegistryError::DuplicateField {
                entity: self.entity.name.clone(),
                field: field.name.clone(),
            });
        } else {
            self.entity.fields.insert(field.name.clone(), field);
        }
        self
    }

    /// Add a relation.
    pub fn relation(mut self, relation: Relation) -> Self {
        if self.entity.relations.contains_key(&relation.name) {
            self.error.get_or_insert(RegistryError::DuplicateRelation {
                entity: self.entity.name.clone(),
                relation: relation.name.clone(),
            });
        } else {
            self.entity
                .relations
                .insert(relation.name.clone(), relation);
        }
        self
    }

    /// Finish building this entity.
    pub fn done(self) -> Result<(), RegistryError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        if self.builder.entities.contains_key(&self.entity.name) {
            return Err(RegistryError::DuplicateEntity(self.entity.name));
        }

        self.builder
            .entities
            .insert(self.entity.name.clone(), self.entity);
        Ok(())
    }
}

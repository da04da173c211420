//! Schema definition types.
//!
//! Field and relation shapes mirror the JSON the schema compiler emits, so
//! they derive serde with the compiler's variant spellings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Declared storage type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "UUID")]
    Uuid,
    String,
    Int,
    Decimal,
    Bool,
    Timestamp,
}

impl FieldType {
    /// Name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Uuid => "uuid",
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Decimal => "decimal",
            FieldType::Bool => "bool",
            FieldType::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Default applied by the database when a field is omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefaultValue {
    Now,
    #[serde(rename = "UUIDv4")]
    UuidV4,
    Literal(String),
}

/// Field definition within an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Declared type.
    pub field_type: FieldType,
    /// Whether the field accepts null.
    pub nullable: bool,
    /// Whether values must be unique across rows.
    pub unique: bool,
    /// Whether this field is (part of) the primary key.
    pub primary_key: bool,
    /// Default value if not provided.
    #[serde(default)]
    pub default: Option<DefaultValue>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            nullable: false,
            unique: false,
            primary_key: false,
            default: None,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    /// A field the caller must supply on insert.
    pub fn is_required(&self) -> bool {
        !self.nullable && self.default.is_none() && !self.primary_key
    }
}

/// Relation cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationKind {
    HasOne,
    HasMany,
    BelongsTo,
    ManyToMany,
}

/// Relation to another entity.
///
/// The target is held by name and resolved through the `Schema`, so cyclic
/// relation graphs (A → B → A) need no owned back-references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    /// Relation name (also the include-path segment).
    pub name: String,
    /// Cardinality.
    pub kind: RelationKind,
    /// Target entity name.
    pub target_entity: String,
    /// Foreign-key field, if any.
    #[serde(default)]
    pub foreign_key: Option<String>,
    /// Join entity for many-to-many relations.
    #[serde(default)]
    pub through: Option<String>,
}

impl Relation {
    pub fn new(name: impl Into<String>, kind: RelationKind, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            target_entity: target.into(),
            foreign_key: None,
            through: None,
        }
    }

    pub fn foreign_key(mut self, field: impl Into<String>) -> Self {
        self.foreign_key = Some(field.into());
        self
    }

    pub fn through(mut self, join_entity: impl Into<String>) -> Self {
        self.through = Some(join_entity.into());
        self
    }
}

/// Entity (table) definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity name.
    pub name: String,
    /// Field definitions.
    pub fields: HashMap<String, Field>,
    /// Relation definitions.
    #[serde(default)]
    pub relations: HashMap<String, Relation>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: HashMap::new(),
            relations: HashMap::new(),
        }
    }

    /// Get a field definition by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Check if this entity has a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Get a relation definition by name.
    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.get(name)
    }

    /// All field names, sorted.
    pub fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.fields.keys().cloned().collect();
        names.sort();
        names
    }

    /// Primary-key fields exactly as declared, sorted by name.
    pub fn primary_keys(&self) -> Vec<&Field> {
        let mut keys: Vec<&Field> = self.fields.values().filter(|f| f.primary_key).collect();
        keys.sort_by(|a, b| a.name.cmp(&b.name));
        keys
    }

    /// The BelongsTo relation whose foreign key is `field`, if any.
    pub fn foreign_key_relation(&self, field: &str) -> Option<&Relation> {
        self.relations.values().find(|r| {
            r.kind == RelationKind::BelongsTo && r.foreign_key.as_deref() == Some(field)
        })
    }
}

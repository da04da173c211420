//! Mutation validation and safety guards.
//!
//! Every check runs before any SQL is rendered. Fields are visited in sorted
//! name order so the first reported error is deterministic.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

use cham_core::{Assignments, Value};
use cham_registry::{Entity, Field, FieldType, Schema};
use chrono::{DateTime, NaiveDateTime};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::{MutationError, MutationResult};
use crate::filter::MutationFilter;

/// Text timestamps accepted besides RFC 3339.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Validator switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Check values against the declared field types.
    pub strict_types: bool,
    /// Ask the attached `ForeignKeyChecker` about foreign-key values.
    pub validate_foreign_keys: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            strict_types: true,
            validate_foreign_keys: true,
        }
    }
}

/// Looks up whether a referenced record exists.
pub trait ForeignKeyChecker: Send + Sync {
    /// Whether `entity` has a row whose `field` equals `value`.
    fn exists(&self, entity: &str, field: &str, value: &Value) -> Result<bool, String>;
}

/// Validates mutation input against a schema.
#[derive(Clone)]
pub struct Validator {
    schema: Arc<Schema>,
    config: ValidatorConfig,
    foreign_keys: Option<Arc<dyn ForeignKeyChecker>>,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("entities", &self.schema.entity_count())
            .field("config", &self.config)
            .field("foreign_keys", &self.foreign_keys.is_some())
            .finish()
    }
}

impl Validator {
    pub fn new(schema: Arc<Schema>, config: ValidatorConfig) -> Self {
        Self {
            schema,
            config,
            foreign_keys: None,
        }
    }

    /// Attach a foreign-key existence check.
    pub fn with_foreign_key_checker(mut self, checker: Arc<dyn ForeignKeyChecker>) -> Self {
        self.foreign_keys = Some(checker);
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn config(&self) -> ValidatorConfig {
        self.config
    }

    // ==================== Operations ====================

    /// Validate an INSERT.
    pub fn validate_insert(&self, entity: &str, fields: &Assignments) -> MutationResult<()> {
        let ent = self.entity(entity)?;

        for (name, value) in fields {
            let field = self.field(ent, name)?;
            self.check_value(field, value)?;
            self.check_foreign_key(ent, field, value)?;
        }

        check_required(ent, fields)
    }

    /// Validate an UPDATE.
    pub fn validate_update(
        &self,
        entity: &str,
        filters: &[MutationFilter],
        updates: &Assignments,
        force_update_all: bool,
    ) -> MutationResult<()> {
        let ent = self.entity(entity)?;

        if filters.is_empty() && !force_update_all {
            warn!(entity, "blocked UPDATE without filter");
            return Err(MutationError::safety(
                "update_without_filter",
                "UPDATE requires a WHERE clause",
            ));
        }

        self.check_filters(ent, filters)?;

        if updates.is_empty() {
            return Err(MutationError::validation(
                "",
                "no_updates",
                "UPDATE needs at least one field to set",
            ));
        }

        let mut fields = Vec::with_capacity(updates.len());
        for name in updates.keys() {
            fields.push(self.field(ent, name)?);
        }

        // Primary keys are immutable whatever else is wrong with the input.
        if let Some(pk) = fields.iter().find(|f| f.primary_key) {
            return Err(MutationError::constraint("primary_key", &pk.name));
        }

        for (field, value) in fields.into_iter().zip(updates.values()) {
            self.check_value(field, value)?;
            self.check_foreign_key(ent, field, value)?;
        }

        Ok(())
    }

    /// Validate a DELETE.
    pub fn validate_delete(
        &self,
        entity: &str,
        filters: &[MutationFilter],
        force_delete_all: bool,
    ) -> MutationResult<()> {
        let ent = self.entity(entity)?;

        if filters.is_empty() && !force_delete_all {
            warn!(entity, "blocked DELETE without filter");
            return Err(MutationError::safety(
                "delete_without_filter",
                "DELETE without WHERE is blocked",
            ));
        }

        self.check_filters(ent, filters)
    }

    // ==================== Checks ====================

    fn entity(&self, name: &str) -> MutationResult<&Entity> {
        self.schema
            .get_entity(name)
            .ok_or_else(|| MutationError::unknown_entity(name, self.schema.entity_names()))
    }

    fn field<'e>(&self, entity: &'e Entity, name: &str) -> MutationResult<&'e Field> {
        entity
            .field(name)
            .ok_or_else(|| MutationError::unknown_field(&entity.name, name, entity.field_names()))
    }

    fn check_filters(&self, entity: &Entity, filters: &[MutationFilter]) -> MutationResult<()> {
        for filter in filters {
            self.field(entity, &filter.field)?;
            if filter.parsed_op().is_none() {
                return Err(MutationError::validation(
                    &filter.field,
                    "invalid_operator",
                    format!("unsupported filter operator '{}'", filter.op),
                ));
            }
        }
        Ok(())
    }

    /// Null, type and format checks for one value.
    fn check_value(&self, field: &Field, value: &Value) -> MutationResult<()> {
        if value.is_null() {
            if field.nullable {
                return Ok(());
            }
            return Err(MutationError::not_null(&field.name));
        }

        if self.config.strict_types {
            check_type(field, value)?;
        }

        check_email(&field.name, value)
    }

    fn check_foreign_key(&self, entity: &Entity, field: &Field, value: &Value) -> MutationResult<()> {
        if !self.config.validate_foreign_keys || value.is_null() {
            return Ok(());
        }
        let (Some(checker), Some(relation)) = (
            self.foreign_keys.as_ref(),
            entity.foreign_key_relation(&field.name),
        ) else {
            return Ok(());
        };

        let target = &relation.target_entity;
        let key = self.schema.primary_key_column(target).unwrap_or("id");

        match checker.exists(target, key, value) {
            Ok(true) => Ok(()),
            Ok(false) => Err(MutationError::foreign_key(
                &field.name,
                value.clone(),
                target,
                key,
            )),
            Err(message) => Err(MutationError::validation(
                &field.name,
                "foreign_key_check",
                message,
            )),
        }
    }
}

/// Every non-nullable field without a default (primary keys excepted) must
/// be supplied.
fn check_required(entity: &Entity, provided: &Assignments) -> MutationResult<()> {
    let required: BTreeSet<&str> = entity
        .fields
        .values()
        .filter(|f| f.is_required())
        .map(|f| f.name.as_str())
        .collect();

    match required.into_iter().find(|name| !provided.contains_key(*name)) {
        Some(missing) => Err(MutationError::not_null(missing)),
        None => Ok(()),
    }
}

fn check_type(field: &Field, value: &Value) -> MutationResult<()> {
    let ok = match (field.field_type, value) {
        (FieldType::Uuid, Value::String(s)) => {
            if Uuid::parse_str(s).is_err() {
                return Err(MutationError::format(&field.name, "UUID", s.as_str()));
            }
            true
        }
        (FieldType::String, Value::String(_)) => true,
        (FieldType::Int, Value::Int(_)) => true,
        (FieldType::Decimal, Value::Int(_) | Value::Float(_)) => true,
        (FieldType::Decimal, Value::String(s)) => is_decimal_text(s),
        (FieldType::Bool, Value::Bool(_)) => true,
        (FieldType::Timestamp, Value::Int(_)) => true,
        (FieldType::Timestamp, Value::String(s)) => {
            if !is_timestamp_text(s) {
                return Err(MutationError::format(&field.name, "timestamp", s.as_str()));
            }
            true
        }
        _ => false,
    };

    if ok {
        Ok(())
    } else {
        Err(MutationError::type_mismatch(
            &field.name,
            field.field_type.name(),
            value,
        ))
    }
}

/// Fields whose name mentions "email" must hold an address.
///
/// This is a naming convention, not schema information: a field called
/// `email_verified_at` is checked too when it holds a string.
fn check_email(field: &str, value: &Value) -> MutationResult<()> {
    let Some(text) = value.as_str().filter(|s| !s.is_empty()) else {
        return Ok(());
    };
    if !field.to_lowercase().contains("email") {
        return Ok(());
    }

    static EMAIL: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern")
    });

    if re.is_match(text) {
        Ok(())
    } else {
        Err(MutationError::format(field, "email", text))
    }
}

fn is_decimal_text(text: &str) -> bool {
    static DECIMAL: OnceLock<Regex> = OnceLock::new();
    DECIMAL
        .get_or_init(|| Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)$").expect("valid decimal pattern"))
        .is_match(text.trim())
}

fn is_timestamp_text(text: &str) -> bool {
    DateTime::parse_from_rfc3339(text).is_ok()
        || NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).is_ok()
}

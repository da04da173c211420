//! Mutation error types.
//!
//! Every variant carries a stable machine-readable code (see
//! [`MutationError::code`]) so callers can branch without parsing messages.

use cham_core::Value;
use thiserror::Error;

/// Result type for mutation operations.
pub type MutationResult<T> = Result<T, MutationError>;

/// Errors that can occur while validating or rendering a mutation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MutationError {
    #[error("Validation failed for field '{field}' ({kind}): {message}")]
    Validation {
        field: String,
        /// Machine-readable reason, e.g. `invalid_operator`.
        kind: String,
        message: String,
    },

    #[error("Type mismatch for field '{field}': expected {expected}, got {received} ({value})")]
    TypeMismatch {
        field: String,
        expected: String,
        received: String,
        value: Value,
    },

    #[error("Field '{field}' exceeds max length {max_len} (got {actual})")]
    LengthExceeded {
        field: String,
        max_len: usize,
        actual: usize,
    },

    #[error("Invalid format for field '{field}': expected {format}, got \"{value}\"")]
    Format {
        field: String,
        format: String,
        value: String,
    },

    #[error("{constraint} constraint violation on field '{field}'")]
    Constraint {
        /// Constraint name, e.g. `primary_key`.
        constraint: String,
        field: String,
    },

    #[error("Field '{field}' must be unique: {table} already has {value}")]
    UniqueConstraint {
        field: String,
        value: Value,
        table: String,
    },

    #[error("Field '{field}' cannot be null")]
    NotNull { field: String },

    #[error("Invalid reference in '{field}': {referenced_entity}({referenced_field}={value}) does not exist")]
    ForeignKey {
        field: String,
        value: Value,
        referenced_entity: String,
        referenced_field: String,
    },

    #[error("Cannot delete/update {entity}({id}): {dependent_count} {dependent_entity} record(s) reference it")]
    ForeignKeyConstraint {
        entity: String,
        id: Value,
        dependent_entity: String,
        dependent_count: u64,
    },

    #[error("Entity '{entity}' has no field '{field}' (available: {})", .available.join(", "))]
    UnknownField {
        entity: String,
        field: String,
        available: Vec<String>,
    },

    #[error("Entity '{entity}' not found in schema (available: {})", .available.join(", "))]
    UnknownEntity {
        entity: String,
        available: Vec<String>,
    },

    #[error("{entity} with id {id} not found")]
    NotFound { entity: String, id: Value },

    #[error("Concurrent modification of {entity}({id}): expected version {expected_version}, found {actual_version}")]
    Conflict {
        entity: String,
        id: Value,
        expected_version: u64,
        actual_version: u64,
    },

    #[error("Operation blocked by safety guard ({operation}): {message}")]
    Safety {
        /// e.g. `update_without_filter`, `delete_without_filter`.
        operation: String,
        message: String,
    },

    #[error("Not authorized to {operation} {entity}: {message}")]
    AuthorizationDenied {
        operation: String,
        entity: String,
        message: String,
    },
}

impl MutationError {
    pub fn validation(
        field: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Validation {
            field: field.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }

    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        value: &Value,
    ) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected: expected.into(),
            received: value.type_name().to_lowercase(),
            value: value.clone(),
        }
    }

    pub fn length_exceeded(field: impl Into<String>, max_len: usize, actual: usize) -> Self {
        Self::LengthExceeded {
            field: field.into(),
            max_len,
            actual,
        }
    }

    pub fn format(
        field: impl Into<String>,
        format: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Format {
            field: field.into(),
            format: format.into(),
            value: value.into(),
        }
    }

    pub fn constraint(constraint: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Constraint {
            constraint: constraint.into(),
            field: field.into(),
        }
    }

    pub fn unique_constraint(
        field: impl Into<String>,
        value: Value,
        table: impl Into<String>,
    ) -> Self {
        Self::UniqueConstraint {
            field: field.into(),
            value,
            table: table.into(),
        }
    }

    pub fn not_null(field: impl Into<String>) -> Self {
        Self::NotNull {
            field: field.into(),
        }
    }

    pub fn foreign_key(
        field: impl Into<String>,
        value: Value,
        referenced_entity: impl Into<String>,
        referenced_field: impl Into<String>,
    ) -> Self {
        Self::ForeignKey {
            field: field.into(),
            value,
            referenced_entity: referenced_entity.into(),
            referenced_field: referenced_field.into(),
        }
    }

    pub fn foreign_key_constraint(
        entity: impl Into<String>,
        id: Value,
        dependent_entity: impl Into<String>,
        dependent_count: u64,
    ) -> Self {
        Self::ForeignKeyConstraint {
            entity: entity.into(),
            id,
            dependent_entity: dependent_entity.into(),
            dependent_count,
        }
    }

    pub fn unknown_field(
        entity: impl Into<String>,
        field: impl Into<String>,
        available: Vec<String>,
    ) -> Self {
        Self::UnknownField {
            entity: entity.into(),
            field: field.into(),
            available,
        }
    }

    pub fn unknown_entity(entity: impl Into<String>, available: Vec<String>) -> Self {
        Self::UnknownEntity {
            entity: entity.into(),
            available,
        }
    }

    pub fn not_found(entity: impl Into<String>, id: Value) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id,
        }
    }

    pub fn conflict(
        entity: impl Into<String>,
        id: Value,
        expected_version: u64,
        actual_version: u64,
    ) -> Self {
        Self::Conflict {
            entity: entity.into(),
            id,
            expected_version,
            actual_version,
        }
    }

    pub fn safety(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Safety {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn authorization_denied(
        operation: impl Into<String>,
        entity: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::AuthorizationDenied {
            operation: operation.into(),
            entity: entity.into(),
            message: message.into(),
        }
    }

    /// Stable error code.
    pub fn code(&self) -> String {
        let code = match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::TypeMismatch { .. } => "TYPE_MISMATCH",
            Self::LengthExceeded { .. } => "LENGTH_EXCEEDED",
            Self::Format { .. } => "FORMAT_ERROR",
            Self::Constraint { constraint, .. } => {
                return format!("{}_CONSTRAINT", constraint.to_uppercase())
            }
            Self::UniqueConstraint { .. } => "UNIQUE_CONSTRAINT_VIOLATION",
            Self::NotNull { .. } => "NOT_NULL_VIOLATION",
            Self::ForeignKey { .. } => "FOREIGN_KEY_VIOLATION",
            Self::ForeignKeyConstraint { .. } => "FOREIGN_KEY_CONSTRAINT_VIOLATION",
            Self::UnknownField { .. } => "UNKNOWN_FIELD",
            Self::UnknownEntity { .. } => "UNKNOWN_ENTITY",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::Safety { .. } => "SAFETY_VIOLATION",
            Self::AuthorizationDenied { .. } => "AUTHORIZATION_DENIED",
        };
        code.to_string()
    }

    /// A hint for fixing the input, when there is one.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::TypeMismatch { .. } => Some("Pass a value of the declared field type"),
            Self::LengthExceeded { .. } => Some("Shorten the value"),
            Self::Format { format, .. } => Some(match format.as_str() {
                "UUID" => "Use a hyphenated UUID such as 550e8400-e29b-41d4-a716-446655440000",
                "email" => "Use a valid email address",
                "timestamp" => "Use RFC 3339 (2024-01-31T12:00:00Z) or YYYY-MM-DD HH:MM:SS",
                _ => "Check the value format",
            }),
            Self::Constraint { constraint, .. } if constraint == "primary_key" => {
                Some("Primary keys cannot be updated")
            }
            Self::UniqueConstraint { .. } => Some("Use a different value or update the existing row"),
            Self::NotNull { .. } => Some("Provide a value for this field"),
            Self::ForeignKey { .. } => Some("Create the referenced record first"),
            Self::ForeignKeyConstraint { .. } => Some("Delete or reassign the dependent records first"),
            Self::UnknownField { .. } => Some("Check the field name against the schema"),
            Self::UnknownEntity { .. } => Some("Check the entity name against the schema"),
            Self::Conflict { .. } => Some("Reload the record and retry"),
            Self::Safety { operation, .. } => Some(match operation.as_str() {
                "update_without_filter" => "Add a filter or call force_update_all()",
                "delete_without_filter" => "Add a filter or call force_delete_all()",
                _ => "Narrow the operation with a filter",
            }),
            Self::Validation { kind, .. } if kind == "invalid_operator" => {
                Some("Use one of: eq, neq, gt, gte, lt, lte, like")
            }
            _ => None,
        }
    }

    /// Blocked by a safety guard rather than by the data.
    pub fn is_safety_violation(&self) -> bool {
        matches!(self, Self::Safety { .. })
    }

    /// A data-integrity constraint was violated.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::Constraint { .. }
                | Self::UniqueConstraint { .. }
                | Self::NotNull { .. }
                | Self::ForeignKey { .. }
                | Self::ForeignKeyConstraint { .. }
        )
    }
}

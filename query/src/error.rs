//! Query error types.

use cham_compiler::CompilerError;
use thiserror::Error;

/// Errors reported by a `SqlExecutor`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutorError {
    #[error("database error: {message}")]
    Database { message: String },

    #[error("connection error: {message}")]
    Connection { message: String },

    #[error("execution cancelled")]
    Cancelled,
}

impl ExecutorError {
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }
}

/// Errors that can occur while compiling or materializing a query.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("no schema loaded")]
    NoSchema,

    #[error("SQL generation failed: {0}")]
    Compiler(#[from] CompilerError),

    #[error("failed to serialize {what}: {message}")]
    Serialization { what: &'static str, message: String },

    #[error("malformed query plan: {message}")]
    MalformedPlan { message: String },

    #[error("main query failed: {0}")]
    MainQuery(#[source] ExecutorError),

    #[error("eager query '{relation}' failed: {source}")]
    EagerQuery {
        relation: String,
        #[source]
        source: ExecutorError,
    },

    #[error("query cancelled")]
    Cancelled,

    #[error("query deadline exceeded")]
    DeadlineExceeded,
}

impl QueryError {
    pub fn serialization(what: &'static str, message: impl Into<String>) -> Self {
        Self::Serialization {
            what,
            message: message.into(),
        }
    }

    pub fn malformed_plan(message: impl Into<String>) -> Self {
        Self::MalformedPlan {
            message: message.into(),
        }
    }

    pub fn eager_query(relation: impl Into<String>, source: ExecutorError) -> Self {
        Self::EagerQuery {
            relation: relation.into(),
            source,
        }
    }

    /// The relation whose eager query failed, if any.
    pub fn failed_relation(&self) -> Option<&str> {
        match self {
            Self::EagerQuery { relation, .. } => Some(relation),
            _ => None,
        }
    }
}

//! Engine error types.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no schema loaded")]
    NoSchema,

    #[error("no schema compiler configured")]
    CompilerNotConfigured,

    #[error("no mutation factory configured")]
    MutationFactoryNotConfigured,

    /// The compiler rejected the schema. Each entry is one rendered error.
    #[error("schema rejected:\n{}", .errors.join("\n"))]
    SchemaRejected { errors: Vec<String> },

    #[error("compiler error: {0}")]
    Compiler(#[from] cham_compiler::CompilerError),

    #[error("registry error: {0}")]
    Registry(#[from] cham_registry::RegistryError),

    #[error("merge error: {0}")]
    Merge(#[from] cham_merger::MergeError),

    #[error("query error: {0}")]
    Query(#[from] cham_query::QueryError),

    #[error("mutation error: {0}")]
    Mutation(#[from] cham_mutation::MutationError),
}

impl EngineError {
    pub fn schema_rejected(errors: Vec<String>) -> Self {
        Self::SchemaRejected { errors }
    }
}

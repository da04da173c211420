//! The schema compiler contract.

use crate::error::{CompilerError, CompilerResult};
use serde::{Deserialize, Serialize};

/// Placeholder in eager-load templates that receives the parent ID list.
pub const PARENT_IDS_PLACEHOLDER: &str = "$PARENT_IDS";

/// SQL generated for one query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeneratedSql {
    /// The root SELECT.
    pub main_query: String,
    /// `(relation name, template)` pairs, one per include level.
    ///
    /// Order encodes traversal depth and must be preserved.
    #[serde(default)]
    pub eager_queries: Vec<(String, String)>,
}

impl GeneratedSql {
    pub fn new(main_query: impl Into<String>) -> Self {
        Self {
            main_query: main_query.into(),
            eager_queries: Vec::new(),
        }
    }

    pub fn with_eager(mut self, relation: impl Into<String>, template: impl Into<String>) -> Self {
        self.eager_queries.push((relation.into(), template.into()));
        self
    }

    /// Decode a `generate_sql` response.
    pub fn from_json(json: &str) -> CompilerResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| CompilerError::internal(format!("invalid generated SQL: {}", e)))
    }

    /// Number of database round-trips this plan needs.
    pub fn round_trips(&self) -> usize {
        1 + self.eager_queries.len()
    }
}

/// The external schema compiler.
///
/// Schemas and queries cross this boundary as JSON text so any compiler
/// build (in-process or foreign) can sit behind it.
pub trait SchemaCompiler: Send + Sync {
    /// Parse schema source into schema JSON.
    fn parse_schema(&self, source: &str) -> CompilerResult<String>;

    /// Parse and type-check schema source, reporting every problem found.
    fn validate_schema(&self, source: &str) -> Result<(), Vec<CompilerError>>;

    /// Generate SQL for a query, returning `GeneratedSql` JSON.
    fn generate_sql(&self, query_json: &str, schema_json: &str) -> CompilerResult<String>;

    /// Generate DDL for a schema.
    fn generate_migration(&self, schema_json: &str) -> CompilerResult<String>;
}

//! SQL generation through the schema compiler.

use crate::ast::Query;
use crate::error::QueryError;
use cham_compiler::{GeneratedSql, SchemaCompiler};
use cham_registry::Schema;
use tracing::debug;

/// Generate SQL for `query` against `schema`.
///
/// Compiler errors are returned unchanged; a response that is not valid
/// `GeneratedSql` JSON is a malformed plan.
pub fn compile(
    query: &Query,
    schema: Option<&Schema>,
    compiler: &dyn SchemaCompiler,
) -> Result<GeneratedSql, QueryError> {
    let schema = schema.ok_or(QueryError::NoSchema)?;

    let query_json = query
        .to_json()
        .map_err(|e| QueryError::serialization("query", e.to_string()))?;
    let schema_json = schema
        .to_json()
        .map_err(|e| QueryError::serialization("schema", e.to_string()))?;

    let response = compiler.generate_sql(&query_json, &schema_json)?;

    let plan: GeneratedSql = serde_json::from_str(&response)
        .map_err(|e| QueryError::malformed_plan(format!("invalid compiler response: {}", e)))?;

    debug!(
        entity = %query.entity,
        eager_queries = plan.eager_queries.len(),
        "compiled query"
    );

    Ok(plan)
}

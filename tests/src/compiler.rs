//! Stub schema compiler.
//!
//! Stands in for the real compiler at the JSON boundary. Schema text is not
//! parsed: `parse_schema` answers with the schema it was built from. Query
//! plans are derived from the schema's relations so include paths produce
//! realistic eager-load templates.

use std::sync::Mutex;

use cham_compiler::{CompilerError, CompilerResult, GeneratedSql, SchemaCompiler};
use cham_query::Query;
use cham_registry::{entity_to_table, Schema};

pub struct StubCompiler {
    schema_json: String,
    rejections: Vec<CompilerError>,
    requests: Mutex<Vec<String>>,
}

impl StubCompiler {
    /// A compiler that accepts any source and yields `schema`.
    pub fn new(schema: &Schema) -> Self {
        Self {
            schema_json: schema.to_json().unwrap_or_default(),
            rejections: Vec::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Make `validate_schema` fail with `errors`.
    pub fn rejecting(mut self, errors: Vec<CompilerError>) -> Self {
        self.rejections = errors;
        self
    }

    /// Query JSON received by `generate_sql`, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn plan(query: &Query, schema: &Schema) -> CompilerResult<GeneratedSql> {
        if !schema.has_entity(&query.entity) {
            return Err(CompilerError::validation(format!(
                "unknown entity '{}'",
                query.entity
            )));
        }

        let mut main = format!("SELECT * FROM {}", entity_to_table(&query.entity));
        if let Some(limit) = query.limit {
            main.push_str(&format!(" LIMIT {}", limit));
        }
        let mut plan = GeneratedSql::new(main);

        for include in &query.includes {
            let mut current = query.entity.clone();
            let mut last = None;
            for segment in &include.path {
                let relation = schema
                    .get_entity(&current)
                    .and_then(|e| e.relation(segment))
                    .ok_or_else(|| {
                        CompilerError::validation(format!(
                            "'{}' has no relation '{}'",
                            current, segment
                        ))
                    })?;
                current = relation.target_entity.clone();
                last = Some(relation);
            }

            let Some(relation) = last else { continue };
            let foreign_key = relation.foreign_key.as_deref().ok_or_else(|| {
                CompilerError::validation(format!("relation '{}' has no foreign key", relation.name))
            })?;

            plan = plan.with_eager(
                &relation.name,
                format!(
                    "SELECT * FROM {} WHERE {} IN ($PARENT_IDS)",
                    entity_to_table(&relation.target_entity),
                    foreign_key
                ),
            );
        }

        Ok(plan)
    }
}

impl SchemaCompiler for StubCompiler {
    fn parse_schema(&self, _source: &str) -> CompilerResult<String> {
        Ok(self.schema_json.clone())
    }

    fn validate_schema(&self, _source: &str) -> Result<(), Vec<CompilerError>> {
        if self.rejections.is_empty() {
            Ok(())
        } else {
            Err(self.rejections.clone())
        }
    }

    fn generate_sql(&self, query_json: &str, schema_json: &str) -> CompilerResult<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(query_json.to_string());
        }

        let query: Query = serde_json::from_str(query_json)
            .map_err(|e| CompilerError::internal(format!("bad query json: {}", e)))?;
        let schema = Schema::from_json(schema_json)
            .map_err(|e| CompilerError::internal(format!("bad schema json: {}", e)))?;

        let plan = Self::plan(&query, &schema)?;
        serde_json::to_string(&plan).map_err(|e| CompilerError::internal(e.to_string()))
    }

    fn generate_migration(&self, schema_json: &str) -> CompilerResult<String> {
        let schema = Schema::from_json(schema_json)
            .map_err(|e| CompilerError::internal(format!("bad schema json: {}", e)))?;

        let statements: Vec<String> = schema
            .entity_names()
            .iter()
            .filter_map(|name| schema.get_entity(name))
            .map(|entity| {
                format!(
                    "CREATE TABLE {} ({});",
                    entity_to_table(&entity.name),
                    entity.field_names().join(", ")
                )
            })
            .collect();

        Ok(statements.join("\n"))
    }
}

//! Query materialization.
//!
//! A compiled plan is one main query plus an ordered list of eager-load
//! templates. The templates are executed strictly in order; each receives
//! the identifiers of the rows fetched by the previous round-trip (the
//! frontier) in place of its `$PARENT_IDS` placeholder.

use crate::cancel::Cancellation;
use crate::error::QueryError;
use crate::executor::SqlExecutor;
use crate::result::QueryResult;
use cham_compiler::{GeneratedSql, PARENT_IDS_PLACEHOLDER};
use cham_core::{ParentId, Row};
use cham_registry::Schema;
use std::time::Instant;
use tracing::{debug, trace};

/// Key column used when the schema declares no primary key for an entity.
const FALLBACK_KEY: &str = "id";

/// Executes compiled plans against a `SqlExecutor`.
pub struct Materializer<'a, E: SqlExecutor + ?Sized> {
    schema: &'a Schema,
    executor: &'a mut E,
    frontier: Vec<ParentId>,
}

impl<'a, E: SqlExecutor + ?Sized> Materializer<'a, E> {
    pub fn new(schema: &'a Schema, executor: &'a mut E) -> Self {
        Self {
            schema,
            executor,
            frontier: Vec::new(),
        }
    }

    /// Identifiers collected by the most recent round-trip.
    pub fn frontier(&self) -> &[ParentId] {
        &self.frontier
    }

    /// Run `plan` for `entity`.
    ///
    /// Performs exactly `1 + plan.eager_queries.len()` fetches. Any failure
    /// aborts the whole run; no partial result is returned.
    pub fn run(
        &mut self,
        entity: &str,
        plan: &GeneratedSql,
        cancel: &Cancellation,
    ) -> Result<QueryResult, QueryError> {
        let mut result = QueryResult::new(entity);
        self.frontier.clear();

        cancel.check()?;
        let started = Instant::now();
        trace!(sql = %plan.main_query, "main query");
        let rows = self
            .executor
            .fetch(&plan.main_query, cancel)
            .map_err(QueryError::MainQuery)?;

        // Entity whose rows currently make up the frontier. Unknown once a
        // relation cannot be followed through the schema.
        let mut current = self.schema.get_entity(entity).map(|e| e.name.clone());
        self.frontier = collect_ids(&rows, self.key_column(current.as_deref()));

        debug!(
            entity,
            rows = rows.len(),
            frontier = self.frontier.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "main query fetched"
        );
        result.rows = rows;

        for (relation, template) in &plan.eager_queries {
            let sql = substitute_parent_ids(template, &self.frontier)?;

            cancel.check()?;
            let started = Instant::now();
            trace!(relation = %relation, sql = %sql, "eager query");
            let rows = self
                .executor
                .fetch(&sql, cancel)
                .map_err(|e| QueryError::eager_query(relation, e))?;

            current = current
                .as_deref()
                .and_then(|name| self.schema.relation_target(name, relation))
                .map(|target| target.name.clone());
            self.frontier = collect_ids(&rows, self.key_column(current.as_deref()));

            debug!(
                relation = %relation,
                rows = rows.len(),
                frontier = self.frontier.len(),
                elapsed_us = started.elapsed().as_micros() as u64,
                "eager query fetched"
            );
            result.relations.insert(relation.clone(), rows);
        }

        cancel.check()?;
        Ok(result)
    }

    fn key_column(&self, entity: Option<&str>) -> &'a str {
        let schema: &'a Schema = self.schema;
        entity
            .and_then(|name| schema.primary_key_column(name))
            .unwrap_or(FALLBACK_KEY)
    }
}

/// Collect the non-null identifiers in `key` across `rows`.
fn collect_ids(rows: &[Row], key: &str) -> Vec<ParentId> {
    rows.iter()
        .filter_map(|row| row.get(key))
        .filter_map(ParentId::from_column)
        .collect()
}

/// Replace the first `$PARENT_IDS` in `template` with an IN-list body.
///
/// An empty frontier becomes `NULL`, so `IN (NULL)` matches nothing.
pub fn substitute_parent_ids(template: &str, ids: &[ParentId]) -> Result<String, QueryError> {
    if !template.contains(PARENT_IDS_PLACEHOLDER) {
        return Err(QueryError::malformed_plan(format!(
            "eager query has no {} placeholder: {}",
            PARENT_IDS_PLACEHOLDER, template
        )));
    }

    let list = if ids.is_empty() {
        "NULL".to_string()
    } else {
        ids.iter()
            .map(ParentId::to_sql_literal)
            .collect::<Vec<_>>()
            .join(", ")
    };

    Ok(template.replacen(PARENT_IDS_PLACEHOLDER, &list, 1))
}

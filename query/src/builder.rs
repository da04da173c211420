//! Chainable query construction.

use crate::ast::{FilterExpr, IncludePath, OrderByClause, Query, SortDirection};
use crate::compile::compile;
use crate::error::QueryError;
use cham_compiler::{GeneratedSql, SchemaCompiler};
use cham_core::Value;
use cham_registry::Schema;

/// Builds a `Query`.
///
/// Every method consumes the builder and returns it, so a `Query` handed out
/// by `build()` is never affected by later calls.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            query: Query::new(entity),
        }
    }

    /// Add a `field op value` condition (ANDed with the others).
    ///
    /// `field` may be a dotted path into a relation. `op` is matched
    /// case-insensitively.
    pub fn filter(mut self, field: &str, op: &str, value: impl Into<Value>) -> Self {
        self.query
            .filters
            .push(FilterExpr::condition(field, op, value));
        self
    }

    /// Add an arbitrary AND/OR expression.
    pub fn where_expr(mut self, expr: FilterExpr) -> Self {
        self.query.filters.push(expr);
        self
    }

    /// Eager-load a relation path such as `orders.items`.
    pub fn include(mut self, path: &str) -> Self {
        self.query.includes.push(IncludePath::parse(path));
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.query.order_by.push(OrderByClause {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.query.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: u64) -> Self {
        self.query.offset = Some(n);
        self
    }

    /// Target entity.
    pub fn entity(&self) -> &str {
        &self.query.entity
    }

    /// Snapshot of the query built so far.
    pub fn build(&self) -> Query {
        self.query.clone()
    }

    /// Generate SQL for the query built so far.
    pub fn compile(
        &self,
        schema: Option<&Schema>,
        compiler: &dyn SchemaCompiler,
    ) -> Result<GeneratedSql, QueryError> {
        compile(&self.query, schema, compiler)
    }
}

//! Materialized query results.

use cham_core::Row;
use std::collections::HashMap;

/// Rows fetched for one query: the root rows plus one row set per
/// eager-loaded relation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryResult {
    /// Target entity name.
    pub entity: String,
    /// Root rows.
    pub rows: Vec<Row>,
    /// Relation name → rows loaded for it.
    pub relations: HashMap<String, Vec<Row>>,
}

impl QueryResult {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            rows: Vec::new(),
            relations: HashMap::new(),
        }
    }

    /// Rows loaded for `relation`, empty if it was not included.
    pub fn relation(&self, relation: &str) -> &[Row] {
        self.relations
            .get(relation)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

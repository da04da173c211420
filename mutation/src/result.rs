//! Mutation descriptors and rendered output.

use cham_core::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of write operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationKind {
    Insert,
    Update,
    Delete,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MutationKind::Insert => "INSERT",
            MutationKind::Update => "UPDATE",
            MutationKind::Delete => "DELETE",
        })
    }
}

/// What a mutation does, independent of its SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub kind: MutationKind,
    pub entity: String,
    /// Whether a WHERE clause was supplied.
    pub has_filter: bool,
    /// Filled in by whoever executes the statement.
    pub affected_rows: Option<u64>,
}

impl Mutation {
    pub fn new(kind: MutationKind, entity: impl Into<String>, has_filter: bool) -> Self {
        Self {
            kind,
            entity: entity.into(),
            has_filter,
            affected_rows: None,
        }
    }

    pub fn with_affected_rows(mut self, rows: u64) -> Self {
        self.affected_rows = Some(rows);
        self
    }
}

/// A validated mutation ready to hand to a database driver.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMutation {
    pub mutation: Mutation,
    /// Statement text with `$1..$n` placeholders.
    pub sql: String,
    /// Positional parameters, `params[0]` binds `$1`.
    pub params: Vec<Value>,
}

impl RenderedMutation {
    pub fn kind(&self) -> MutationKind {
        self.mutation.kind
    }
}

//! WHERE conditions for update and delete.

use cham_core::Value;
use std::fmt;

/// Comparison operators a mutation filter may use.
///
/// A filter binds exactly one parameter, so list operators are not offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
}

impl FilterOp {
    /// Parse operator text, case-insensitively.
    pub fn parse(op: &str) -> Option<Self> {
        match op.to_ascii_lowercase().as_str() {
            "eq" => Some(Self::Eq),
            "neq" => Some(Self::Neq),
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            "like" => Some(Self::Like),
            _ => None,
        }
    }

    /// SQL spelling.
    pub fn sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Neq => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Like => "LIKE",
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql())
    }
}

/// One `field op value` condition as supplied by the caller.
///
/// The operator is kept as text until validation so an unknown operator is
/// reported as a validation error rather than silently dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationFilter {
    pub field: String,
    pub op: String,
    pub value: Value,
}

impl MutationFilter {
    pub fn new(field: impl Into<String>, op: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op: op.into(),
            value: value.into(),
        }
    }

    pub fn parsed_op(&self) -> Option<FilterOp> {
        FilterOp::parse(&self.op)
    }
}

//! Query representation.
//!
//! These types serialize to the JSON the schema compiler consumes.

use cham_core::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dotted path such as `orders.total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPath {
    pub segments: Vec<String>,
}

impl FieldPath {
    /// Split on `.`, dropping empty segments.
    pub fn parse(path: &str) -> Self {
        Self {
            segments: split_path(path),
        }
    }

    /// Whether the path crosses into a related entity.
    pub fn is_nested(&self) -> bool {
        self.segments.len() > 1
    }

    /// The first segment, if any.
    pub fn root(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// Comparison operator of a filter condition.
///
/// Operator text that is not recognized is carried as-is in `Other` so the
/// compiler can reject it with its own diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ComparisonOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    In,
    Other(String),
}

impl ComparisonOp {
    /// Normalize operator text (`eq`, `GTE`, `Like`, ...).
    pub fn parse(op: &str) -> Self {
        match op.to_ascii_lowercase().as_str() {
            "eq" => Self::Eq,
            "neq" => Self::Neq,
            "gt" => Self::Gt,
            "gte" => Self::Gte,
            "lt" => Self::Lt,
            "lte" => Self::Lte,
            "like" => Self::Like,
            "in" => Self::In,
            _ => Self::Other(op.to_string()),
        }
    }

    /// Canonical name as the compiler spells it.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Eq => "Eq",
            Self::Neq => "Neq",
            Self::Gt => "Gt",
            Self::Gte => "Gte",
            Self::Lt => "Lt",
            Self::Lte => "Lte",
            Self::Like => "Like",
            Self::In => "In",
            Self::Other(op) => op,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<&str> for ComparisonOp {
    fn from(op: &str) -> Self {
        Self::parse(op)
    }
}

impl From<String> for ComparisonOp {
    fn from(op: String) -> Self {
        Self::parse(&op)
    }
}

impl From<ComparisonOp> for String {
    fn from(op: ComparisonOp) -> Self {
        match op {
            ComparisonOp::Other(text) => text,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How two filter expressions combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOp {
    And,
    Or,
}

/// A single `field op value` test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub field: FieldPath,
    pub op: ComparisonOp,
    pub value: Value,
}

/// Filter expression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterExpr {
    Condition(FilterCondition),
    Binary {
        left: Box<FilterExpr>,
        op: LogicalOp,
        right: Box<FilterExpr>,
    },
}

impl FilterExpr {
    pub fn condition(field: &str, op: impl Into<ComparisonOp>, value: impl Into<Value>) -> Self {
        Self::Condition(FilterCondition {
            field: FieldPath::parse(field),
            op: op.into(),
            value: value.into(),
        })
    }

    pub fn and(self, other: FilterExpr) -> Self {
        Self::Binary {
            left: Box::new(self),
            op: LogicalOp::And,
            right: Box::new(other),
        }
    }

    pub fn or(self, other: FilterExpr) -> Self {
        Self::Binary {
            left: Box::new(self),
            op: LogicalOp::Or,
            right: Box::new(other),
        }
    }
}

/// An eager-load path such as `orders.items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludePath {
    pub path: Vec<String>,
}

impl IncludePath {
    pub fn parse(path: &str) -> Self {
        Self {
            path: split_path(path),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// `desc` (any case) is descending, anything else ascending.
    pub fn parse(direction: &str) -> Self {
        if direction.eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderByClause {
    pub field: String,
    pub direction: SortDirection,
}

/// A complete read request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Target entity name.
    pub entity: String,
    /// Top-level filters, combined with AND.
    pub filters: Vec<FilterExpr>,
    /// Relations to eager-load, in order.
    pub includes: Vec<IncludePath>,
    pub order_by: Vec<OrderByClause>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Query {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            filters: Vec::new(),
            includes: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn split_path(path: &str) -> Vec<String> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

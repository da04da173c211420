//! Chameleon Query
//!
//! Build read queries and materialize them with eager loading.
//!
//! Responsibilities:
//! - Accumulate filters, includes and ordering into an immutable `Query`
//! - Hand the query to the schema compiler for SQL generation
//! - Execute the main query and each eager-load level in order, propagating
//!   parent identifiers from one level to the next
//!
//! # Module Structure
//!
//! - `ast` - Query representation shared with the schema compiler
//! - `builder` - Chainable `QueryBuilder`
//! - `compile` - SQL generation through the compiler contract
//! - `executor` - The `SqlExecutor` seam to the database
//! - `materialize` - Round-trip sequencing and frontier propagation
//! - `cancel` - Cancellation token and deadline

mod ast;
mod builder;
mod cancel;
mod compile;
mod error;
mod executor;
mod materialize;
mod result;

pub use ast::{
    ComparisonOp, FieldPath, FilterCondition, FilterExpr, IncludePath, LogicalOp, OrderByClause,
    Query, SortDirection,
};
pub use builder::QueryBuilder;
pub use cancel::Cancellation;
pub use compile::compile;
pub use error::{ExecutorError, QueryError};
pub use executor::SqlExecutor;
pub use materialize::{substitute_parent_ids, Materializer};
pub use result::QueryResult;

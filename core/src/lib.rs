//! Chameleon Core Types
//!
//! This crate provides the foundational types used throughout the workspace:
//! - The tagged scalar `Value` carried by filters and field assignments
//! - Database-side `ColumnValue` and the `Row` map returned by executors
//! - `ParentId`, the normalized identifier that makes up an eager-load frontier

mod column;
mod value;

pub use column::*;
pub use value::*;

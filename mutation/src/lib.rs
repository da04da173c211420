//! Chameleon Mutation
//!
//! Validate and render write operations (INSERT/UPDATE/DELETE).
//!
//! Responsibilities:
//! - Validate field assignments against the schema
//! - Block unfiltered UPDATE and DELETE unless explicitly forced
//! - Render parameterized SQL for validated input
//!
//! # Module Structure
//!
//! - `validation` - `Validator` and its type, format and safety checks
//! - `ops/` - One builder per operation (insert, update, delete)
//! - `factory` - `MutationFactory` handing out builders
//! - `filter` - WHERE conditions and their operators
//! - `error` - Error taxonomy with stable codes
//! - `result` - Mutation descriptors and rendered SQL

mod error;
mod factory;
mod filter;
mod ops;
mod result;
mod validation;

pub use error::{MutationError, MutationResult};
pub use factory::{AnyMutation, MutationFactory, SqlMutationFactory};
pub use filter::{FilterOp, MutationFilter};
pub use ops::{BuildMutation, DeleteMutation, InsertMutation, UpdateMutation};
pub use result::{Mutation, MutationKind, RenderedMutation};
pub use validation::{ForeignKeyChecker, Validator, ValidatorConfig};

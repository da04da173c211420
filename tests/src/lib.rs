//! Chameleon integration test fixtures.
//!
//! - `compiler` - `StubCompiler`, a schema compiler that plans eager loads
//!   from the schema's relations
//! - `executor` - `ScriptedExecutor`, replays canned rows and records SQL
//! - `fixtures` - the shop schema (User, Order, OrderItem) and its ids
//! - `assertion` - helpers for checking fetched rows
//! - `logging` - one-time `tracing` subscriber for tests

pub mod compiler;
pub mod executor;
pub mod fixtures;
pub mod logging;

pub mod prelude {
    pub use crate::assertion::{column_ids, statements_match};
    pub use crate::compiler::StubCompiler;
    pub use crate::executor::ScriptedExecutor;
    pub use crate::fixtures::{shop_engine, shop_schema, shop_validator, ORDER_IDS, USER_ID};
    pub use crate::logging::init_tracing;

    pub use cham_core::{assignments, row, ColumnValue, ParentId, Row, Value};
    pub use cham_engine::{DebugLevel, Engine, EngineConfig, EngineError};
    pub use cham_merger::{merge, FileLoader, MergeError, SchemaSource, SourceLine};
    pub use cham_mutation::{
        BuildMutation, MutationError, MutationFilter, MutationKind, SqlMutationFactory,
        Validator, ValidatorConfig,
    };
    pub use cham_query::{Cancellation, ExecutorError, Materializer, QueryBuilder, QueryError};
    pub use cham_registry::Schema;
}

//! Chameleon Registry
//!
//! The schema model: entities, fields and relations as produced by the schema
//! compiler. A `Schema` is immutable after construction (via `SchemaBuilder`
//! or `Schema::from_json`) and is shared read-only by queries and mutations.

mod builder;
mod naming;
mod registry;
mod types;

pub use builder::{EntityBuilder, RegistryError, SchemaBuilder};
pub use naming::entity_to_table;
pub use registry::Schema;
pub use types::*;

//! Chameleon Engine
//!
//! The entry point tying the workspace together. An `Engine` owns the
//! loaded schema, the schema compiler and the mutation factory, and hands
//! out query and mutation builders bound to them.

mod config;
mod engine;
mod error;

pub use config::{DebugLevel, EngineConfig, DEBUG_ENV};
pub use engine::{Engine, EngineBuilder, SQL_TARGET};
pub use error::{EngineError, EngineResult};

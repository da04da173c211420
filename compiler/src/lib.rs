//! Chameleon Compiler Contract
//!
//! The schema DSL parser, type checker and SQL generator live outside this
//! workspace. This crate defines the narrow contract used to reach them:
//! - `SchemaCompiler` - parse/validate/generate, JSON at the boundary
//! - `GeneratedSql` - main query plus ordered eager-load templates
//! - `CompilerError` - structured parse errors and their rendering

mod contract;
mod error;

pub use contract::{GeneratedSql, SchemaCompiler, PARENT_IDS_PLACEHOLDER};
pub use error::{format_compiler_error, CompilerError, CompilerResult, ParseErrorDetail};

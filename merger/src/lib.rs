//! Chameleon Schema Merger
//!
//! Combines several schema source files into one document for the schema
//! compiler while remembering where every line came from, so compiler errors
//! against the merged text can be reported against the original files.

mod error;
mod loader;
mod merge;
mod remap;

pub use error::{MergeError, MergeResult};
pub use loader::FileLoader;
pub use merge::{merge, MergedSchema, SchemaSource, SourceLine};
pub use remap::MERGED_DOCUMENT;

//! Merge error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for merge operations.
pub type MergeResult<T> = Result<T, MergeError>;

/// Errors that can occur while loading or merging schema files.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("no schema files to merge")]
    NoSources,

    #[error("no entities found in schema")]
    NoEntities,

    #[error(
        "duplicate entities found: {}\n\nEntity names must be unique across all schema files. Define each entity only once.",
        format_duplicates(.duplicates)
    )]
    DuplicateEntities {
        /// `(entity name, occurrences)`, sorted by name.
        duplicates: Vec<(String, usize)>,
    },

    #[error("no schema files found in {}", format_paths(.paths))]
    NoSchemaFiles { paths: Vec<PathBuf> },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MergeError {
    pub fn duplicate_entities(duplicates: Vec<(String, usize)>) -> Self {
        Self::DuplicateEntities { duplicates }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

fn format_duplicates(duplicates: &[(String, usize)]) -> String {
    duplicates
        .iter()
        .map(|(name, count)| format!("{} (appears {} times)", name, count))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

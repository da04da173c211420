//! Schema file discovery.

use crate::error::{MergeError, MergeResult};
use crate::merge::SchemaSource;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Schema file extension.
const SCHEMA_EXTENSION: &str = "cham";

/// Loads `*.cham` files from a set of directories.
#[derive(Debug, Clone)]
pub struct FileLoader {
    paths: Vec<PathBuf>,
}

impl FileLoader {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Load every schema file, ordered by name.
    ///
    /// Names are file names without their directory, unless two directories
    /// hold a file with the same name: those files are named by their full
    /// path so provenance stays unambiguous. Contents stay paired with their
    /// names through the sort.
    pub fn load_all(&self) -> MergeResult<Vec<SchemaSource>> {
        let mut files = Vec::new();
        for dir in &self.paths {
            files.extend(find_schema_files(dir)?);
        }

        let mut base_counts: HashMap<String, usize> = HashMap::new();
        for file in &files {
            *base_counts.entry(base_name(file)).or_default() += 1;
        }

        let mut sources = Vec::with_capacity(files.len());
        for file in &files {
            let content = self.load(file)?;
            let base = base_name(file);
            let name = if base_counts.get(&base).copied().unwrap_or(0) > 1 {
                file.display().to_string()
            } else {
                base
            };
            sources.push(SchemaSource::new(name, content));
        }

        if sources.is_empty() {
            return Err(MergeError::NoSchemaFiles {
                paths: self.paths.clone(),
            });
        }

        sources.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(files = sources.len(), "loaded schema files");
        Ok(sources)
    }

    /// Load a single schema file.
    pub fn load(&self, path: &Path) -> MergeResult<String> {
        fs::read_to_string(path).map_err(|e| MergeError::io(path, e))
    }
}

fn base_name(file: &Path) -> String {
    file.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string())
}

fn find_schema_files(dir: &Path) -> MergeResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| MergeError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| MergeError::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == SCHEMA_EXTENSION) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

//! Multi-file merge with line provenance.

use crate::error::{MergeError, MergeResult};
use regex_lite::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;
use tracing::debug;

const BANNER_RULE: &str = "// ==========================================";

/// One schema source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaSource {
    /// File name, used for ordering and in error locations.
    pub name: String,
    /// Full file contents.
    pub content: String,
}

impl SchemaSource {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Where a merged line came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub file: String,
    /// 1-indexed line within `file`.
    pub line: usize,
}

impl SourceLine {
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

/// The merged document and its provenance map.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedSchema {
    /// Concatenated schema text.
    pub content: String,
    /// Merged line (1-indexed) → source location. Banner and separator lines
    /// have no entry.
    pub line_map: BTreeMap<usize, SourceLine>,
    /// Source file names in merge order.
    pub files: Vec<String>,
}

/// Merge schema sources into one document.
///
/// Sources are ordered by file name. Each file contributes a three-line
/// banner, its lines, and one blank separator line. The merged text must
/// declare at least one entity and no entity twice.
pub fn merge(sources: &[SchemaSource]) -> MergeResult<MergedSchema> {
    if sources.is_empty() {
        return Err(MergeError::NoSources);
    }

    let mut ordered: Vec<&SchemaSource> = sources.iter().collect();
    ordered.sort_by(|a, b| a.name.cmp(&b.name));

    let mut lines: Vec<String> = Vec::new();
    let mut line_map = BTreeMap::new();

    for source in &ordered {
        lines.push(BANNER_RULE.to_string());
        lines.push(format!("// From: {}", source.name));
        lines.push(BANNER_RULE.to_string());

        let mut content_lines: Vec<&str> = source.content.split('\n').collect();
        if content_lines.last() == Some(&"") {
            content_lines.pop();
        }

        for (idx, line) in content_lines.into_iter().enumerate() {
            lines.push(line.to_string());
            line_map.insert(lines.len(), SourceLine::new(&source.name, idx + 1));
        }

        lines.push(String::new());
    }

    let mut content = lines.join("\n");
    content.push('\n');

    check_entities(&content)?;

    debug!(
        files = ordered.len(),
        mapped_lines = line_map.len(),
        "merged schema sources"
    );

    Ok(MergedSchema {
        content,
        line_map,
        files: ordered.iter().map(|s| s.name.clone()).collect(),
    })
}

/// Scan for `entity <Name> {` declarations and reject duplicates.
fn check_entities(content: &str) -> MergeResult<()> {
    static ENTITY_DECL: OnceLock<Regex> = OnceLock::new();
    let re = ENTITY_DECL.get_or_init(|| {
        Regex::new(r"entity\s+([A-Za-z_][A-Za-z0-9_]*)\s*\{").expect("valid entity pattern")
    });

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for caps in re.captures_iter(content) {
        if let Some(name) = caps.get(1) {
            *counts.entry(name.as_str()).or_default() += 1;
        }
    }

    if counts.is_empty() {
        return Err(MergeError::NoEntities);
    }

    let mut duplicates: Vec<(String, usize)> = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, count)| (name.to_string(), count))
        .collect();

    if duplicates.is_empty() {
        return Ok(());
    }

    duplicates.sort();
    Err(MergeError::duplicate_entities(duplicates))
}

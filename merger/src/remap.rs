//! Mapping merged-document lines back to source files.

use crate::merge::{MergedSchema, SourceLine};
use regex_lite::Regex;
use std::sync::OnceLock;
use tracing::warn;

/// How far from the reported line a mapped neighbour may be.
const SEARCH_WINDOW: usize = 5;

/// Placeholder document name the compiler uses in its messages.
pub const MERGED_DOCUMENT: &str = "schema.cham";

fn line_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [r"line (\d+)", r"-->.*?:(\d+):", r"\s(\d+)\s*│"]
            .iter()
            .map(|p| Regex::new(p).expect("valid line pattern"))
            .collect()
    })
}

impl MergedSchema {
    /// Resolve a merged line to its source location.
    ///
    /// Lines without an entry (banners, separators, compiler positions just
    /// past a file) fall back to the nearest mapped line within five lines,
    /// preferring the line above. The neighbour's offset is carried over, so
    /// this is a best guess near file boundaries.
    pub fn resolve(&self, merged_line: usize) -> Option<SourceLine> {
        if let Some(source) = self.line_map.get(&merged_line) {
            return Some(source.clone());
        }

        for offset in 1..=SEARCH_WINDOW {
            if let Some(above) = merged_line.checked_sub(offset) {
                if let Some(source) = self.line_map.get(&above) {
                    return Some(SourceLine::new(&source.file, source.line + offset));
                }
            }
            if let Some(source) = merged_line
                .checked_add(offset)
                .and_then(|below| self.line_map.get(&below))
            {
                let line = source.line.saturating_sub(offset).max(1);
                return Some(SourceLine::new(&source.file, line));
            }
        }

        None
    }

    /// Find the merged line a compiler message refers to and resolve it.
    ///
    /// Returns `(merged line, source location)`.
    pub fn locate(&self, message: &str) -> Option<(usize, SourceLine)> {
        for pattern in line_patterns() {
            let Some(line) = pattern
                .captures(message)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<usize>().ok())
            else {
                continue;
            };

            if let Some(source) = self.resolve(line) {
                return Some((line, source));
            }
        }
        None
    }

    /// Rewrite a compiler message so it points at the source file.
    ///
    /// The result starts with `Error in <file>:<line>` and every reference to
    /// the merged document is replaced by the source file. Messages that
    /// cannot be mapped are returned unchanged.
    pub fn remap_message(&self, message: &str) -> String {
        let Some((merged_line, source)) = self.locate(message) else {
            warn!(
                files = self.files.len(),
                "could not map compiler error to a source file"
            );
            return message.to_string();
        };

        let located = format!("{}:{}", source.file, source.line);
        let rewritten = message
            .replace(&format!("{}:{}", MERGED_DOCUMENT, merged_line), &located)
            .replace(MERGED_DOCUMENT, &source.file);

        format!("Error in {}\n{}", located, rewritten)
    }
}

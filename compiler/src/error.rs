//! Compiler error types.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use thiserror::Error;

/// Result type for compiler calls.
pub type CompilerResult<T> = Result<T, CompilerError>;

/// Position and context of a schema parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseErrorDetail {
    /// Human-readable message.
    pub message: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Source excerpt around the failure.
    #[serde(default)]
    pub snippet: Option<String>,
    /// How to fix it, when the compiler knows.
    #[serde(default)]
    pub suggestion: Option<String>,
    /// The offending token.
    #[serde(default)]
    pub token: Option<String>,
}

impl ParseErrorDetail {
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
            snippet: None,
            suggestion: None,
            token: None,
        }
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// Errors reported by the schema compiler.
///
/// Serialized as `{"kind": ..., "data": ...}`, the shape the compiler uses
/// when it hands errors back as text.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum CompilerError {
    #[error("Parse error at line {}, column {}: {}", .0.line, .0.column, .0.message)]
    #[serde(rename = "ParseError")]
    Parse(ParseErrorDetail),

    #[error("Validation error: {0}")]
    #[serde(rename = "ValidationError")]
    Validation(String),

    #[error("Internal error: {0}")]
    #[serde(rename = "InternalError")]
    Internal(String),
}

impl CompilerError {
    pub fn parse(detail: ParseErrorDetail) -> Self {
        Self::Parse(detail)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Decode an error payload returned as text.
    ///
    /// Payloads that are not structured JSON are kept verbatim as a
    /// validation message.
    pub fn from_payload(payload: &str) -> Self {
        serde_json::from_str(payload).unwrap_or_else(|_| Self::Validation(payload.to_string()))
    }

    /// The parse detail, if this is a parse error.
    pub fn parse_detail(&self) -> Option<&ParseErrorDetail> {
        match self {
            Self::Parse(detail) => Some(detail),
            _ => None,
        }
    }
}

/// Render a compiler error for humans.
///
/// Parse errors get the located layout:
///
/// ```text
/// Error: <message>
///
///   --> <document>:<line>:<column>
///
/// <snippet>
///
///   Help: <suggestion>
/// ```
///
/// Other errors render as their display text.
pub fn format_compiler_error(err: &CompilerError, document: &str) -> String {
    let detail = match err {
        CompilerError::Parse(detail) => detail,
        other => return other.to_string(),
    };

    let mut out = String::new();
    let _ = writeln!(out, "Error: {}", detail.message);
    out.push('\n');
    let _ = writeln!(out, "  --> {}:{}:{}", document, detail.line, detail.column);

    if let Some(snippet) = detail.snippet.as_deref().filter(|s| !s.is_empty()) {
        out.push('\n');
        out.push_str(snippet);
        out.push('\n');
    }

    if let Some(help) = detail.suggestion.as_deref().filter(|s| !s.is_empty()) {
        out.push('\n');
        let _ = writeln!(out, "  Help: {}", help.replace('\n', "\n  "));
    }

    out
}

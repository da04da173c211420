//! Values as they come back from the database.
//!
//! Drivers hand back identifiers in several native encodings (text, native
//! UUIDs, fixed-width 16-byte UUIDs, raw bytes). `ParentId::from_column`
//! folds them into one canonical form so the materializer can build IN-lists
//! uniformly. Fixed-width arrays become `ColumnValue::Uuid` on the way in;
//! variable-length `Bytes` are always text.

use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// A single column value in a fetched row.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Decimal kept as its exact textual representation.
    Decimal(String),
    Text(String),
    Uuid(Uuid),
    /// Variable-length binary, read back as UTF-8 text when used as a key.
    Bytes(Vec<u8>),
    /// Timestamp as milliseconds since Unix epoch.
    Timestamp(i64),
}

impl ColumnValue {
    /// Returns true if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, ColumnValue::Null)
    }

    /// Get as text if this is a Text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ColumnValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Null => write!(f, "NULL"),
            ColumnValue::Bool(b) => write!(f, "{}", b),
            ColumnValue::Int(i) => write!(f, "{}", i),
            ColumnValue::Float(fl) => write!(f, "{}", fl),
            ColumnValue::Decimal(d) => write!(f, "{}", d),
            ColumnValue::Text(s) => write!(f, "{}", s),
            ColumnValue::Uuid(id) => write!(f, "{}", id.hyphenated()),
            ColumnValue::Bytes(bytes) => {
                for b in bytes {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
            ColumnValue::Timestamp(t) => write!(f, "{}", t),
        }
    }
}

impl From<&str> for ColumnValue {
    fn from(s: &str) -> Self {
        ColumnValue::Text(s.to_string())
    }
}

impl From<String> for ColumnValue {
    fn from(s: String) -> Self {
        ColumnValue::Text(s)
    }
}

impl From<i64> for ColumnValue {
    fn from(i: i64) -> Self {
        ColumnValue::Int(i)
    }
}

impl From<f64> for ColumnValue {
    fn from(f: f64) -> Self {
        ColumnValue::Float(f)
    }
}

impl From<bool> for ColumnValue {
    fn from(b: bool) -> Self {
        ColumnValue::Bool(b)
    }
}

impl From<Uuid> for ColumnValue {
    fn from(id: Uuid) -> Self {
        ColumnValue::Uuid(id)
    }
}

impl From<[u8; 16]> for ColumnValue {
    fn from(bytes: [u8; 16]) -> Self {
        ColumnValue::Uuid(Uuid::from_bytes(bytes))
    }
}

/// A fetched row: column name → value.
pub type Row = HashMap<String, ColumnValue>;

/// Helper macro to build rows in tests and fixtures.
#[macro_export]
macro_rules! row {
    () => {
        std::collections::HashMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        {
            let mut map: $crate::Row = std::collections::HashMap::new();
            $(
                map.insert($key.to_string(), $crate::ColumnValue::from($value));
            )+
            map
        }
    };
}

/// A parent identifier in canonical form.
#[derive(Debug, Clone, PartialEq)]
pub enum ParentId {
    /// Textual identifier (includes every UUID encoding).
    Text(String),
    Int(i64),
    Float(f64),
    /// Anything else, carried as its display text.
    Other(String),
}

impl ParentId {
    /// Normalize a column value into a parent identifier.
    ///
    /// Returns `None` for NULL: a missing key can never be a parent.
    pub fn from_column(value: &ColumnValue) -> Option<Self> {
        let id = match value {
            ColumnValue::Null => return None,
            ColumnValue::Text(s) => ParentId::Text(s.clone()),
            ColumnValue::Uuid(id) => ParentId::Text(id.hyphenated().to_string()),
            ColumnValue::Bytes(bytes) => {
                ParentId::Text(String::from_utf8_lossy(bytes).into_owned())
            }
            ColumnValue::Int(i) => ParentId::Int(*i),
            ColumnValue::Float(f) if f.is_finite() => ParentId::Float(*f),
            other => ParentId::Other(other.to_string()),
        };
        Some(id)
    }

    /// Render this identifier as a SQL literal.
    ///
    /// Strings are single-quoted with embedded quotes doubled, numbers are
    /// emitted verbatim, everything else shares the quoted fallback.
    /// Non-finite floats have no SQL literal and are quoted too.
    pub fn to_sql_literal(&self) -> String {
        match self {
            ParentId::Text(s) => quote_literal(s),
            ParentId::Int(i) => i.to_string(),
            ParentId::Float(f) if f.is_finite() => f.to_string(),
            ParentId::Float(f) => quote_literal(&f.to_string()),
            ParentId::Other(s) => quote_literal(s),
        }
    }
}

impl fmt::Display for ParentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentId::Text(s) | ParentId::Other(s) => write!(f, "{}", s),
            ParentId::Int(i) => write!(f, "{}", i),
            ParentId::Float(fl) => write!(f, "{}", fl),
        }
    }
}

fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

//! Mutation builders.
//!
//! Each operation (INSERT, UPDATE, DELETE) lives in its own module. A builder
//! accumulates assignments and filters, then `build()` runs the validator and
//! renders parameterized SQL. Nothing is rendered for input that fails
//! validation.

mod delete;
mod insert;
mod update;

pub use delete::DeleteMutation;
pub use insert::InsertMutation;
pub use update::UpdateMutation;

use std::collections::BTreeMap;

use cham_core::Value;

use crate::error::{MutationError, MutationResult};
use crate::filter::MutationFilter;
use crate::result::{MutationKind, RenderedMutation};

/// Common interface of every mutation builder.
pub trait BuildMutation {
    fn kind(&self) -> MutationKind;

    fn entity(&self) -> &str;

    /// Validate the accumulated input and render it.
    fn build(&self) -> MutationResult<RenderedMutation>;
}

/// Filters keyed by (field, lowercased operator); a later write replaces an
/// earlier one with the same key.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct FilterSet {
    filters: BTreeMap<(String, String), Value>,
}

impl FilterSet {
    pub(crate) fn insert(&mut self, field: String, op: &str, value: Value) {
        self.filters.insert((field, op.to_ascii_lowercase()), value);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub(crate) fn to_filters(&self) -> Vec<MutationFilter> {
        self.filters
            .iter()
            .map(|((field, op), value)| MutationFilter::new(field.as_str(), op.as_str(), value.clone()))
            .collect()
    }
}

/// Positional parameter list.
#[derive(Debug, Default)]
pub(crate) struct Params {
    values: Vec<Value>,
}

impl Params {
    /// Bind `value` and return its placeholder.
    pub(crate) fn bind(&mut self, value: Value) -> String {
        self.values.push(value);
        format!("${}", self.values.len())
    }

    pub(crate) fn into_vec(self) -> Vec<Value> {
        self.values
    }
}

pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Render ` WHERE a = $n AND ...`, or nothing when there are no filters.
pub(crate) fn render_where(filters: &[MutationFilter], params: &mut Params) -> MutationResult<String> {
    if filters.is_empty() {
        return Ok(String::new());
    }

    let mut conditions = Vec::with_capacity(filters.len());
    for filter in filters {
        let op = filter.parsed_op().ok_or_else(|| {
            MutationError::validation(
                &filter.field,
                "invalid_operator",
                format!("unsupported filter operator '{}'", filter.op),
            )
        })?;
        let placeholder = params.bind(filter.value.clone());
        conditions.push(format!("{} {} {}", quote_ident(&filter.field), op.sql(), placeholder));
    }

    Ok(format!(" WHERE {}", conditions.join(" AND ")))
}

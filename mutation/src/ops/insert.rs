//! INSERT operation - creates one row.

use cham_core::{Assignments, Value};
use cham_registry::entity_to_table;
use tracing::debug;

use super::{quote_ident, BuildMutation, Params};
use crate::error::MutationResult;
use crate::result::{Mutation, MutationKind, RenderedMutation};
use crate::validation::Validator;

/// Builder for an INSERT.
#[derive(Debug, Clone)]
pub struct InsertMutation {
    validator: Validator,
    entity: String,
    values: Assignments,
}

impl InsertMutation {
    pub fn new(validator: Validator, entity: impl Into<String>) -> Self {
        Self {
            validator,
            entity: entity.into(),
            values: Assignments::new(),
        }
    }

    /// Assign a field; a later assignment to the same field wins.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    pub fn values(&self) -> &Assignments {
        &self.values
    }
}

impl BuildMutation for InsertMutation {
    fn kind(&self) -> MutationKind {
        MutationKind::Insert
    }

    fn entity(&self) -> &str {
        &self.entity
    }

    fn build(&self) -> MutationResult<RenderedMutation> {
        self.validator.validate_insert(&self.entity, &self.values)?;

        let table = quote_ident(&entity_to_table(&self.entity));
        let mut params = Params::default();

        let sql = if self.values.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES RETURNING *", table)
        } else {
            let mut columns = Vec::with_capacity(self.values.len());
            let mut placeholders = Vec::with_capacity(self.values.len());
            for (field, value) in &self.values {
                columns.push(quote_ident(field));
                placeholders.push(params.bind(value.clone()));
            }
            format!(
                "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
                table,
                columns.join(", "),
                placeholders.join(", ")
            )
        };

        let params = params.into_vec();
        debug!(entity = %self.entity, sql = %sql, params = params.len(), "rendered insert");

        Ok(RenderedMutation {
            mutation: Mutation::new(MutationKind::Insert, &self.entity, false),
            sql,
            params,
        })
    }
}

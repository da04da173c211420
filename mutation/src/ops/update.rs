//! UPDATE operation - modifies the rows matching a filter.

use cham_core::{Assignments, Value};
use cham_registry::entity_to_table;
use tracing::debug;

use super::{quote_ident, render_where, BuildMutation, FilterSet, Params};
use crate::error::MutationResult;
use crate::result::{Mutation, MutationKind, RenderedMutation};
use crate::validation::Validator;

/// Builder for an UPDATE.
#[derive(Debug, Clone)]
pub struct UpdateMutation {
    validator: Validator,
    entity: String,
    updates: Assignments,
    filters: FilterSet,
    force_update_all: bool,
}

impl UpdateMutation {
    pub fn new(validator: Validator, entity: impl Into<String>) -> Self {
        Self {
            validator,
            entity: entity.into(),
            updates: Assignments::new(),
            filters: FilterSet::default(),
            force_update_all: false,
        }
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.updates.insert(field.into(), value.into());
        self
    }

    pub fn filter(mut self, field: impl Into<String>, op: &str, value: impl Into<Value>) -> Self {
        self.filters.insert(field.into(), op, value.into());
        self
    }

    /// Allow the update to run without a WHERE clause.
    pub fn force_update_all(mut self) -> Self {
        self.force_update_all = true;
        self
    }
}

impl BuildMutation for UpdateMutation {
    fn kind(&self) -> MutationKind {
        MutationKind::Update
    }

    fn entity(&self) -> &str {
        &self.entity
    }

    fn build(&self) -> MutationResult<RenderedMutation> {
        let filters = self.filters.to_filters();
        self.validator
            .validate_update(&self.entity, &filters, &self.updates, self.force_update_all)?;

        let mut params = Params::default();
        let assignments: Vec<String> = self
            .updates
            .iter()
            .map(|(field, value)| format!("{} = {}", quote_ident(field), params.bind(value.clone())))
            .collect();
        let where_clause = render_where(&filters, &mut params)?;

        let sql = format!(
            "UPDATE {} SET {}{} RETURNING *",
            quote_ident(&entity_to_table(&self.entity)),
            assignments.join(", "),
            where_clause
        );

        let params = params.into_vec();
        debug!(entity = %self.entity, sql = %sql, params = params.len(), "rendered update");

        Ok(RenderedMutation {
            mutation: Mutation::new(MutationKind::Update, &self.entity, !filters.is_empty()),
            sql,
            params,
        })
    }
}

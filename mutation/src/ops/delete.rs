//! DELETE operation - removes the rows matching a filter.

use cham_core::Value;
use cham_registry::entity_to_table;
use tracing::debug;

use super::{quote_ident, render_where, BuildMutation, FilterSet, Params};
use crate::error::MutationResult;
use crate::result::{Mutation, MutationKind, RenderedMutation};
use crate::validation::Validator;

/// Builder for a DELETE.
#[derive(Debug, Clone)]
pub struct DeleteMutation {
    validator: Validator,
    entity: String,
    filters: FilterSet,
    force_delete_all: bool,
}

impl DeleteMutation {
    pub fn new(validator: Validator, entity: impl Into<String>) -> Self {
        Self {
            validator,
            entity: entity.into(),
            filters: FilterSet::default(),
            force_delete_all: false,
        }
    }

    pub fn filter(mut self, field: impl Into<String>, op: &str, value: impl Into<Value>) -> Self {
        self.filters.insert(field.into(), op, value.into());
        self
    }

    /// Allow the delete to run without a WHERE clause.
    pub fn force_delete_all(mut self) -> Self {
        self.force_delete_all = true;
        self
    }
}

impl BuildMutation for DeleteMutation {
    fn kind(&self) -> MutationKind {
        MutationKind::Delete
    }

    fn entity(&self) -> &str {
        &self.entity
    }

    fn build(&self) -> MutationResult<RenderedMutation> {
        let filters = self.filters.to_filters();
        self.validator
            .validate_delete(&self.entity, &filters, self.force_delete_all)?;

        let mut params = Params::default();
        let where_clause = render_where(&filters, &mut params)?;
        let sql = format!(
            "DELETE FROM {}{}",
            quote_ident(&entity_to_table(&self.entity)),
            where_clause
        );

        let params = params.into_vec();
        debug!(entity = %self.entity, sql = %sql, params = params.len(), "rendered delete");

        Ok(RenderedMutation {
            mutation: Mutation::new(MutationKind::Delete, &self.entity, !filters.is_empty()),
            sql,
            params,
        })
    }
}

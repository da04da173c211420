//! Mutation factory.
//!
//! The engine receives a factory at construction time and asks it for
//! builders, so alternative renderers can be swapped in without touching the
//! engine.

use crate::error::MutationResult;
use crate::ops::{BuildMutation, DeleteMutation, InsertMutation, UpdateMutation};
use crate::result::{MutationKind, RenderedMutation};
use crate::validation::Validator;

/// Creates mutation builders bound to a validator.
pub trait MutationFactory: Send + Sync {
    fn insert(&self, validator: Validator, entity: &str) -> InsertMutation;

    fn update(&self, validator: Validator, entity: &str) -> UpdateMutation;

    fn delete(&self, validator: Validator, entity: &str) -> DeleteMutation;

    /// Create a builder of the given kind.
    fn create(&self, kind: MutationKind, validator: Validator, entity: &str) -> AnyMutation {
        match kind {
            MutationKind::Insert => AnyMutation::Insert(self.insert(validator, entity)),
            MutationKind::Update => AnyMutation::Update(self.update(validator, entity)),
            MutationKind::Delete => AnyMutation::Delete(self.delete(validator, entity)),
        }
    }
}

/// Factory producing the parameterized-SQL builders of this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlMutationFactory;

impl MutationFactory for SqlMutationFactory {
    fn insert(&self, validator: Validator, entity: &str) -> InsertMutation {
        InsertMutation::new(validator, entity)
    }

    fn update(&self, validator: Validator, entity: &str) -> UpdateMutation {
        UpdateMutation::new(validator, entity)
    }

    fn delete(&self, validator: Validator, entity: &str) -> DeleteMutation {
        DeleteMutation::new(validator, entity)
    }
}

/// A builder of any kind.
#[derive(Debug, Clone)]
pub enum AnyMutation {
    Insert(InsertMutation),
    Update(UpdateMutation),
    Delete(DeleteMutation),
}

impl AnyMutation {
    fn inner(&self) -> &dyn BuildMutation {
        match self {
            AnyMutation::Insert(m) => m,
            AnyMutation::Update(m) => m,
            AnyMutation::Delete(m) => m,
        }
    }
}

impl BuildMutation for AnyMutation {
    fn kind(&self) -> MutationKind {
        self.inner().kind()
    }

    fn entity(&self) -> &str {
        self.inner().entity()
    }

    fn build(&self) -> MutationResult<RenderedMutation> {
        self.inner().build()
    }
}

impl From<InsertMutation> for AnyMutation {
    fn from(m: InsertMutation) -> Self {
        AnyMutation::Insert(m)
    }
}

impl From<UpdateMutation> for AnyMutation {
    fn from(m: UpdateMutation) -> Self {
        AnyMutation::Update(m)
    }
}

impl From<DeleteMutation> for AnyMutation {
    fn from(m: DeleteMutation) -> Self {
        AnyMutation::Delete(m)
    }
}

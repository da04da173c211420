//! The database seam.

use crate::cancel::Cancellation;
use crate::error::ExecutorError;
use cham_core::Row;

/// Runs SQL text against a database and returns the fetched rows.
///
/// Implementations should observe `cancel` while a statement is in flight
/// and return `ExecutorError::Cancelled` when it fires.
pub trait SqlExecutor {
    fn fetch(&mut self, sql: &str, cancel: &Cancellation) -> Result<Vec<Row>, ExecutorError>;
}

impl<E: SqlExecutor + ?Sized> SqlExecutor for &mut E {
    fn fetch(&mut self, sql: &str, cancel: &Cancellation) -> Result<Vec<Row>, ExecutorError> {
        (**self).fetch(sql, cancel)
    }
}

impl<E: SqlExecutor + ?Sized> SqlExecutor for Box<E> {
    fn fetch(&mut self, sql: &str, cancel: &Cancellation) -> Result<Vec<Row>, ExecutorError> {
        (**self).fetch(sql, cancel)
    }
}

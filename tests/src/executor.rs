//! Scripted SQL executor.

use std::collections::VecDeque;

use cham_core::Row;
use cham_query::{Cancellation, ExecutorError, SqlExecutor};

/// Answers each fetch with the next scripted response and records the SQL.
///
/// Once the script runs out every fetch returns no rows.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    responses: VecDeque<Result<Vec<Row>, ExecutorError>>,
    statements: Vec<String>,
    cancel_on: Option<(usize, Cancellation)>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    pub fn returns(mut self, rows: Vec<Row>) -> Self {
        self.responses.push_back(Ok(rows));
        self
    }

    /// Queue a failure.
    pub fn fails(mut self, err: ExecutorError) -> Self {
        self.responses.push_back(Err(err));
        self
    }

    /// Cancel `token` while serving fetch number `fetch` (1-based).
    pub fn cancel_during(mut self, fetch: usize, token: Cancellation) -> Self {
        self.cancel_on = Some((fetch, token));
        self
    }

    /// Every statement received, in order.
    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    pub fn round_trips(&self) -> usize {
        self.statements.len()
    }
}

impl SqlExecutor for ScriptedExecutor {
    fn fetch(&mut self, sql: &str, _cancel: &Cancellation) -> Result<Vec<Row>, ExecutorError> {
        self.statements.push(sql.to_string());

        if let Some((fetch, token)) = &self.cancel_on {
            if *fetch == self.statements.len() {
                token.cancel();
            }
        }

        self.responses.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}

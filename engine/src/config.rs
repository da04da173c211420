//! Engine configuration.

use cham_mutation::ValidatorConfig;
use serde::{Deserialize, Serialize};

/// Environment variable read by [`EngineConfig::from_env`].
pub const DEBUG_ENV: &str = "CHAMELEON_DEBUG";

/// How much the engine echoes about the SQL it runs.
///
/// Levels are ordered; each includes everything below it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugLevel {
    #[default]
    None,
    /// Echo generated SQL.
    Sql,
    /// Also echo per-round-trip timings.
    Trace,
    /// Also echo compiled plans.
    Explain,
}

impl DebugLevel {
    /// Parse a `CHAMELEON_DEBUG` value. Anything unrecognised is `None`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "sql" => DebugLevel::Sql,
            "trace" => DebugLevel::Trace,
            "explain" => DebugLevel::Explain,
            _ => DebugLevel::None,
        }
    }

    pub fn includes(&self, level: DebugLevel) -> bool {
        level != DebugLevel::None && *self >= level
    }
}

/// Engine settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub debug: DebugLevel,
    pub validator: ValidatorConfig,
}

impl EngineConfig {
    /// Defaults, with the debug level taken from `CHAMELEON_DEBUG`.
    pub fn from_env() -> Self {
        let debug = std::env::var(DEBUG_ENV)
            .map(|v| DebugLevel::parse(&v))
            .unwrap_or_default();
        Self {
            debug,
            ..Self::default()
        }
    }

    pub fn with_debug(mut self, debug: DebugLevel) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_validator(mut self, validator: ValidatorConfig) -> Self {
        self.validator = validator;
        self
    }
}

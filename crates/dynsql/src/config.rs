//! Process-wide defaults and per-statement rendering configuration.

use crate::error::ConfigError;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{path::Path, sync::RwLock};
use tracing::{info, warn};

pub const NON_RENDERING_WHERE_CLAUSE_ENV: &str = "DYNSQL_NON_RENDERING_WHERE_CLAUSE_ALLOWED";

lazy_static! {
    static ref GLOBAL_CONFIGURATION: RwLock<GlobalConfiguration> =
        RwLock::new(GlobalConfiguration::from_lookup_or_default(|name| std::env::var(name).ok()));
}

/// Defaults applied to every newly built statement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GlobalConfiguration {
    /// When false, a where/having clause whose every criterion is suppressed
    /// fails the render instead of silently disappearing.
    pub non_rendering_where_clause_allowed: bool,
}

impl Default for GlobalConfiguration {
    fn default() -> Self {
        Self {
            non_rendering_where_clause_allowed: true,
        }
    }
}

impl GlobalConfiguration {
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json(&source)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(NON_RENDERING_WHERE_CLAUSE_ENV) {
            config.non_rendering_where_clause_allowed =
                parse_flag(NON_RENDERING_WHERE_CLAUSE_ENV, &raw)?;
        }
        Ok(config)
    }

    /// Like [`from_lookup`](Self::from_lookup), but a malformed variable is
    /// logged and replaced by the defaults.
    pub fn from_lookup_or_default<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup(lookup).unwrap_or_else(|err| {
            warn!("Ignoring environment configuration, using defaults: {err}");
            Self::default()
        })
    }

    /// Snapshot of the process-wide configuration.
    pub fn current() -> GlobalConfiguration {
        match GLOBAL_CONFIGURATION.read() {
            Ok(config) => config.clone(),
            Err(poisoned) => {
                warn!("Global configuration lock is poisoned; reading the last installed value");
                poisoned.into_inner().clone()
            }
        }
    }

    /// Replaces the process-wide configuration. Statements already built keep
    /// the values they were created with.
    pub fn install(self) {
        info!(
            "Installing global configuration: non_rendering_where_clause_allowed={}",
            self.non_rendering_where_clause_allowed
        );
        match GLOBAL_CONFIGURATION.write() {
            Ok(mut global) => *global = self,
            Err(poisoned) => {
                warn!("Global configuration lock is poisoned; replacing the value anyway");
                *poisoned.into_inner() = self;
            }
        }
    }
}

fn parse_flag(name: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name: name.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Per-statement settings: the non-rendering where policy and the free-text
/// fragments spliced verbatim into the rendered statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementConfiguration {
    non_rendering_where_clause_allowed: bool,
    sql_before_statement: Option<String>,
    sql_after_keyword: Option<String>,
    sql_after_table: Option<String>,
    sql_after_statement: Option<String>,
}

impl Default for StatementConfiguration {
    fn default() -> Self {
        Self::from_global(&GlobalConfiguration::current())
    }
}

impl StatementConfiguration {
    pub fn from_global(global: &GlobalConfiguration) -> Self {
        Self {
            non_rendering_where_clause_allowed: global.non_rendering_where_clause_allowed,
            sql_before_statement: None,
            sql_after_keyword: None,
            sql_after_table: None,
            sql_after_statement: None,
        }
    }

    pub fn non_rendering_where_clause_allowed(mut self, allowed: bool) -> Self {
        self.non_rendering_where_clause_allowed = allowed;
        self
    }

    pub fn with_sql_before_statement(mut self, sql: impl Into<String>) -> Self {
        self.sql_before_statement = Some(sql.into());
        self
    }

    pub fn with_sql_after_keyword(mut self, sql: impl Into<String>) -> Self {
        self.sql_after_keyword = Some(sql.into());
        self
    }

    pub fn with_sql_after_table(mut self, sql: impl Into<String>) -> Self {
        self.sql_after_table = Some(sql.into());
        self
    }

    pub fn with_sql_after_statement(mut self, sql: impl Into<String>) -> Self {
        self.sql_after_statement = Some(sql.into());
        self
    }

    pub fn is_non_rendering_where_clause_allowed(&self) -> bool {
        self.non_rendering_where_clause_allowed
    }

    pub fn sql_before_statement(&self) -> Option<&str> {
        self.sql_before_statement.as_deref()
    }

    pub fn sql_after_keyword(&self) -> Option<&str> {
        self.sql_after_keyword.as_deref()
    }

    pub fn sql_after_table(&self) -> Option<&str> {
        self.sql_after_table.as_deref()
    }

    pub fn sql_after_statement(&self) -> Option<&str> {
        self.sql_after_statement.as_deref()
    }
}

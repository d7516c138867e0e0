//! Defines the `RenderingStrategy` trait for placeholder and parameter-key syntax.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::{
    ast::column::SqlColumn,
    error::{DynSqlError, Result},
    renderer::ParameterSequence,
};

/// Prefix of parameter placeholders when no parameter name is set.
pub const DEFAULT_PARAMETER_PREFIX: &str = "parameters";

/// Prefix of record-based insert placeholders.
pub const DEFAULT_RECORD_PREFIX: &str = "row";

/// Prefix of multi-row insert placeholders, formatted with the row index.
pub const MULTI_ROW_PREFIX: &str = "records";

pub trait RenderingStrategy: Send + Sync {
    /// Registry name, e.g. `mybatis3` or `jdbc`.
    fn name(&self) -> &'static str;

    /// Draws the next number from `sequence` and formats it as a map key.
    ///
    /// - MyBatis and Spring use `p1`, `p2`, etc.
    /// - Raw JDBC uses `1`, `2`, etc.
    /// - R2DBC uses `$1`, `$2`, etc.
    fn next_parameter_key(&self, sequence: &ParameterSequence) -> String {
        format!("p{}", sequence.next())
    }

    /// Formats the placeholder for `parameter_name`. `column` is set when the
    /// value is bound against a column, and may contribute type information.
    fn placeholder_for(
        &self,
        column: Option<&SqlColumn>,
        prefix: &str,
        parameter_name: &str,
    ) -> String;

    /// Placeholder binding one property of one record in a multi-row insert.
    fn multi_row_placeholder(
        &self,
        column: &SqlColumn,
        prefix: &str,
        parameter_name: &str,
    ) -> Result<String> {
        Ok(self.placeholder_for(Some(column), prefix, parameter_name))
    }

    fn supports_record_binding(&self) -> bool {
        true
    }

    /// Placeholder binding one property of a single record insert.
    fn record_based_insert_binding(
        &self,
        column: &SqlColumn,
        prefix: &str,
        parameter_name: &str,
    ) -> Result<String> {
        if !self.supports_record_binding() {
            return Err(DynSqlError::unsupported_by_strategy(
                self.name(),
                "Record based insert binding",
            ));
        }
        Ok(self.placeholder_for(Some(column), prefix, parameter_name))
    }
}

/// `#{parameters.p1,jdbcType=VARCHAR}` placeholders for MyBatis mappers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MyBatis3RenderingStrategy;

impl RenderingStrategy for MyBatis3RenderingStrategy {
    fn name(&self) -> &'static str {
        "mybatis3"
    }

    fn placeholder_for(
        &self,
        column: Option<&SqlColumn>,
        prefix: &str,
        parameter_name: &str,
    ) -> String {
        let mut placeholder = format!("#{{{prefix}.{parameter_name}");
        if let Some(column) = column {
            if let Some(jdbc_type) = column.jdbc_type() {
                placeholder.push_str(",jdbcType=");
                placeholder.push_str(jdbc_type.jdbc_name());
            }
            if let Some(type_handler) = column.type_handler() {
                placeholder.push_str(",typeHandler=");
                placeholder.push_str(type_handler);
            }
        }
        placeholder.push('}');
        placeholder
    }
}

/// `:p1` placeholders for Spring's named parameter templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpringNamedParameterRenderingStrategy;

impl RenderingStrategy for SpringNamedParameterRenderingStrategy {
    fn name(&self) -> &'static str {
        "spring_named_parameter"
    }

    fn placeholder_for(
        &self,
        _column: Option<&SqlColumn>,
        _prefix: &str,
        parameter_name: &str,
    ) -> String {
        format!(":{parameter_name}")
    }

    fn multi_row_placeholder(
        &self,
        _column: &SqlColumn,
        prefix: &str,
        parameter_name: &str,
    ) -> Result<String> {
        Ok(format!(":{prefix}.{parameter_name}"))
    }
}

/// Positional `?` placeholders; keys are the 1-based positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawJdbcRenderingStrategy;

impl RenderingStrategy for RawJdbcRenderingStrategy {
    fn name(&self) -> &'static str {
        "jdbc"
    }

    fn next_parameter_key(&self, sequence: &ParameterSequence) -> String {
        sequence.next().to_string()
    }

    fn placeholder_for(
        &self,
        _column: Option<&SqlColumn>,
        _prefix: &str,
        _parameter_name: &str,
    ) -> String {
        "?".into()
    }

    fn multi_row_placeholder(
        &self,
        _column: &SqlColumn,
        _prefix: &str,
        _parameter_name: &str,
    ) -> Result<String> {
        Err(DynSqlError::unsupported_by_strategy(
            self.name(),
            "Multi-row record binding",
        ))
    }

    fn supports_record_binding(&self) -> bool {
        false
    }
}

/// Indexed `$1` placeholders; the key is the placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct R2dbcRenderingStrategy;

impl RenderingStrategy for R2dbcRenderingStrategy {
    fn name(&self) -> &'static str {
        "r2dbc"
    }

    fn next_parameter_key(&self, sequence: &ParameterSequence) -> String {
        format!("${}", sequence.next())
    }

    fn placeholder_for(
        &self,
        _column: Option<&SqlColumn>,
        _prefix: &str,
        parameter_name: &str,
    ) -> String {
        parameter_name.to_string()
    }

    fn multi_row_placeholder(
        &self,
        _column: &SqlColumn,
        _prefix: &str,
        _parameter_name: &str,
    ) -> Result<String> {
        Err(DynSqlError::unsupported_by_strategy(
            self.name(),
            "Multi-row record binding",
        ))
    }

    fn supports_record_binding(&self) -> bool {
        false
    }
}

static MYBATIS3: MyBatis3RenderingStrategy = MyBatis3RenderingStrategy;
static SPRING_NAMED_PARAMETER: SpringNamedParameterRenderingStrategy =
    SpringNamedParameterRenderingStrategy;
static RAW_JDBC: RawJdbcRenderingStrategy = RawJdbcRenderingStrategy;
static R2DBC: R2dbcRenderingStrategy = R2dbcRenderingStrategy;

lazy_static! {
    static ref STRATEGY_MAP: HashMap<&'static str, &'static dyn RenderingStrategy> =
        build_strategy_map();
}

fn build_strategy_map() -> HashMap<&'static str, &'static dyn RenderingStrategy> {
    let strategies: [&'static dyn RenderingStrategy; 4] =
        [&MYBATIS3, &SPRING_NAMED_PARAMETER, &RAW_JDBC, &R2DBC];
    strategies.into_iter().map(|s| (s.name(), s)).collect()
}

/// Access to the built-in strategies.
pub struct RenderingStrategies;

impl RenderingStrategies {
    pub fn mybatis3() -> &'static dyn RenderingStrategy {
        &MYBATIS3
    }

    pub fn spring_named_parameter() -> &'static dyn RenderingStrategy {
        &SPRING_NAMED_PARAMETER
    }

    pub fn raw_jdbc() -> &'static dyn RenderingStrategy {
        &RAW_JDBC
    }

    pub fn r2dbc() -> &'static dyn RenderingStrategy {
        &R2DBC
    }

    pub fn by_name(name: &str) -> Option<&'static dyn RenderingStrategy> {
        STRATEGY_MAP.get(name.to_lowercase().as_str()).copied()
    }

    /// Registered names, sorted.
    pub fn names() -> Vec<&'static str> {
        let mut names: Vec<_> = STRATEGY_MAP.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

//! Defines the core rendering traits and the per-render context.

use std::{cell::Cell, rc::Rc};

use model::core::value::Value;

use crate::{
    ast::{column::SqlColumn, table::SqlTable},
    error::Result,
    renderer::{
        alias::{ExplicitTableAliasCalculator, TableAliasCalculator},
        fragment::{FragmentAndParameters, ParameterBinding, ParameterBindings},
        strategy::{DEFAULT_PARAMETER_PREFIX, RenderingStrategy},
    },
};

pub mod alias;
pub mod column;
pub mod composer;
pub mod condition;
pub mod criterion;
pub mod delete;
pub mod fragment;
pub mod insert;
pub mod select;
pub mod strategy;
pub mod update;

/// A trait for any model node that renders to a fragment within a context.
pub trait Render {
    fn render(&self, ctx: &RenderingContext<'_>) -> Result<FragmentAndParameters>;
}

/// A complete statement that renders to SQL text and its parameters.
pub trait SqlStatement {
    fn render(&self, strategy: &dyn RenderingStrategy) -> Result<RenderedStatement>;
}

/// Renders `statement` with `strategy`.
pub fn render<S: SqlStatement + ?Sized>(
    statement: &S,
    strategy: &dyn RenderingStrategy,
) -> Result<RenderedStatement> {
    statement.render(strategy)
}

/// Source of parameter numbers for one render call. Starts at 1.
///
/// Every nested render borrows the same instance so numbering stays
/// strictly increasing across the whole statement.
#[derive(Debug)]
pub struct ParameterSequence {
    next: Cell<usize>,
}

impl ParameterSequence {
    pub fn new() -> Self {
        Self { next: Cell::new(1) }
    }

    pub fn next(&self) -> usize {
        let current = self.next.get();
        self.next.set(current + 1);
        current
    }
}

impl Default for ParameterSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// A map key and the placeholder text that refers to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedParameterInfo {
    map_key: String,
    placeholder: String,
}

impl RenderedParameterInfo {
    pub fn map_key(&self) -> &str {
        &self.map_key
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn to_binding(&self, value: Value) -> ParameterBinding {
        ParameterBinding::new(self.map_key.clone(), value)
    }
}

/// State threaded through one render call.
///
/// Created fresh for each top-level render and never shared between renders;
/// the borrowed sequence and `Rc` calculator keep it on one thread.
pub struct RenderingContext<'a> {
    sequence: &'a ParameterSequence,
    strategy: &'a dyn RenderingStrategy,
    alias_calculator: Rc<dyn TableAliasCalculator>,
    parameter_name: Option<String>,
    calculated_parameter_name: String,
}

impl<'a> RenderingContext<'a> {
    pub fn new(sequence: &'a ParameterSequence, strategy: &'a dyn RenderingStrategy) -> Self {
        Self {
            sequence,
            strategy,
            alias_calculator: Rc::new(ExplicitTableAliasCalculator::empty()),
            parameter_name: None,
            calculated_parameter_name: DEFAULT_PARAMETER_PREFIX.to_string(),
        }
    }

    /// Scopes placeholders under `name`, e.g. `#{name.parameters.p1}`.
    pub fn with_parameter_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.calculated_parameter_name = format!("{name}.{DEFAULT_PARAMETER_PREFIX}");
        self.parameter_name = Some(name);
        self
    }

    /// A context sharing this one's sequence and strategy with a different
    /// alias calculator.
    pub fn with_table_alias_calculator(
        &self,
        alias_calculator: Rc<dyn TableAliasCalculator>,
    ) -> RenderingContext<'a> {
        RenderingContext {
            sequence: self.sequence,
            strategy: self.strategy,
            alias_calculator,
            parameter_name: self.parameter_name.clone(),
            calculated_parameter_name: self.calculated_parameter_name.clone(),
        }
    }

    pub fn table_alias_calculator(&self) -> Rc<dyn TableAliasCalculator> {
        Rc::clone(&self.alias_calculator)
    }

    pub fn strategy(&self) -> &'a dyn RenderingStrategy {
        self.strategy
    }

    pub fn parameter_name(&self) -> Option<&str> {
        self.parameter_name.as_deref()
    }

    /// Allocates the next parameter. A column's own strategy, when set,
    /// formats the placeholder; the key always comes from the active strategy.
    pub fn calculate_parameter_info(&self, column: Option<&SqlColumn>) -> RenderedParameterInfo {
        let map_key = self.strategy.next_parameter_key(self.sequence);
        let strategy: &dyn RenderingStrategy = match column.and_then(SqlColumn::rendering_strategy) {
            Some(own) => own.as_ref(),
            None => self.strategy,
        };
        let placeholder =
            strategy.placeholder_for(column, &self.calculated_parameter_name, &map_key);
        RenderedParameterInfo {
            map_key,
            placeholder,
        }
    }

    /// Allocates a parameter for `value` and returns its placeholder fragment.
    pub fn bind(&self, value: Value, column: Option<&SqlColumn>) -> FragmentAndParameters {
        let info = self.calculate_parameter_info(column);
        let jdbc_type = column.and_then(SqlColumn::jdbc_type);
        FragmentAndParameters::from_fragment(info.placeholder.clone())
            .with_parameter(info.to_binding(value).with_jdbc_type(jdbc_type))
    }

    pub fn aliased_column_name(&self, column: &SqlColumn) -> String {
        match self.alias_calculator.alias_for_column(column.table()) {
            Some(alias) => format!("{alias}.{}", column.name()),
            None => column.name().to_string(),
        }
    }

    pub fn aliased_table_name(&self, table: &SqlTable) -> String {
        match self.alias_calculator.alias_for_table(table) {
            Some(alias) => format!("{} {alias}", table.table_name()),
            None => table.table_name(),
        }
    }
}

/// The rendered SQL and its parameters in textual order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedStatement {
    sql: String,
    parameters: ParameterBindings,
}

impl RenderedStatement {
    pub(crate) fn from_fragment(fragment: FragmentAndParameters) -> Self {
        let (sql, parameters) = fragment.into_parts();
        Self { sql, parameters }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn parameters(&self) -> &ParameterBindings {
        &self.parameters
    }

    pub fn parameter_bindings(&self) -> &[ParameterBinding] {
        self.parameters.bindings()
    }

    pub fn into_parts(self) -> (String, ParameterBindings) {
        (self.sql, self.parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::strategy::RenderingStrategies;
    use model::core::jdbc_type::JdbcType;
    use std::sync::Arc;

    #[test]
    fn sequence_starts_at_one_and_increments() {
        let seq = ParameterSequence::new();
        assert_eq!(seq.next(), 1);
        assert_eq!(seq.next(), 2);
    }

    #[test]
    fn derived_contexts_share_the_sequence() {
        let seq = ParameterSequence::new();
        let ctx = RenderingContext::new(&seq, RenderingStrategies::mybatis3());
        let child = ctx.with_table_alias_calculator(Rc::new(ExplicitTableAliasCalculator::empty()));
        assert_eq!(ctx.calculate_parameter_info(None).map_key(), "p1");
        assert_eq!(child.calculate_parameter_info(None).map_key(), "p2");
        assert_eq!(ctx.calculate_parameter_info(None).map_key(), "p3");
    }

    #[test]
    fn parameter_name_scopes_placeholders() {
        let seq = ParameterSequence::new();
        let ctx =
            RenderingContext::new(&seq, RenderingStrategies::mybatis3()).with_parameter_name("record");
        assert_eq!(
            ctx.calculate_parameter_info(None).placeholder(),
            "#{record.parameters.p1}"
        );
    }

    #[test]
    fn column_strategy_overrides_placeholder_only() {
        let seq = ParameterSequence::new();
        let ctx = RenderingContext::new(&seq, RenderingStrategies::mybatis3());
        let column = SqlTable::new("Person")
            .typed_column("id", JdbcType::Integer)
            .with_rendering_strategy(Arc::new(strategy::SpringNamedParameterRenderingStrategy));
        let bound = ctx.bind(Value::Int(4), Some(&column));
        assert_eq!(bound.fragment(), ":p1");
        let binding = &bound.parameters().bindings()[0];
        assert_eq!(binding.map_key(), "p1");
        assert_eq!(binding.jdbc_type(), Some(JdbcType::Integer));
    }
}

use std::{fmt, sync::Arc};

use model::core::{jdbc_type::JdbcType, value::Value};

use crate::{
    ast::table::SqlTable,
    error::{DynSqlError, Result},
    renderer::strategy::RenderingStrategy,
};

/// Converts a bound value before it is handed to the driver.
pub type ValueConverter = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// A column of a [`SqlTable`].
///
/// Immutable: every `with_*` method returns a new column sharing the table.
#[derive(Clone)]
pub struct SqlColumn {
    inner: Arc<ColumnInner>,
}

#[derive(Clone)]
struct ColumnInner {
    table: SqlTable,
    name: String,
    jdbc_type: Option<JdbcType>,
    type_handler: Option<String>,
    converter: Option<ValueConverter>,
    alias: Option<String>,
    descending: bool,
    rendering_strategy: Option<Arc<dyn RenderingStrategy>>,
}

impl SqlColumn {
    pub fn new(table: SqlTable, name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ColumnInner {
                table,
                name: name.into(),
                jdbc_type: None,
                type_handler: None,
                converter: None,
                alias: None,
                descending: false,
                rendering_strategy: None,
            }),
        }
    }

    fn modify(&self, f: impl FnOnce(&mut ColumnInner)) -> SqlColumn {
        let mut inner = (*self.inner).clone();
        f(&mut inner);
        SqlColumn {
            inner: Arc::new(inner),
        }
    }

    pub fn with_jdbc_type(&self, jdbc_type: JdbcType) -> SqlColumn {
        self.modify(|c| c.jdbc_type = Some(jdbc_type))
    }

    pub fn with_type_handler(&self, type_handler: impl Into<String>) -> SqlColumn {
        let type_handler = type_handler.into();
        self.modify(|c| c.type_handler = Some(type_handler))
    }

    pub fn with_converter<F>(&self, converter: F) -> SqlColumn
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.modify(|c| c.converter = Some(Arc::new(converter)))
    }

    /// Overrides the strategy used for this column's placeholders only.
    pub fn with_rendering_strategy(&self, strategy: Arc<dyn RenderingStrategy>) -> SqlColumn {
        self.modify(|c| c.rendering_strategy = Some(strategy))
    }

    pub fn as_alias(&self, alias: impl Into<String>) -> SqlColumn {
        let alias = alias.into();
        self.modify(|c| c.alias = Some(alias))
    }

    pub fn descending(&self) -> SqlColumn {
        self.modify(|c| c.descending = true)
    }

    pub fn table(&self) -> &SqlTable {
        &self.inner.table
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn alias(&self) -> Option<&str> {
        self.inner.alias.as_deref()
    }

    pub fn jdbc_type(&self) -> Option<JdbcType> {
        self.inner.jdbc_type
    }

    pub fn type_handler(&self) -> Option<&str> {
        self.inner.type_handler.as_deref()
    }

    pub fn is_descending(&self) -> bool {
        self.inner.descending
    }

    pub fn rendering_strategy(&self) -> Option<&Arc<dyn RenderingStrategy>> {
        self.inner.rendering_strategy.as_ref()
    }

    pub fn convert(&self, value: &Value) -> Value {
        match &self.inner.converter {
            Some(converter) => converter(value),
            None => value.clone(),
        }
    }

    /// The name used when sorting: the alias if set, else the bare name.
    pub fn order_by_name(&self) -> &str {
        self.alias().unwrap_or(self.name())
    }
}

impl fmt::Debug for SqlColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlColumn")
            .field("table", &self.inner.table)
            .field("name", &self.inner.name)
            .field("jdbc_type", &self.inner.jdbc_type)
            .field("alias", &self.inner.alias)
            .field("descending", &self.inner.descending)
            .finish_non_exhaustive()
    }
}

/// Single-argument SQL functions and aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Count,
    CountDistinct,
    Max,
    Min,
    Avg,
    Sum,
    Upper,
    Lower,
}

impl Function {
    pub(crate) fn wrap(&self, argument: &str) -> String {
        match self {
            Function::Count => format!("count({argument})"),
            Function::CountDistinct => format!("count(distinct {argument})"),
            Function::Max => format!("max({argument})"),
            Function::Min => format!("min({argument})"),
            Function::Avg => format!("avg({argument})"),
            Function::Sum => format!("sum({argument})"),
            Function::Upper => format!("upper({argument})"),
            Function::Lower => format!("lower({argument})"),
        }
    }

    /// Whether the result keeps the argument's type and conversion.
    fn preserves_type(&self) -> bool {
        matches!(
            self,
            Function::Max | Function::Min | Function::Upper | Function::Lower
        )
    }
}

/// Anything that can appear in a select list or on the left side of a
/// criterion.
#[derive(Debug, Clone)]
pub enum BasicColumn {
    Column(SqlColumn),
    Function(Function, Box<BasicColumn>),
    CountAll,
    /// Rendered verbatim.
    Constant(String),
    /// Rendered single-quoted.
    StringConstant(String),
    /// Rendered as a placeholder with a parameter binding.
    Bound(Value),
    Aliased(Box<BasicColumn>, String),
}

impl BasicColumn {
    /// Attaches a select-list alias.
    ///
    /// Bound values and already-aliased derived values cannot be aliased.
    pub fn alias(self, alias: impl Into<String>) -> Result<BasicColumn> {
        match self {
            BasicColumn::Column(column) => Ok(BasicColumn::Column(column.as_alias(alias))),
            BasicColumn::Bound(_) => Err(DynSqlError::UnsupportedOperation {
                subject: "a bound value".to_string(),
                operation: "Aliasing",
            }),
            BasicColumn::Aliased(_, existing) => Err(DynSqlError::UnsupportedOperation {
                subject: format!("a derived value already aliased \"{existing}\""),
                operation: "Re-aliasing",
            }),
            other => Ok(BasicColumn::Aliased(Box::new(other), alias.into())),
        }
    }

    /// The table column whose type, converter and strategy govern parameters
    /// bound against this expression.
    pub fn bindable(&self) -> Option<&SqlColumn> {
        match self {
            BasicColumn::Column(column) => Some(column),
            BasicColumn::Function(function, argument) if function.preserves_type() => {
                argument.bindable()
            }
            BasicColumn::Aliased(inner, _) => inner.bindable(),
            _ => None,
        }
    }

    pub fn select_alias(&self) -> Option<&str> {
        match self {
            BasicColumn::Column(column) => column.alias(),
            BasicColumn::Aliased(_, alias) => Some(alias),
            _ => None,
        }
    }
}

impl From<SqlColumn> for BasicColumn {
    fn from(column: SqlColumn) -> Self {
        BasicColumn::Column(column)
    }
}

impl From<&SqlColumn> for BasicColumn {
    fn from(column: &SqlColumn) -> Self {
        BasicColumn::Column(column.clone())
    }
}

/// One entry of an order by list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpecification {
    name: String,
    descending: bool,
}

impl SortSpecification {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descending: false,
        }
    }

    /// Sorts by `qualifier.column`, for columns that are ambiguous in a join.
    pub fn qualified(qualifier: &str, column: &SqlColumn) -> Self {
        Self {
            name: format!("{qualifier}.{}", column.name()),
            descending: column.is_descending(),
        }
    }

    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }

    pub(crate) fn render(&self) -> String {
        if self.descending {
            format!("{} DESC", self.name)
        } else {
            self.name.clone()
        }
    }
}

impl From<&SqlColumn> for SortSpecification {
    fn from(column: &SqlColumn) -> Self {
        Self {
            name: column.order_by_name().to_string(),
            descending: column.is_descending(),
        }
    }
}

impl From<SqlColumn> for SortSpecification {
    fn from(column: SqlColumn) -> Self {
        SortSpecification::from(&column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn with_methods_leave_original_untouched() {
        let person = SqlTable::new("Person");
        let id = person.column("id");
        let typed = id.with_jdbc_type(JdbcType::Integer).as_alias("A_ID");
        assert_eq!(id.jdbc_type(), None);
        assert_eq!(id.alias(), None);
        assert_eq!(typed.jdbc_type(), Some(JdbcType::Integer));
        assert_eq!(typed.alias(), Some("A_ID"));
        assert!(typed.table().same(&person));
    }

    #[test]
    fn converter_applies_to_values() {
        let person = SqlTable::new("Person");
        let flag = person
            .column("active")
            .with_converter(|v| Value::from(if v == &Value::Boolean(true) { "Y" } else { "N" }));
        assert_eq!(flag.convert(&Value::Boolean(true)), Value::from("Y"));
        assert_eq!(person.column("id").convert(&Value::Int(3)), Value::Int(3));
    }

    #[test]
    fn bound_values_cannot_be_aliased() {
        let err = BasicColumn::Bound(Value::Int(1)).alias("x").unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnsupportedOperation);
    }

    #[test]
    fn derived_values_alias_once() {
        let person = SqlTable::new("Person");
        let max = BasicColumn::Function(Function::Max, Box::new(person.column("id").into()));
        let aliased = max.alias("max_id").unwrap();
        assert_eq!(aliased.select_alias(), Some("max_id"));
        let err = aliased.alias("other").unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnsupportedOperation);
    }

    #[test]
    fn sort_specification_prefers_alias() {
        let person = SqlTable::new("Person");
        let spec = SortSpecification::from(person.column("first_name").as_alias("fn").descending());
        assert_eq!(spec.render(), "fn DESC");
        assert_eq!(SortSpecification::named("id").render(), "id");
    }
}

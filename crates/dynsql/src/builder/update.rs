//! Provides a fluent builder for `UpdateModel`s.

use model::core::value::Value;

use crate::{
    ast::{
        column::{BasicColumn, SortSpecification, SqlColumn},
        condition::Condition,
        criterion::{AndOrCriteriaGroup, Connector, SqlCriterion},
        select::{OrderByModel, SelectModel},
        table::SqlTable,
        update::{UpdateMapping, UpdateModel},
    },
    builder::criterion::{CriteriaDraft, criterion},
    config::StatementConfiguration,
    error::{DynSqlError, Result},
};

#[derive(Debug, Clone)]
pub struct UpdateBuilder {
    table: SqlTable,
    table_alias: Option<String>,
    mappings: Vec<UpdateMapping>,
    where_draft: CriteriaDraft,
    order_by: Vec<SortSpecification>,
    limit: Option<u64>,
    configuration: StatementConfiguration,
}

/// Starts `update table`.
pub fn update(table: &SqlTable) -> UpdateBuilder {
    UpdateBuilder {
        table: table.clone(),
        table_alias: None,
        mappings: Vec::new(),
        where_draft: CriteriaDraft::default(),
        order_by: Vec::new(),
        limit: None,
        configuration: StatementConfiguration::default(),
    }
}

/// Starts `update table alias`.
pub fn update_aliased(table: &SqlTable, alias: &str) -> UpdateBuilder {
    let mut builder = update(table);
    builder.table_alias = Some(alias.to_string());
    builder
}

impl UpdateBuilder {
    fn mapping(mut self, mapping: UpdateMapping) -> Self {
        self.mappings.push(mapping);
        self
    }

    /// `column = <value>`, bound as a parameter.
    pub fn set(self, column: &SqlColumn, value: impl Into<Value>) -> Self {
        self.mapping(UpdateMapping::Value(column.clone(), value.into()))
    }

    /// Like [`set`](Self::set), but skipped entirely when `value` is `None`.
    pub fn set_when_present<V: Into<Value>>(self, column: &SqlColumn, value: Option<V>) -> Self {
        self.mapping(UpdateMapping::ValueWhenPresent(
            column.clone(),
            value.map(Into::into),
        ))
    }

    pub fn set_null(self, column: &SqlColumn) -> Self {
        self.mapping(UpdateMapping::Null(column.clone()))
    }

    pub fn set_constant(self, column: &SqlColumn, constant: impl Into<String>) -> Self {
        self.mapping(UpdateMapping::Constant(column.clone(), constant.into()))
    }

    pub fn set_string_constant(self, column: &SqlColumn, constant: impl Into<String>) -> Self {
        self.mapping(UpdateMapping::StringConstant(column.clone(), constant.into()))
    }

    pub fn set_column(self, column: &SqlColumn, other: impl Into<BasicColumn>) -> Self {
        self.mapping(UpdateMapping::Column(column.clone(), other.into()))
    }

    /// `column = (select ...)`.
    pub fn set_select(self, column: &SqlColumn, select: SelectModel) -> Self {
        self.mapping(UpdateMapping::Select(column.clone(), Box::new(select)))
    }

    pub fn where_clause(self, column: impl Into<BasicColumn>, condition: Condition) -> Self {
        self.where_criterion(criterion(column, condition))
    }

    pub fn where_criterion(mut self, criterion: SqlCriterion) -> Self {
        self.where_draft.initial(criterion);
        self
    }

    pub fn and(mut self, column: impl Into<BasicColumn>, condition: Condition) -> Self {
        self.where_draft
            .push(AndOrCriteriaGroup::leaf(Connector::And, column, condition));
        self
    }

    pub fn or(mut self, column: impl Into<BasicColumn>, condition: Condition) -> Self {
        self.where_draft
            .push(AndOrCriteriaGroup::leaf(Connector::Or, column, condition));
        self
    }

    pub fn and_criterion(mut self, criterion: SqlCriterion) -> Self {
        self.where_draft
            .push(AndOrCriteriaGroup::new(Connector::And, criterion));
        self
    }

    pub fn or_criterion(mut self, criterion: SqlCriterion) -> Self {
        self.where_draft
            .push(AndOrCriteriaGroup::new(Connector::Or, criterion));
        self
    }

    pub fn order_by<S, I>(mut self, columns: I) -> Self
    where
        S: Into<SortSpecification>,
        I: IntoIterator<Item = S>,
    {
        self.order_by.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn configuration(mut self, configuration: StatementConfiguration) -> Self {
        self.configuration = configuration;
        self
    }

    pub fn non_rendering_where_clause_allowed(mut self, allowed: bool) -> Self {
        self.configuration = self.configuration.non_rendering_where_clause_allowed(allowed);
        self
    }

    /// Fails when no set mapping was added.
    pub fn build(self) -> Result<UpdateModel> {
        if self.mappings.is_empty() {
            return Err(DynSqlError::MissingRequiredField {
                statement: "Update",
                field: "at least one set mapping",
            });
        }
        let allowed = self.configuration.is_non_rendering_where_clause_allowed();
        Ok(UpdateModel {
            table: self.table,
            table_alias: self.table_alias,
            mappings: self.mappings,
            where_model: self.where_draft.build(allowed),
            order_by: (!self.order_by.is_empty())
                .then(|| OrderByModel::new(self.order_by))
                .transpose()?,
            limit: self.limit,
            configuration: self.configuration,
        })
    }
}

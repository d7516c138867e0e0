//! Provides a fluent builder for `DeleteModel`s.

use crate::{
    ast::{
        column::{BasicColumn, SortSpecification},
        condition::Condition,
        criterion::{AndOrCriteriaGroup, Connector, SqlCriterion},
        delete::DeleteModel,
        select::OrderByModel,
        table::SqlTable,
    },
    builder::criterion::{CriteriaDraft, criterion},
    config::StatementConfiguration,
    error::Result,
};

#[derive(Debug, Clone)]
pub struct DeleteBuilder {
    table: SqlTable,
    table_alias: Option<String>,
    where_draft: CriteriaDraft,
    order_by: Vec<SortSpecification>,
    limit: Option<u64>,
    configuration: StatementConfiguration,
}

/// Starts `delete from table`.
pub fn delete_from(table: &SqlTable) -> DeleteBuilder {
    DeleteBuilder {
        table: table.clone(),
        table_alias: None,
        where_draft: CriteriaDraft::default(),
        order_by: Vec::new(),
        limit: None,
        configuration: StatementConfiguration::default(),
    }
}

/// Starts `delete from table alias`.
pub fn delete_from_aliased(table: &SqlTable, alias: &str) -> DeleteBuilder {
    let mut builder = delete_from(table);
    builder.table_alias = Some(alias.to_string());
    builder
}

impl DeleteBuilder {
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

    pub fn build(self) -> Result<DeleteModel> {
        let allowed = self.configuration.is_non_rendering_where_clause_allowed();
        Ok(DeleteModel {
            table: self.table,
            table_alias: self.table_alias,
            where_model: self.where_draft.build(allowed),
            order_by: (!self.order_by.is_empty())
                .then(|| OrderByModel::new(self.order_by))
                .transpose()?,
            limit: self.limit,
            configuration: self.configuration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::condition::is_equal_to;

    #[test]
    fn builds_where_and_limit() {
        let person = SqlTable::new("Person");
        let model = delete_from_aliased(&person, "p")
            .where_clause(person.column("id"), is_equal_to(1))
            .or(person.column("id"), is_equal_to(2))
            .limit(1)
            .build()
            .unwrap();
        assert_eq!(model.table_alias(), Some("p"));
        assert_eq!(model.where_model().unwrap().sub_criteria().len(), 1);
        assert_eq!(model.limit(), Some(1));
    }

    #[test]
    fn where_is_absent_until_started() {
        let person = SqlTable::new("Person");
        let model = delete_from(&person).build().unwrap();
        assert!(model.where_model().is_none());
    }
}

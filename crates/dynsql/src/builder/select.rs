//! Provides a typestate builder for `SelectModel`s.
//!
//! `select(..)` starts in [`SelectState`], `from(..)` moves to [`FromState`]
//! where the optional clauses live, and `union(..)` returns to
//! [`InitialState`] for the next query expression. Alias and structure
//! errors are collected along the way and reported by `build()`.

use std::marker::PhantomData;

use crate::{
    ast::{
        column::{BasicColumn, SortSpecification},
        condition::Condition,
        criterion::{AndOrCriteriaGroup, Connector, SqlCriterion},
        select::{
            GroupByModel, JoinCriterion, JoinModel, JoinSpecification, JoinType, OrderByModel,
            PagingModel, QueryExpressionModel, SelectModel, TableExpression,
        },
        table::{SqlTable, TableAliases},
    },
    builder::criterion::CriteriaDraft,
    config::StatementConfiguration,
    error::{DynSqlError, Result},
};

/// Between query expressions of a union; only `select` may follow.
#[derive(Debug, Default, Clone)]
pub struct InitialState;

/// After the select list; only `from` may follow.
#[derive(Debug, Default, Clone)]
pub struct SelectState;

/// After `from`; joins, criteria, grouping and paging may follow.
#[derive(Debug, Default, Clone)]
pub struct FromState;

#[derive(Debug, Clone, Default)]
struct QueryExpressionDraft {
    connector: Option<String>,
    distinct: bool,
    columns: Vec<BasicColumn>,
    table: Option<TableExpression>,
    aliases: TableAliases,
    joins: Vec<JoinSpecification>,
    where_draft: CriteriaDraft,
    group_by: Vec<BasicColumn>,
    having: CriteriaDraft,
}

#[derive(Debug, Clone)]
pub struct SelectBuilder<State> {
    completed: Vec<QueryExpressionModel>,
    current: QueryExpressionDraft,
    order_by: Vec<SortSpecification>,
    limit: Option<u64>,
    offset: Option<u64>,
    fetch_first: Option<u64>,
    for_clause: Option<String>,
    configuration: StatementConfiguration,
    error: Option<DynSqlError>,
    state: PhantomData<State>,
}

/// Starts `select c1, c2, ...`.
pub fn select<C, I>(columns: I) -> SelectBuilder<SelectState>
where
    C: Into<BasicColumn>,
    I: IntoIterator<Item = C>,
{
    SelectBuilder::new().select(columns)
}

/// Starts `select distinct c1, c2, ...`.
pub fn select_distinct<C, I>(columns: I) -> SelectBuilder<SelectState>
where
    C: Into<BasicColumn>,
    I: IntoIterator<Item = C>,
{
    SelectBuilder::new().select_distinct(columns)
}

/// Shorthand for `select count(*) from table`.
pub fn count_from(table: &SqlTable) -> SelectBuilder<FromState> {
    select([BasicColumn::CountAll]).from(table)
}

impl SelectBuilder<InitialState> {
    pub fn new() -> Self {
        Self {
            completed: Vec::new(),
            current: QueryExpressionDraft::default(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            fetch_first: None,
            for_clause: None,
            configuration: StatementConfiguration::default(),
            error: None,
            state: PhantomData,
        }
    }

    pub fn select<C, I>(mut self, columns: I) -> SelectBuilder<SelectState>
    where
        C: Into<BasicColumn>,
        I: IntoIterator<Item = C>,
    {
        self.current.columns = columns.into_iter().map(Into::into).collect();
        self.transition()
    }

    pub fn select_distinct<C, I>(mut self, columns: I) -> SelectBuilder<SelectState>
    where
        C: Into<BasicColumn>,
        I: IntoIterator<Item = C>,
    {
        self.current.distinct = true;
        self.select(columns)
    }
}

impl Default for SelectBuilder<InitialState> {
    fn default() -> Self {
        Self::new()
    }
}

impl<State> SelectBuilder<State> {
    fn transition<Next>(self) -> SelectBuilder<Next> {
        SelectBuilder {
            completed: self.completed,
            current: self.current,
            order_by: self.order_by,
            limit: self.limit,
            offset: self.offset,
            fetch_first: self.fetch_first,
            for_clause: self.for_clause,
            configuration: self.configuration,
            error: self.error,
            state: PhantomData,
        }
    }

    /// Keeps the first error; later ones are usually consequences of it.
    fn defer(&mut self, result: Result<()>) {
        if let Err(err) = result
            && self.error.is_none()
        {
            self.error = Some(err);
        }
    }
}

impl SelectBuilder<SelectState> {
    /// `from table`, using the alias the table instance carries, if any.
    pub fn from(mut self, table: &SqlTable) -> SelectBuilder<FromState> {
        let registered = self.current.aliases.insert_intrinsic(table);
        self.defer(registered);
        self.current.table = Some(TableExpression::Table(table.clone()));
        self.transition()
    }

    /// `from table alias`.
    pub fn from_aliased(mut self, table: &SqlTable, alias: &str) -> SelectBuilder<FromState> {
        let registered = self.current.aliases.insert(table, alias);
        self.defer(registered);
        self.current.table = Some(TableExpression::Table(table.clone()));
        self.transition()
    }

    /// `from (select ...) alias`.
    pub fn from_subquery(mut self, select: SelectModel, alias: Option<&str>) -> SelectBuilder<FromState> {
        self.current.table = Some(TableExpression::SubQuery {
            select: Box::new(select),
            alias: alias.map(String::from),
        });
        self.transition()
    }
}

impl SelectBuilder<FromState> {
    /// Adds a join against a table. The table's own alias is used when
    /// `alias` is `None`.
    pub fn join_table(
        mut self,
        join_type: JoinType,
        table: &SqlTable,
        alias: Option<&str>,
        criteria: Vec<JoinCriterion>,
    ) -> Self {
        let registered = match alias {
            Some(alias) => self.current.aliases.insert(table, alias),
            None => self.current.aliases.insert_intrinsic(table),
        };
        self.defer(registered);
        self.push_join(join_type, TableExpression::Table(table.clone()), criteria)
    }

    /// Adds a join against `(select ...) alias`.
    pub fn join_subquery(
        self,
        join_type: JoinType,
        select: SelectModel,
        alias: Option<&str>,
        criteria: Vec<JoinCriterion>,
    ) -> Self {
        let table = TableExpression::SubQuery {
            select: Box::new(select),
            alias: alias.map(String::from),
        };
        self.push_join(join_type, table, criteria)
    }

    fn push_join(
        mut self,
        join_type: JoinType,
        table: TableExpression,
        criteria: Vec<JoinCriterion>,
    ) -> Self {
        match JoinSpecification::new(join_type, table, criteria) {
            Ok(specification) => self.current.joins.push(specification),
            Err(err) => self.defer(Err(err)),
        }
        self
    }

    pub fn join(self, table: &SqlTable, criteria: Vec<JoinCriterion>) -> Self {
        self.join_table(JoinType::Inner, table, None, criteria)
    }

    pub fn left_join(self, table: &SqlTable, criteria: Vec<JoinCriterion>) -> Self {
        self.join_table(JoinType::Left, table, None, criteria)
    }

    pub fn right_join(self, table: &SqlTable, criteria: Vec<JoinCriterion>) -> Self {
        self.join_table(JoinType::Right, table, None, criteria)
    }

    pub fn full_join(self, table: &SqlTable, criteria: Vec<JoinCriterion>) -> Self {
        self.join_table(JoinType::Full, table, None, criteria)
    }

    /// `where column condition`.
    pub fn where_clause(self, column: impl Into<BasicColumn>, condition: Condition) -> Self {
        self.where_criterion(crate::builder::criterion::criterion(column, condition))
    }

    pub fn where_criterion(mut self, criterion: SqlCriterion) -> Self {
        self.current.where_draft.initial(criterion);
        self
    }

    /// Starts an empty where clause that later `and`/`or` calls fill in.
    pub fn where_empty(mut self) -> Self {
        self.current.where_draft.start();
        self
    }

    /// Chains onto the having clause once one is started, else the where
    /// clause.
    fn chain(mut self, group: AndOrCriteriaGroup) -> Self {
        if self.current.having.is_started() {
            self.current.having.push(group);
        } else {
            self.current.where_draft.push(group);
        }
        self
    }

    pub fn and(self, column: impl Into<BasicColumn>, condition: Condition) -> Self {
        self.chain(AndOrCriteriaGroup::leaf(Connector::And, column, condition))
    }

    pub fn or(self, column: impl Into<BasicColumn>, condition: Condition) -> Self {
        self.chain(AndOrCriteriaGroup::leaf(Connector::Or, column, condition))
    }

    pub fn and_criterion(self, criterion: SqlCriterion) -> Self {
        self.chain(AndOrCriteriaGroup::new(Connector::And, criterion))
    }

    pub fn or_criterion(self, criterion: SqlCriterion) -> Self {
        self.chain(AndOrCriteriaGroup::new(Connector::Or, criterion))
    }

    pub fn group_by<C, I>(mut self, columns: I) -> Self
    where
        C: Into<BasicColumn>,
        I: IntoIterator<Item = C>,
    {
        self.current
            .group_by
            .extend(columns.into_iter().map(Into::into));
        self
    }

    /// `having column condition`.
    pub fn having(self, column: impl Into<BasicColumn>, condition: Condition) -> Self {
        self.having_criterion(crate::builder::criterion::criterion(column, condition))
    }

    pub fn having_criterion(mut self, criterion: SqlCriterion) -> Self {
        self.current.having.initial(criterion);
        self
    }

    /// Closes the current query expression and starts a `union` one.
    pub fn union(self) -> SelectBuilder<InitialState> {
        self.next_query_expression("union")
    }

    pub fn union_all(self) -> SelectBuilder<InitialState> {
        self.next_query_expression("union all")
    }

    fn next_query_expression(mut self, connector: &str) -> SelectBuilder<InitialState> {
        let finished = std::mem::take(&mut self.current);
        match self.finish_query_expression(finished) {
            Ok(model) => self.completed.push(model),
            Err(err) => self.defer(Err(err)),
        }
        self.current.connector = Some(connector.to_string());
        self.transition()
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

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// `fetch first n rows only`. Takes precedence over `limit`.
    pub fn fetch_first(mut self, rows: u64) -> Self {
        self.fetch_first = Some(rows);
        self
    }

    pub fn for_update(self) -> Self {
        self.for_clause("for update")
    }

    /// Appends a locking clause such as `for share` verbatim.
    pub fn for_clause(mut self, clause: impl Into<String>) -> Self {
        self.for_clause = Some(clause.into());
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

    fn finish_query_expression(&self, draft: QueryExpressionDraft) -> Result<QueryExpressionModel> {
        let allowed = self.configuration.is_non_rendering_where_clause_allowed();
        let table = draft.table.ok_or(DynSqlError::MissingRequiredField {
            statement: "Select",
            field: "a from clause",
        })?;
        if draft.columns.is_empty() {
            return Err(DynSqlError::EmptyStructure {
                structure: "Select list",
            });
        }
        Ok(QueryExpressionModel {
            connector: draft.connector,
            distinct: draft.distinct,
            columns: draft.columns,
            table,
            table_aliases: draft.aliases,
            join: (!draft.joins.is_empty())
                .then(|| JoinModel::new(draft.joins))
                .transpose()?,
            where_model: draft.where_draft.build(allowed),
            group_by: (!draft.group_by.is_empty())
                .then(|| GroupByModel::new(draft.group_by))
                .transpose()?,
            having: draft.having.build(allowed),
        })
    }

    fn paging(&self) -> Option<PagingModel> {
        match (self.fetch_first, self.limit, self.offset) {
            (Some(fetch_first_rows), _, offset) => Some(PagingModel::FetchFirst {
                offset,
                fetch_first_rows,
            }),
            (None, None, None) => None,
            (None, limit, offset) => Some(PagingModel::LimitOffset { limit, offset }),
        }
    }

    /// Finalizes the statement, surfacing the first error seen while
    /// building.
    pub fn build(mut self) -> Result<SelectModel> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        let last = std::mem::take(&mut self.current);
        let last = self.finish_query_expression(last)?;
        let paging = self.paging();
        let mut query_expressions = self.completed;
        query_expressions.push(last);
        Ok(SelectModel {
            query_expressions,
            order_by: (!self.order_by.is_empty())
                .then(|| OrderByModel::new(self.order_by))
                .transpose()?,
            paging,
            for_clause: self.for_clause,
            configuration: self.configuration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builder::condition::*, error::ErrorCode};

    #[test]
    fn builds_single_query_expression() {
        let person = SqlTable::new("Person");
        let model = select([person.column("id"), person.column("name")])
            .from(&person)
            .where_clause(person.column("id"), is_equal_to(3))
            .order_by([person.column("name")])
            .limit(10)
            .build()
            .unwrap();

        assert_eq!(model.query_expressions().len(), 1);
        assert!(model.query_expressions()[0].where_model().is_some());
        assert_eq!(
            model.paging(),
            Some(&PagingModel::LimitOffset {
                limit: Some(10),
                offset: None
            })
        );
    }

    #[test]
    fn fetch_first_takes_precedence_over_limit() {
        let person = SqlTable::new("Person");
        let model = select([person.column("id")])
            .from(&person)
            .limit(5)
            .offset(2)
            .fetch_first(3)
            .build()
            .unwrap();
        assert_eq!(
            model.paging(),
            Some(&PagingModel::FetchFirst {
                offset: Some(2),
                fetch_first_rows: 3
            })
        );
    }

    #[test]
    fn union_collects_query_expressions() {
        let person = SqlTable::new("Person");
        let model = select([person.column("id")])
            .from(&person)
            .union_all()
            .select([person.column("id")])
            .from(&person)
            .build()
            .unwrap();
        let expressions = model.query_expressions();
        assert_eq!(expressions.len(), 2);
        assert_eq!(expressions[1].connector.as_deref(), Some("union all"));
    }

    #[test]
    fn alias_conflicts_surface_at_build() {
        let person = SqlTable::new("Person");
        let address = SqlTable::new("Address");
        let err = select([person.column("id")])
            .from_aliased(&person, "p")
            .join_table(
                JoinType::Inner,
                &address,
                Some("p"),
                vec![JoinCriterion::on(
                    address.column("person_id"),
                    is_equal_to_column(person.column("id")),
                )],
            )
            .build()
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::AliasInUse);
    }

    #[test]
    fn empty_join_criteria_are_rejected() {
        let person = SqlTable::new("Person");
        let address = SqlTable::new("Address");
        let err = select([person.column("id")])
            .from(&person)
            .join(&address, vec![])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            DynSqlError::EmptyStructure {
                structure: "Join criteria"
            }
        );
    }

    #[test]
    fn chained_criteria_go_to_having_once_started() {
        let person = SqlTable::new("Person");
        let age = person.column("age");
        let model = select([BasicColumn::from(&age), BasicColumn::CountAll])
            .from(&person)
            .where_clause(&age, is_greater_than(18))
            .group_by([&age])
            .having(&age, is_less_than(65))
            .and(&age, is_not_equal_to(30))
            .build()
            .unwrap();
        let expression = &model.query_expressions()[0];
        assert!(expression.where_model().unwrap().sub_criteria().is_empty());
        assert_eq!(expression.having.as_ref().unwrap().sub_criteria().len(), 1);
    }

    #[test]
    fn from_state_builder_can_be_reused() {
        let person = SqlTable::new("Person");
        let base = select([person.column("id")]).from(&person);

        let paged = base.clone().limit(5).build().unwrap();
        let plain = base.build().unwrap();
        assert!(plain.paging().is_none());
        assert!(paged.paging().is_some());
        assert_eq!(
            std::mem::size_of::<SelectBuilder<InitialState>>(),
            std::mem::size_of::<SelectBuilder<FromState>>()
        );
    }
}

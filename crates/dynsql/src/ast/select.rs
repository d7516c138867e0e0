use serde::{Deserialize, Serialize};

use crate::{
    ast::{
        column::{BasicColumn, SortSpecification},
        condition::Condition,
        criterion::{HavingModel, WhereModel},
        table::{SqlTable, TableAliases},
    },
    config::StatementConfiguration,
    error::{Result, ensure_not_empty},
};

/// The source of rows in a `from` or `join` clause.
#[derive(Debug, Clone)]
pub enum TableExpression {
    Table(SqlTable),
    SubQuery {
        select: Box<SelectModel>,
        alias: Option<String>,
    },
}

impl TableExpression {
    pub fn is_sub_query(&self) -> bool {
        matches!(self, TableExpression::SubQuery { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    pub fn keyword(&self) -> &'static str {
        match self {
            JoinType::Inner => "join",
            JoinType::Left => "left join",
            JoinType::Right => "right join",
            JoinType::Full => "full join",
        }
    }
}

/// One `on`/`and` entry of a join.
#[derive(Debug, Clone)]
pub struct JoinCriterion {
    pub(crate) connector: &'static str,
    pub(crate) left: BasicColumn,
    pub(crate) condition: Condition,
}

impl JoinCriterion {
    pub fn on(left: impl Into<BasicColumn>, condition: Condition) -> Self {
        Self {
            connector: "on",
            left: left.into(),
            condition,
        }
    }

    pub fn and(left: impl Into<BasicColumn>, condition: Condition) -> Self {
        Self {
            connector: "and",
            left: left.into(),
            condition,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JoinSpecification {
    join_type: JoinType,
    table: TableExpression,
    criteria: Vec<JoinCriterion>,
}

impl JoinSpecification {
    /// Fails when `criteria` is empty.
    pub fn new(
        join_type: JoinType,
        table: TableExpression,
        criteria: Vec<JoinCriterion>,
    ) -> Result<Self> {
        Ok(Self {
            join_type,
            table,
            criteria: ensure_not_empty(criteria, "Join criteria")?,
        })
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn table(&self) -> &TableExpression {
        &self.table
    }

    pub fn criteria(&self) -> &[JoinCriterion] {
        &self.criteria
    }
}

#[derive(Debug, Clone)]
pub struct JoinModel {
    specifications: Vec<JoinSpecification>,
}

impl JoinModel {
    pub fn new(specifications: Vec<JoinSpecification>) -> Result<Self> {
        Ok(Self {
            specifications: ensure_not_empty(specifications, "Join specifications")?,
        })
    }

    pub fn specifications(&self) -> &[JoinSpecification] {
        &self.specifications
    }

    pub fn contains_sub_queries(&self) -> bool {
        self.specifications.iter().any(|s| s.table.is_sub_query())
    }
}

#[derive(Debug, Clone)]
pub struct GroupByModel {
    columns: Vec<BasicColumn>,
}

impl GroupByModel {
    pub fn new(columns: Vec<BasicColumn>) -> Result<Self> {
        Ok(Self {
            columns: ensure_not_empty(columns, "Group by list")?,
        })
    }

    pub fn columns(&self) -> &[BasicColumn] {
        &self.columns
    }
}

#[derive(Debug, Clone)]
pub struct OrderByModel {
    columns: Vec<SortSpecification>,
}

impl OrderByModel {
    pub fn new(columns: Vec<SortSpecification>) -> Result<Self> {
        Ok(Self {
            columns: ensure_not_empty(columns, "Order by list")?,
        })
    }

    pub fn columns(&self) -> &[SortSpecification] {
        &self.columns
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagingModel {
    LimitOffset {
        limit: Option<u64>,
        offset: Option<u64>,
    },
    FetchFirst {
        offset: Option<u64>,
        fetch_first_rows: u64,
    },
}

/// One `select ... from ...` block; several are joined by union connectors.
#[derive(Debug, Clone)]
pub struct QueryExpressionModel {
    pub(crate) connector: Option<String>,
    pub(crate) distinct: bool,
    pub(crate) columns: Vec<BasicColumn>,
    pub(crate) table: TableExpression,
    pub(crate) table_aliases: TableAliases,
    pub(crate) join: Option<JoinModel>,
    pub(crate) where_model: Option<WhereModel>,
    pub(crate) group_by: Option<GroupByModel>,
    pub(crate) having: Option<HavingModel>,
}

impl QueryExpressionModel {
    pub fn columns(&self) -> &[BasicColumn] {
        &self.columns
    }

    pub fn table(&self) -> &TableExpression {
        &self.table
    }

    pub fn table_aliases(&self) -> &TableAliases {
        &self.table_aliases
    }

    pub fn join(&self) -> Option<&JoinModel> {
        self.join.as_ref()
    }

    pub fn where_model(&self) -> Option<&WhereModel> {
        self.where_model.as_ref()
    }

    pub fn contains_sub_queries(&self) -> bool {
        self.table.is_sub_query() || self.join.as_ref().is_some_and(JoinModel::contains_sub_queries)
    }
}

#[derive(Debug, Clone)]
pub struct SelectModel {
    pub(crate) query_expressions: Vec<QueryExpressionModel>,
    pub(crate) order_by: Option<OrderByModel>,
    pub(crate) paging: Option<PagingModel>,
    pub(crate) for_clause: Option<String>,
    pub(crate) configuration: StatementConfiguration,
}

impl SelectModel {
    pub fn query_expressions(&self) -> &[QueryExpressionModel] {
        &self.query_expressions
    }

    pub fn order_by(&self) -> Option<&OrderByModel> {
        self.order_by.as_ref()
    }

    pub fn paging(&self) -> Option<&PagingModel> {
        self.paging.as_ref()
    }

    pub fn configuration(&self) -> &StatementConfiguration {
        &self.configuration
    }
}

use model::core::value::Value;

use crate::{
    ast::{
        column::{BasicColumn, SqlColumn},
        criterion::WhereModel,
        select::{OrderByModel, SelectModel},
        table::SqlTable,
    },
    config::StatementConfiguration,
};

/// The right-hand side of one `set` assignment.
#[derive(Debug, Clone)]
pub enum UpdateMapping {
    Null(SqlColumn),
    Constant(SqlColumn, String),
    StringConstant(SqlColumn, String),
    Value(SqlColumn, Value),
    /// Dropped from the statement when the value is absent.
    ValueWhenPresent(SqlColumn, Option<Value>),
    Column(SqlColumn, BasicColumn),
    Select(SqlColumn, Box<SelectModel>),
}

impl UpdateMapping {
    pub fn column(&self) -> &SqlColumn {
        match self {
            UpdateMapping::Null(column)
            | UpdateMapping::Constant(column, _)
            | UpdateMapping::StringConstant(column, _)
            | UpdateMapping::Value(column, _)
            | UpdateMapping::ValueWhenPresent(column, _)
            | UpdateMapping::Column(column, _)
            | UpdateMapping::Select(column, _) => column,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdateModel {
    pub(crate) table: SqlTable,
    pub(crate) table_alias: Option<String>,
    pub(crate) mappings: Vec<UpdateMapping>,
    pub(crate) where_model: Option<WhereModel>,
    pub(crate) order_by: Option<OrderByModel>,
    pub(crate) limit: Option<u64>,
    pub(crate) configuration: StatementConfiguration,
}

impl UpdateModel {
    pub fn table(&self) -> &SqlTable {
        &self.table
    }

    pub fn mappings(&self) -> &[UpdateMapping] {
        &self.mappings
    }

    pub fn where_model(&self) -> Option<&WhereModel> {
        self.where_model.as_ref()
    }
}

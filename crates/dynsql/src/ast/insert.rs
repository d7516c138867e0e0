use model::core::value::Value;

use crate::{
    ast::{column::SqlColumn, select::SelectModel, table::SqlTable},
    config::StatementConfiguration,
};

/// A column/value pair of a general insert.
#[derive(Debug, Clone)]
pub enum InsertMapping {
    Null(SqlColumn),
    Constant(SqlColumn, String),
    StringConstant(SqlColumn, String),
    Value(SqlColumn, Value),
    /// Dropped from the statement when the value is absent.
    ValueWhenPresent(SqlColumn, Option<Value>),
}

impl InsertMapping {
    pub fn column(&self) -> &SqlColumn {
        match self {
            InsertMapping::Null(column)
            | InsertMapping::Constant(column, _)
            | InsertMapping::StringConstant(column, _)
            | InsertMapping::Value(column, _)
            | InsertMapping::ValueWhenPresent(column, _) => column,
        }
    }
}

/// A column bound to a property of a caller-supplied record.
#[derive(Debug, Clone)]
pub enum RecordMapping {
    Null(SqlColumn),
    Constant(SqlColumn, String),
    StringConstant(SqlColumn, String),
    Property(SqlColumn, String),
}

impl RecordMapping {
    pub fn column(&self) -> &SqlColumn {
        match self {
            RecordMapping::Null(column)
            | RecordMapping::Constant(column, _)
            | RecordMapping::StringConstant(column, _)
            | RecordMapping::Property(column, _) => column,
        }
    }
}

/// `insert into T (...) values (...)` from explicit values.
#[derive(Debug, Clone)]
pub struct GeneralInsertModel {
    pub(crate) table: SqlTable,
    pub(crate) mappings: Vec<InsertMapping>,
    pub(crate) configuration: StatementConfiguration,
}

/// `insert into T (...) values (...)` bound to one record's properties.
#[derive(Debug, Clone)]
pub struct InsertModel {
    pub(crate) table: SqlTable,
    pub(crate) mappings: Vec<RecordMapping>,
    pub(crate) configuration: StatementConfiguration,
}

/// `insert into T (...) values (...), (...)` bound to a list of records.
#[derive(Debug, Clone)]
pub struct MultiRowInsertModel {
    pub(crate) table: SqlTable,
    pub(crate) mappings: Vec<RecordMapping>,
    pub(crate) record_count: usize,
    pub(crate) configuration: StatementConfiguration,
}

#[derive(Debug, Clone)]
pub struct InsertSelectModel {
    pub(crate) table: SqlTable,
    pub(crate) columns: Option<Vec<SqlColumn>>,
    pub(crate) select: SelectModel,
    pub(crate) configuration: StatementConfiguration,
}

impl GeneralInsertModel {
    pub fn table(&self) -> &SqlTable {
        &self.table
    }

    pub fn mappings(&self) -> &[InsertMapping] {
        &self.mappings
    }
}

impl InsertModel {
    pub fn table(&self) -> &SqlTable {
        &self.table
    }

    pub fn mappings(&self) -> &[RecordMapping] {
        &self.mappings
    }
}

impl MultiRowInsertModel {
    pub fn record_count(&self) -> usize {
        self.record_count
    }
}

impl InsertSelectModel {
    pub fn table(&self) -> &SqlTable {
        &self.table
    }
}

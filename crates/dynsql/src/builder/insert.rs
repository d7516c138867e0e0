//! Provides fluent builders for the insert models.

use model::core::value::Value;

use crate::{
    ast::{
        column::SqlColumn,
        insert::{
            GeneralInsertModel, InsertMapping, InsertModel, InsertSelectModel,
            MultiRowInsertModel, RecordMapping,
        },
        select::SelectModel,
        table::SqlTable,
    },
    config::StatementConfiguration,
    error::{DynSqlError, Result},
};

fn missing_mappings(statement: &'static str) -> DynSqlError {
    DynSqlError::MissingRequiredField {
        statement,
        field: "at least one column mapping",
    }
}

/// Builds `insert into T (...) values (...)` from explicit values.
#[derive(Debug, Clone)]
pub struct GeneralInsertBuilder {
    table: SqlTable,
    mappings: Vec<InsertMapping>,
    configuration: StatementConfiguration,
}

/// Starts a general insert into `table`.
pub fn insert_into(table: &SqlTable) -> GeneralInsertBuilder {
    GeneralInsertBuilder {
        table: table.clone(),
        mappings: Vec::new(),
        configuration: StatementConfiguration::default(),
    }
}

impl GeneralInsertBuilder {
    fn mapping(mut self, mapping: InsertMapping) -> Self {
        self.mappings.push(mapping);
        self
    }

    pub fn set(self, column: &SqlColumn, value: impl Into<Value>) -> Self {
        self.mapping(InsertMapping::Value(column.clone(), value.into()))
    }

    /// Omits the column entirely when `value` is `None`.
    pub fn set_when_present<V: Into<Value>>(self, column: &SqlColumn, value: Option<V>) -> Self {
        self.mapping(InsertMapping::ValueWhenPresent(
            column.clone(),
            value.map(Into::into),
        ))
    }

    pub fn set_null(self, column: &SqlColumn) -> Self {
        self.mapping(InsertMapping::Null(column.clone()))
    }

    pub fn set_constant(self, column: &SqlColumn, constant: impl Into<String>) -> Self {
        self.mapping(InsertMapping::Constant(column.clone(), constant.into()))
    }

    pub fn set_string_constant(self, column: &SqlColumn, constant: impl Into<String>) -> Self {
        self.mapping(InsertMapping::StringConstant(column.clone(), constant.into()))
    }

    pub fn configuration(mut self, configuration: StatementConfiguration) -> Self {
        self.configuration = configuration;
        self
    }

    pub fn build(self) -> Result<GeneralInsertModel> {
        if self.mappings.is_empty() {
            return Err(missing_mappings("Insert"));
        }
        Ok(GeneralInsertModel {
            table: self.table,
            mappings: self.mappings,
            configuration: self.configuration,
        })
    }
}

/// Column-to-property mappings shared by the record-based insert builders.
#[derive(Debug, Clone)]
pub struct RecordInsertBuilder {
    table: SqlTable,
    mappings: Vec<RecordMapping>,
    record_count: Option<usize>,
    configuration: StatementConfiguration,
}

/// Starts an insert bound to a single record's properties.
pub fn insert(table: &SqlTable) -> RecordInsertBuilder {
    RecordInsertBuilder {
        table: table.clone(),
        mappings: Vec::new(),
        record_count: None,
        configuration: StatementConfiguration::default(),
    }
}

/// Starts an insert of `record_count` records in one statement.
pub fn insert_multiple(table: &SqlTable, record_count: usize) -> RecordInsertBuilder {
    RecordInsertBuilder {
        record_count: Some(record_count),
        ..insert(table)
    }
}

impl RecordInsertBuilder {
    fn mapping(mut self, mapping: RecordMapping) -> Self {
        self.mappings.push(mapping);
        self
    }

    /// Binds `column` to the record property `property`.
    pub fn map(self, column: &SqlColumn, property: impl Into<String>) -> Self {
        self.mapping(RecordMapping::Property(column.clone(), property.into()))
    }

    pub fn map_null(self, column: &SqlColumn) -> Self {
        self.mapping(RecordMapping::Null(column.clone()))
    }

    pub fn map_constant(self, column: &SqlColumn, constant: impl Into<String>) -> Self {
        self.mapping(RecordMapping::Constant(column.clone(), constant.into()))
    }

    pub fn map_string_constant(self, column: &SqlColumn, constant: impl Into<String>) -> Self {
        self.mapping(RecordMapping::StringConstant(column.clone(), constant.into()))
    }

    pub fn configuration(mut self, configuration: StatementConfiguration) -> Self {
        self.configuration = configuration;
        self
    }

    pub fn build(self) -> Result<InsertModel> {
        if self.mappings.is_empty() {
            return Err(missing_mappings("Insert"));
        }
        Ok(InsertModel {
            table: self.table,
            mappings: self.mappings,
            configuration: self.configuration,
        })
    }

    /// Builds the multi-row form. A builder started with [`insert`] counts
    /// as one record.
    pub fn build_multiple(self) -> Result<MultiRowInsertModel> {
        if self.mappings.is_empty() {
            return Err(missing_mappings("Multi-row insert"));
        }
        let record_count = self.record_count.unwrap_or(1);
        if record_count == 0 {
            return Err(DynSqlError::MissingRequiredField {
                statement: "Multi-row insert",
                field: "at least one record",
            });
        }
        Ok(MultiRowInsertModel {
            table: self.table,
            mappings: self.mappings,
            record_count,
            configuration: self.configuration,
        })
    }
}

/// Builds `insert into T (...) select ...`.
#[derive(Debug, Clone)]
pub struct InsertSelectBuilder {
    table: SqlTable,
    columns: Option<Vec<SqlColumn>>,
    select: Option<SelectModel>,
    configuration: StatementConfiguration,
}

pub fn insert_select_into(table: &SqlTable) -> InsertSelectBuilder {
    InsertSelectBuilder {
        table: table.clone(),
        columns: None,
        select: None,
        configuration: StatementConfiguration::default(),
    }
}

impl InsertSelectBuilder {
    pub fn columns<'c, I>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = &'c SqlColumn>,
    {
        self.columns = Some(columns.into_iter().cloned().collect());
        self
    }

    pub fn select(mut self, select: SelectModel) -> Self {
        self.select = Some(select);
        self
    }

    pub fn configuration(mut self, configuration: StatementConfiguration) -> Self {
        self.configuration = configuration;
        self
    }

    pub fn build(self) -> Result<InsertSelectModel> {
        let select = self.select.ok_or(DynSqlError::MissingRequiredField {
            statement: "Insert select",
            field: "a select statement",
        })?;
        if let Some(columns) = &self.columns
            && columns.is_empty()
        {
            return Err(DynSqlError::EmptyStructure {
                structure: "Insert column list",
            });
        }
        Ok(InsertSelectModel {
            table: self.table,
            columns: self.columns,
            select,
            configuration: self.configuration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn general_insert_requires_a_mapping() {
        let person = SqlTable::new("Person");
        let err = insert_into(&person).build().unwrap_err();
        assert_eq!(err.code(), ErrorCode::MissingRequiredField);
    }

    #[test]
    fn multi_row_rejects_zero_records() {
        let person = SqlTable::new("Person");
        let err = insert_multiple(&person, 0)
            .map(&person.column("id"), "id")
            .build_multiple()
            .unwrap_err();
        assert_eq!(
            err,
            DynSqlError::MissingRequiredField {
                statement: "Multi-row insert",
                field: "at least one record"
            }
        );
    }

    #[test]
    fn insert_select_requires_select() {
        let person = SqlTable::new("Person");
        assert!(insert_select_into(&person).build().is_err());
    }
}

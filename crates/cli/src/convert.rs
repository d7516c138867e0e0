//! Turns a [`StatementDocument`] into a renderable statement model.

use dynsql::{
    Value,
    ast::{
        column::{BasicColumn, SortSpecification, SqlColumn},
        condition::Condition,
        criterion::{Connector, SqlCriterion},
        select::JoinCriterion,
        table::SqlTable,
    },
    builder::{
        condition::*,
        criterion::{and_all, criterion, not, or_all},
        delete::{DeleteBuilder, delete_from},
        insert::{insert, insert_into, insert_multiple},
        select::{FromState, SelectBuilder, select, select_distinct},
        update::{UpdateBuilder, update},
    },
    config::StatementConfiguration,
    renderer::SqlStatement,
};
use model::core::jdbc_type::JdbcType;
use serde_json::Value as Json;
use tracing::debug;

use crate::{
    document::{
        AssignmentDef, ConditionDef, CriterionDef, DeleteDef, InsertDef, InsertRecordDef,
        Operator, SelectDef, SortDef, StatementDef, StatementDocument, TableDef, UpdateDef,
    },
    error::CliError,
};

struct CatalogTable {
    table: SqlTable,
    columns: Vec<SqlColumn>,
}

/// The declared tables, resolvable by name or alias.
struct Catalog {
    tables: Vec<CatalogTable>,
}

impl Catalog {
    fn new(defs: &[TableDef]) -> Result<Self, CliError> {
        let mut tables = Vec::with_capacity(defs.len());
        for def in defs {
            let base = match &def.schema {
                Some(schema) => SqlTable::with_schema(schema.as_str(), def.name.as_str()),
                None => SqlTable::new(def.name.as_str()),
            };
            let table = match &def.alias {
                Some(alias) => base.with_alias(alias.as_str()),
                None => base,
            };

            let mut columns = Vec::with_capacity(def.columns.len());
            for column_def in &def.columns {
                let mut column = table.column(column_def.name.as_str());
                if let Some(jdbc_type) = &column_def.jdbc_type {
                    column = column.with_jdbc_type(jdbc_type.parse::<JdbcType>()?);
                }
                if let Some(type_handler) = &column_def.type_handler {
                    column = column.with_type_handler(type_handler.as_str());
                }
                columns.push(column);
            }
            tables.push(CatalogTable { table, columns });
        }
        Ok(Self { tables })
    }

    fn entry(&self, reference: &str) -> Result<&CatalogTable, CliError> {
        self.tables
            .iter()
            .find(|entry| entry.table.alias() == Some(reference))
            .or_else(|| self.tables.iter().find(|entry| entry.table.name() == reference))
            .ok_or_else(|| CliError::InvalidDocument(format!("Unknown table \"{reference}\"")))
    }

    fn table(&self, reference: &str) -> Result<&SqlTable, CliError> {
        Ok(&self.entry(reference)?.table)
    }

    /// Resolves `qualifier.column`. Undeclared columns are accepted untyped.
    fn column(&self, reference: &str) -> Result<SqlColumn, CliError> {
        let (qualifier, name) = reference.split_once('.').ok_or_else(|| {
            CliError::InvalidDocument(format!(
                "Column \"{reference}\" must be written as table.column"
            ))
        })?;
        let entry = self.entry(qualifier)?;
        if name == "*" {
            return Ok(entry.table.all_columns());
        }
        Ok(entry
            .columns
            .iter()
            .find(|column| column.name() == name)
            .cloned()
            .unwrap_or_else(|| entry.table.column(name)))
    }

    fn basic_column(&self, reference: &str) -> Result<BasicColumn, CliError> {
        if reference.eq_ignore_ascii_case("count(*)") {
            return Ok(BasicColumn::CountAll);
        }
        Ok(self.column(reference)?.into())
    }

    fn basic_columns(&self, references: &[String]) -> Result<Vec<BasicColumn>, CliError> {
        references.iter().map(|r| self.basic_column(r)).collect()
    }

    fn sort_specifications(&self, defs: &[SortDef]) -> Result<Vec<SortSpecification>, CliError> {
        defs.iter()
            .map(|def| {
                let spec = SortSpecification::from(self.column(&def.column)?);
                Ok(if def.descending { spec.descending() } else { spec })
            })
            .collect()
    }

    fn criterion(&self, def: &CriterionDef) -> Result<SqlCriterion, CliError> {
        match def {
            CriterionDef::Condition(condition_def) => Ok(criterion(
                self.basic_column(&condition_def.column)?,
                condition(condition_def)?,
            )),
            CriterionDef::And(items) => Ok(and_all(self.criteria(items)?)?),
            CriterionDef::Or(items) => Ok(or_all(self.criteria(items)?)?),
            CriterionDef::Not(inner) => Ok(not(self.criterion(inner)?)),
        }
    }

    fn criteria(&self, defs: &[CriterionDef]) -> Result<Vec<SqlCriterion>, CliError> {
        defs.iter().map(|def| self.criterion(def)).collect()
    }
}

fn present(json: &Json) -> Option<Value> {
    (!json.is_null()).then(|| Value::from_json(json))
}

fn condition(def: &ConditionDef) -> Result<Condition, CliError> {
    let value = present(&def.value);
    let list = || def.values.iter().filter_map(present).collect::<Vec<_>>();
    let pair = || match def.values.as_slice() {
        [first, second] => Ok((Value::from_json(first), Value::from_json(second))),
        _ => Err(CliError::InvalidDocument(format!(
            "{:?} on \"{}\" needs exactly two values",
            def.op, def.column
        ))),
    };

    let condition = match def.op {
        Operator::IsNull => is_null(),
        Operator::IsNotNull => is_not_null(),
        Operator::EqualTo => is_equal_to_when_present(value),
        Operator::NotEqualTo => is_not_equal_to_when_present(value),
        Operator::GreaterThan => is_greater_than_when_present(value),
        Operator::GreaterThanOrEqualTo => is_greater_than_or_equal_to_when_present(value),
        Operator::LessThan => is_less_than_when_present(value),
        Operator::LessThanOrEqualTo => is_less_than_or_equal_to_when_present(value),
        Operator::Like => is_like_when_present(value),
        Operator::NotLike => is_not_like_when_present(value),
        Operator::LikeCaseInsensitive => match value {
            Some(value) => is_like_case_insensitive(value),
            None => is_like_when_present(None::<Value>),
        },
        Operator::Between => {
            let (first, second) = pair()?;
            is_between(first, second)
        }
        Operator::NotBetween => {
            let (first, second) = pair()?;
            is_not_between(first, second)
        }
        Operator::In => is_in(list()),
        Operator::NotIn => is_not_in(list()),
        Operator::InCaseInsensitive => is_in_case_insensitive(list()),
        Operator::NotInCaseInsensitive => is_not_in_case_insensitive(list()),
    };
    Ok(condition)
}

/// Statement builders that accept a where tree.
trait Filterable: Sized {
    fn where_criterion(self, criterion: SqlCriterion) -> Self;
    fn and_criterion(self, criterion: SqlCriterion) -> Self;
    fn or_criterion(self, criterion: SqlCriterion) -> Self;
}

macro_rules! impl_filterable {
    ($($builder:ty),*) => {
        $(
            impl Filterable for $builder {
                fn where_criterion(self, criterion: SqlCriterion) -> Self {
                    <$builder>::where_criterion(self, criterion)
                }

                fn and_criterion(self, criterion: SqlCriterion) -> Self {
                    <$builder>::and_criterion(self, criterion)
                }

                fn or_criterion(self, criterion: SqlCriterion) -> Self {
                    <$builder>::or_criterion(self, criterion)
                }
            }
        )*
    };
}

impl_filterable!(SelectBuilder<FromState>, DeleteBuilder, UpdateBuilder);

/// Applies a where tree. A top-level `and`/`or` list is spread over the
/// statement's own where clause so it renders without outer parentheses.
fn apply_filter<B: Filterable>(
    builder: B,
    catalog: &Catalog,
    filter: Option<&CriterionDef>,
) -> Result<B, CliError> {
    let (connector, items) = match filter {
        None => return Ok(builder),
        Some(CriterionDef::And(items)) if !items.is_empty() => (Connector::And, items),
        Some(CriterionDef::Or(items)) if !items.is_empty() => (Connector::Or, items),
        Some(other) => return Ok(builder.where_criterion(catalog.criterion(other)?)),
    };

    let mut criteria = catalog.criteria(items)?.into_iter();
    let mut builder = match criteria.next() {
        Some(first) => builder.where_criterion(first),
        None => builder,
    };
    for criterion in criteria {
        builder = match connector {
            Connector::And => builder.and_criterion(criterion),
            Connector::Or => builder.or_criterion(criterion),
        };
    }
    Ok(builder)
}

/// Builds the statement model the document describes.
///
/// `strict` disallows where clauses that vanish because every condition
/// was suppressed.
pub fn to_statement(
    document: &StatementDocument,
    strict: bool,
) -> Result<Box<dyn SqlStatement>, CliError> {
    let catalog = Catalog::new(&document.tables)?;
    let configuration = if strict {
        StatementConfiguration::default().non_rendering_where_clause_allowed(false)
    } else {
        StatementConfiguration::default()
    };

    let statement: Box<dyn SqlStatement> = match &document.statement {
        StatementDef::Select(def) => Box::new(select_model(&catalog, def, configuration)?),
        StatementDef::Delete(def) => Box::new(delete_model(&catalog, def, configuration)?),
        StatementDef::Update(def) => Box::new(update_model(&catalog, def, configuration)?),
        StatementDef::Insert(def) => Box::new(insert_model(&catalog, def, configuration)?),
        StatementDef::InsertRecord(def) => record_insert_model(&catalog, def, configuration)?,
    };
    debug!("Built statement model from document with {} tables", document.tables.len());
    Ok(statement)
}

fn select_model(
    catalog: &Catalog,
    def: &SelectDef,
    configuration: StatementConfiguration,
) -> Result<dynsql::ast::select::SelectModel, CliError> {
    let columns = catalog.basic_columns(&def.columns)?;
    let started = if def.distinct {
        select_distinct(columns)
    } else {
        select(columns)
    };
    let mut builder = started.from(catalog.table(&def.from)?);

    for join in &def.joins {
        let table = catalog.table(&join.table)?;
        let criteria = join
            .on
            .iter()
            .enumerate()
            .map(|(i, (left, right))| {
                let left = catalog.column(left)?;
                let condition = is_equal_to_column(catalog.column(right)?);
                Ok(if i == 0 {
                    JoinCriterion::on(left, condition)
                } else {
                    JoinCriterion::and(left, condition)
                })
            })
            .collect::<Result<Vec<_>, CliError>>()?;
        builder = builder.join_table(join.join_type, table, None, criteria);
    }

    builder = apply_filter(builder, catalog, def.filter.as_ref())?;
    if !def.group_by.is_empty() {
        builder = builder.group_by(catalog.basic_columns(&def.group_by)?);
    }
    if !def.order_by.is_empty() {
        builder = builder.order_by(catalog.sort_specifications(&def.order_by)?);
    }
    if let Some(limit) = def.limit {
        builder = builder.limit(limit);
    }
    if let Some(offset) = def.offset {
        builder = builder.offset(offset);
    }
    if let Some(rows) = def.fetch_first {
        builder = builder.fetch_first(rows);
    }
    Ok(builder.configuration(configuration).build()?)
}

fn delete_model(
    catalog: &Catalog,
    def: &DeleteDef,
    configuration: StatementConfiguration,
) -> Result<dynsql::ast::delete::DeleteModel, CliError> {
    let mut builder = delete_from(catalog.table(&def.table)?).configuration(configuration);
    builder = apply_filter(builder, catalog, def.filter.as_ref())?;
    if !def.order_by.is_empty() {
        builder = builder.order_by(catalog.sort_specifications(&def.order_by)?);
    }
    if let Some(limit) = def.limit {
        builder = builder.limit(limit);
    }
    Ok(builder.build()?)
}

fn update_model(
    catalog: &Catalog,
    def: &UpdateDef,
    configuration: StatementConfiguration,
) -> Result<dynsql::ast::update::UpdateModel, CliError> {
    let mut builder = update(catalog.table(&def.table)?).configuration(configuration);
    for AssignmentDef {
        column,
        value,
        when_present,
    } in &def.set
    {
        let column = catalog.column(column)?;
        builder = match (present(value), when_present) {
            (Some(value), _) => builder.set(&column, value),
            (None, true) => builder.set_when_present(&column, None::<Value>),
            (None, false) => builder.set_null(&column),
        };
    }
    builder = apply_filter(builder, catalog, def.filter.as_ref())?;
    if !def.order_by.is_empty() {
        builder = builder.order_by(catalog.sort_specifications(&def.order_by)?);
    }
    if let Some(limit) = def.limit {
        builder = builder.limit(limit);
    }
    Ok(builder.build()?)
}

fn insert_model(
    catalog: &Catalog,
    def: &InsertDef,
    configuration: StatementConfiguration,
) -> Result<dynsql::ast::insert::GeneralInsertModel, CliError> {
    let mut builder = insert_into(catalog.table(&def.table)?).configuration(configuration);
    for AssignmentDef {
        column,
        value,
        when_present,
    } in &def.values
    {
        let column = catalog.column(column)?;
        builder = match (present(value), when_present) {
            (Some(value), _) => builder.set(&column, value),
            (None, true) => builder.set_when_present(&column, None::<Value>),
            (None, false) => builder.set_null(&column),
        };
    }
    Ok(builder.build()?)
}

fn record_insert_model(
    catalog: &Catalog,
    def: &InsertRecordDef,
    configuration: StatementConfiguration,
) -> Result<Box<dyn SqlStatement>, CliError> {
    let table = catalog.table(&def.table)?;
    let mut builder = match def.records {
        Some(count) => insert_multiple(table, count),
        None => insert(table),
    }
    .configuration(configuration);
    for property in &def.properties {
        builder = builder.map(&catalog.column(&property.column)?, property.property.as_str());
    }
    let statement: Box<dyn SqlStatement> = match def.records {
        Some(_) => Box::new(builder.build_multiple()?),
        None => Box::new(builder.build()?),
    };
    Ok(statement)
}

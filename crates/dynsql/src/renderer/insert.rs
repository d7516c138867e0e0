//! Renders the four insert shapes.
//!
//! Record-based inserts bind no values themselves: their placeholders name
//! record properties the caller supplies at execution time.

use tracing::debug;

use crate::{
    ast::{
        column::SqlColumn,
        insert::{
            GeneralInsertModel, InsertMapping, InsertModel, InsertSelectModel,
            MultiRowInsertModel, RecordMapping,
        },
        table::SqlTable,
    },
    config::StatementConfiguration,
    error::{DynSqlError, Result},
    renderer::{
        ParameterSequence, RenderedStatement, RenderingContext, SqlStatement,
        composer::StatementComposer,
        fragment::{FragmentAndParameters, FragmentCollector},
        select::render_select_model,
        strategy::{DEFAULT_RECORD_PREFIX, MULTI_ROW_PREFIX, RenderingStrategy},
    },
};

fn insert_composer(table: &SqlTable, configuration: &StatementConfiguration) -> StatementComposer {
    let mut composer = StatementComposer::configured(configuration);
    composer.start_of_statement = Some(FragmentAndParameters::from_fragment("insert into"));
    composer.table_fragment = Some(FragmentAndParameters::from_fragment(table.table_name()));
    composer
}

fn column_list<'c>(columns: impl IntoIterator<Item = &'c SqlColumn>) -> FragmentAndParameters {
    let names = columns
        .into_iter()
        .map(SqlColumn::name)
        .collect::<Vec<_>>()
        .join(", ");
    FragmentAndParameters::from_fragment(format!("({names})"))
}

fn quoted(constant: &str) -> String {
    format!("'{}'", constant.replace('\'', "''"))
}

fn finish(kind: &str, composer: StatementComposer) -> RenderedStatement {
    let rendered = RenderedStatement::from_fragment(composer.compose());
    debug!(
        "Rendered {kind} statement with {} parameters: {}",
        rendered.parameters().len(),
        rendered.sql()
    );
    rendered
}

impl SqlStatement for GeneralInsertModel {
    fn render(&self, strategy: &dyn RenderingStrategy) -> Result<RenderedStatement> {
        let sequence = ParameterSequence::new();
        let ctx = RenderingContext::new(&sequence, strategy);

        let mut columns = Vec::with_capacity(self.mappings.len());
        let mut values = FragmentCollector::new();
        for mapping in &self.mappings {
            let column = mapping.column();
            let value = match mapping {
                InsertMapping::Null(_) => FragmentAndParameters::from_fragment("null"),
                InsertMapping::Constant(_, constant) => {
                    FragmentAndParameters::from_fragment(constant)
                }
                InsertMapping::StringConstant(_, constant) => {
                    FragmentAndParameters::from_fragment(quoted(constant))
                }
                InsertMapping::Value(_, value) => ctx.bind(column.convert(value), Some(column)),
                InsertMapping::ValueWhenPresent(_, None) => continue,
                InsertMapping::ValueWhenPresent(_, Some(value)) => {
                    ctx.bind(column.convert(value), Some(column))
                }
            };
            columns.push(column);
            values.add(value);
        }
        if columns.is_empty() {
            return Err(DynSqlError::MissingRequiredField {
                statement: "Insert",
                field: "at least one column mapping",
            });
        }

        let mut composer = insert_composer(&self.table, &self.configuration);
        composer.add_clause(Some(column_list(columns)));
        composer.add_clause(Some(values.to_fragment_and_parameters_with(
            ", ", "values (", ")",
        )));
        Ok(finish("insert", composer))
    }
}

/// Renders one row of record placeholders, each formatted by `placeholder`.
fn render_record_row<F>(mappings: &[RecordMapping], placeholder: F) -> Result<String>
where
    F: Fn(&SqlColumn, &str) -> Result<String>,
{
    let values = mappings
        .iter()
        .map(|mapping| match mapping {
            RecordMapping::Null(_) => Ok("null".to_string()),
            RecordMapping::Constant(_, constant) => Ok(constant.clone()),
            RecordMapping::StringConstant(_, constant) => Ok(quoted(constant)),
            RecordMapping::Property(column, property) => placeholder(column, property),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(format!("({})", values.join(", ")))
}

impl SqlStatement for InsertModel {
    fn render(&self, strategy: &dyn RenderingStrategy) -> Result<RenderedStatement> {
        if self.mappings.is_empty() {
            return Err(DynSqlError::MissingRequiredField {
                statement: "Insert",
                field: "at least one column mapping",
            });
        }
        let row = render_record_row(&self.mappings, |column, property| {
            strategy.record_based_insert_binding(column, DEFAULT_RECORD_PREFIX, property)
        })?;

        let mut composer = insert_composer(&self.table, &self.configuration);
        composer.add_clause(Some(column_list(
            self.mappings.iter().map(RecordMapping::column),
        )));
        composer.add_clause(Some(FragmentAndParameters::from_fragment(format!(
            "values {row}"
        ))));
        Ok(finish("insert", composer))
    }
}

impl SqlStatement for MultiRowInsertModel {
    fn render(&self, strategy: &dyn RenderingStrategy) -> Result<RenderedStatement> {
        if self.mappings.is_empty() {
            return Err(DynSqlError::MissingRequiredField {
                statement: "Multi-row insert",
                field: "at least one column mapping",
            });
        }
        if self.record_count == 0 {
            return Err(DynSqlError::MissingRequiredField {
                statement: "Multi-row insert",
                field: "at least one record",
            });
        }
        let rows = (0..self.record_count)
            .map(|index| {
                let prefix = format!("{MULTI_ROW_PREFIX}[{index}]");
                render_record_row(&self.mappings, |column, property| {
                    strategy.multi_row_placeholder(column, &prefix, property)
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut composer = insert_composer(&self.table, &self.configuration);
        composer.add_clause(Some(column_list(
            self.mappings.iter().map(RecordMapping::column),
        )));
        composer.add_clause(Some(FragmentAndParameters::from_fragment(format!(
            "values {}",
            rows.join(", ")
        ))));
        Ok(finish("multi-row insert", composer))
    }
}

impl SqlStatement for InsertSelectModel {
    fn render(&self, strategy: &dyn RenderingStrategy) -> Result<RenderedStatement> {
        let sequence = ParameterSequence::new();
        let ctx = RenderingContext::new(&sequence, strategy);

        let mut composer = insert_composer(&self.table, &self.configuration);
        if let Some(columns) = &self.columns {
            composer.add_clause(Some(column_list(columns)));
        }
        composer.add_clause(Some(render_select_model(&self.select, &ctx)?));
        Ok(finish("insert select", composer))
    }
}

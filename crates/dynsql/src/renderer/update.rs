use tracing::{debug, warn};

use crate::{
    ast::update::{UpdateMapping, UpdateModel},
    error::{DynSqlError, Result},
    renderer::{
        ParameterSequence, Render, RenderedStatement, RenderingContext, SqlStatement,
        composer::{StatementComposer, single_table_context},
        criterion::render_where_clause,
        fragment::{FragmentAndParameters, FragmentCollector},
        select::{bound_clause, render_select_model},
        strategy::RenderingStrategy,
    },
};

impl SqlStatement for UpdateModel {
    fn render(&self, strategy: &dyn RenderingStrategy) -> Result<RenderedStatement> {
        let sequence = ParameterSequence::new();
        let root = RenderingContext::new(&sequence, strategy);
        let ctx = single_table_context(&root, &self.table, self.table_alias.as_deref());

        let mut composer = StatementComposer::configured(&self.configuration);
        composer.start_of_statement = Some(FragmentAndParameters::from_fragment("update"));
        composer.table_fragment = Some(FragmentAndParameters::from_fragment(
            ctx.aliased_table_name(&self.table),
        ));

        let mut assignments = FragmentCollector::new();
        for mapping in &self.mappings {
            assignments.add_if_some(render_set_phrase(mapping, &ctx)?);
        }
        if assignments.is_empty() {
            return Err(DynSqlError::MissingRequiredField {
                statement: "Update",
                field: "at least one set mapping",
            });
        }
        composer.add_clause(Some(
            assignments.to_fragment_and_parameters_with(", ", "set ", ""),
        ));

        if let Some(where_model) = &self.where_model {
            let clause = render_where_clause(where_model, "where", &ctx)?;
            if clause.is_none() {
                warn!(
                    "Where clause did not render; update {} affects every row",
                    self.table.table_name()
                );
            }
            composer.add_clause(clause);
        }
        if let Some(order_by) = &self.order_by {
            composer.add_clause(Some(order_by.render(&ctx)?));
        }
        if let Some(limit) = self.limit {
            composer.add_clause(Some(bound_clause("limit", limit, "", &ctx)));
        }

        let rendered = RenderedStatement::from_fragment(composer.compose());
        debug!(
            "Rendered update statement with {} parameters: {}",
            rendered.parameters().len(),
            rendered.sql()
        );
        Ok(rendered)
    }
}

/// `column = value`, or `None` for an absent optional value.
fn render_set_phrase(
    mapping: &UpdateMapping,
    ctx: &RenderingContext<'_>,
) -> Result<Option<FragmentAndParameters>> {
    let column = mapping.column();
    let right = match mapping {
        UpdateMapping::Null(_) => FragmentAndParameters::from_fragment("null"),
        UpdateMapping::Constant(_, constant) => FragmentAndParameters::from_fragment(constant),
        UpdateMapping::StringConstant(_, constant) => FragmentAndParameters::from_fragment(
            format!("'{}'", constant.replace('\'', "''")),
        ),
        UpdateMapping::Value(_, value) => ctx.bind(column.convert(value), Some(column)),
        UpdateMapping::ValueWhenPresent(_, None) => return Ok(None),
        UpdateMapping::ValueWhenPresent(_, Some(value)) => {
            ctx.bind(column.convert(value), Some(column))
        }
        UpdateMapping::Column(_, other) => other.render(ctx)?,
        UpdateMapping::Select(_, select) => {
            render_select_model(select, ctx)?.map_fragment(|sub| format!("({sub})"))
        }
    };
    let left = ctx.aliased_column_name(column);
    Ok(Some(right.map_fragment(|text| format!("{left} = {text}"))))
}

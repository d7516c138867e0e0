//! Renders select statements, query expressions and their clauses.

use std::rc::Rc;

use model::core::value::Value;
use tracing::{debug, trace};

use crate::{
    ast::select::{
        GroupByModel, JoinModel, JoinSpecification, OrderByModel, PagingModel,
        QueryExpressionModel, SelectModel, TableExpression,
    },
    config::StatementConfiguration,
    error::{DynSqlError, Result},
    renderer::{
        ParameterSequence, Render, RenderedStatement, RenderingContext, SqlStatement,
        alias::{
            ExplicitTableAliasCalculator, GuaranteedTableAliasCalculator, TableAliasCalculator,
            TableAliasCalculatorWithParent,
        },
        column::render_select_item,
        composer::StatementComposer,
        condition::render_column_and_condition,
        criterion::render_where_clause,
        fragment::{FragmentAndParameters, FragmentCollector},
        strategy::RenderingStrategy,
    },
};

impl SqlStatement for SelectModel {
    fn render(&self, strategy: &dyn RenderingStrategy) -> Result<RenderedStatement> {
        let sequence = ParameterSequence::new();
        let ctx = RenderingContext::new(&sequence, strategy);

        let mut composer = StatementComposer {
            initial_fragment: self
                .configuration
                .sql_before_statement()
                .map(FragmentAndParameters::from_fragment),
            final_fragment: self
                .configuration
                .sql_after_statement()
                .map(FragmentAndParameters::from_fragment),
            ..StatementComposer::default()
        };
        composer
            .clauses
            .push(render_select(self, &ctx, Some(&self.configuration))?);

        let rendered = RenderedStatement::from_fragment(composer.compose());
        debug!(
            "Rendered select statement with {} parameters: {}",
            rendered.parameters().len(),
            rendered.sql()
        );
        Ok(rendered)
    }
}

/// Renders a nested select within the caller's context so parameter
/// numbering and outer table aliases carry through.
pub(crate) fn render_select_model(
    model: &SelectModel,
    ctx: &RenderingContext<'_>,
) -> Result<FragmentAndParameters> {
    render_select(model, ctx, None)
}

fn render_select(
    model: &SelectModel,
    ctx: &RenderingContext<'_>,
    hooks: Option<&StatementConfiguration>,
) -> Result<FragmentAndParameters> {
    let mut collector = FragmentCollector::new();
    for (i, query_expression) in model.query_expressions.iter().enumerate() {
        let hooks = if i == 0 { hooks } else { None };
        collector.add(render_query_expression(query_expression, ctx, hooks)?);
    }
    if let Some(order_by) = &model.order_by {
        collector.add(order_by.render(ctx)?);
    }
    if let Some(paging) = &model.paging {
        collector.add_if_some(render_paging(paging, ctx));
    }
    if let Some(for_clause) = &model.for_clause {
        collector.add_text(for_clause.clone());
    }
    Ok(collector.to_fragment_and_parameters(" "))
}

/// Picks the alias calculator for one query expression, scoped under the
/// calculator of the enclosing context.
///
/// Joins without sub-queries get guaranteed aliases; everything else uses
/// explicit aliases only.
fn table_alias_calculator_for(
    model: &QueryExpressionModel,
    ctx: &RenderingContext<'_>,
) -> Rc<dyn TableAliasCalculator> {
    let child: Rc<dyn TableAliasCalculator> =
        if model.join.is_some() && !model.contains_sub_queries() {
            trace!("Using guaranteed table aliases for joined query expression");
            Rc::new(GuaranteedTableAliasCalculator::new(
                model.table_aliases.clone(),
            ))
        } else {
            Rc::new(ExplicitTableAliasCalculator::new(
                model.table_aliases.clone(),
            ))
        };
    Rc::new(TableAliasCalculatorWithParent::new(
        ctx.table_alias_calculator(),
        child,
    ))
}

fn render_query_expression(
    model: &QueryExpressionModel,
    parent: &RenderingContext<'_>,
    hooks: Option<&StatementConfiguration>,
) -> Result<FragmentAndParameters> {
    let ctx = parent.with_table_alias_calculator(table_alias_calculator_for(model, parent));
    let mut collector = FragmentCollector::new();

    let mut start = String::new();
    if let Some(connector) = &model.connector {
        start.push_str(connector);
        start.push(' ');
    }
    start.push_str("select ");
    if let Some(after_keyword) = hooks.and_then(StatementConfiguration::sql_after_keyword) {
        start.push_str(after_keyword);
        start.push(' ');
    }
    if model.distinct {
        start.push_str("distinct ");
    }
    let columns = model
        .columns
        .iter()
        .map(|column| render_select_item(column, &ctx))
        .collect::<Result<FragmentCollector>>()?;
    collector.add(columns.to_fragment_and_parameters_with(", ", &start, ""));

    collector.add(
        model
            .table
            .render(&ctx)?
            .map_fragment(|table| format!("from {table}")),
    );
    if let Some(after_table) = hooks.and_then(StatementConfiguration::sql_after_table) {
        collector.add_text(after_table);
    }
    if let Some(join) = &model.join {
        collector.add(join.render(&ctx)?);
    }
    if let Some(where_model) = &model.where_model {
        collector.add_if_some(render_where_clause(where_model, "where", &ctx)?);
    }
    if let Some(group_by) = &model.group_by {
        collector.add(group_by.render(&ctx)?);
    }
    if let Some(having) = &model.having {
        collector.add_if_some(render_where_clause(having, "having", &ctx)?);
    }
    Ok(collector.to_fragment_and_parameters(" "))
}

impl Render for TableExpression {
    fn render(&self, ctx: &RenderingContext<'_>) -> Result<FragmentAndParameters> {
        match self {
            TableExpression::Table(table) => Ok(FragmentAndParameters::from_fragment(
                ctx.aliased_table_name(table),
            )),
            TableExpression::SubQuery { select, alias } => {
                let sub = render_select_model(select, ctx)?;
                Ok(sub.map_fragment(|text| match alias {
                    Some(alias) => format!("({text}) {alias}"),
                    None => format!("({text})"),
                }))
            }
        }
    }
}

impl Render for JoinModel {
    fn render(&self, ctx: &RenderingContext<'_>) -> Result<FragmentAndParameters> {
        self.specifications()
            .iter()
            .map(|specification| render_join_specification(specification, ctx))
            .collect::<Result<FragmentCollector>>()
            .map(|collector| collector.to_fragment_and_parameters(" "))
    }
}

fn render_join_specification(
    specification: &JoinSpecification,
    ctx: &RenderingContext<'_>,
) -> Result<FragmentAndParameters> {
    let mut collector = FragmentCollector::new();
    let table = specification.table().render(ctx)?;
    collector.add(table.map_fragment(|text| {
        format!("{} {text}", specification.join_type().keyword())
    }));

    let mut rendered_criteria = 0;
    for criterion in specification.criteria() {
        let Some(rendered) = render_column_and_condition(&criterion.left, &criterion.condition, ctx)?
        else {
            continue;
        };
        let connector = if rendered_criteria == 0 {
            "on"
        } else {
            criterion.connector
        };
        collector.add(rendered.map_fragment(|text| format!("{connector} {text}")));
        rendered_criteria += 1;
    }
    if rendered_criteria == 0 {
        return Err(DynSqlError::EmptyStructure {
            structure: "Join criteria",
        });
    }
    Ok(collector.to_fragment_and_parameters(" "))
}

impl Render for GroupByModel {
    fn render(&self, ctx: &RenderingContext<'_>) -> Result<FragmentAndParameters> {
        let collector = self
            .columns()
            .iter()
            .map(|column| column.render(ctx))
            .collect::<Result<FragmentCollector>>()?;
        Ok(collector.to_fragment_and_parameters_with(", ", "group by ", ""))
    }
}

impl Render for OrderByModel {
    fn render(&self, _ctx: &RenderingContext<'_>) -> Result<FragmentAndParameters> {
        let columns = self
            .columns()
            .iter()
            .map(|spec| spec.render())
            .collect::<Vec<_>>()
            .join(", ");
        Ok(FragmentAndParameters::from_fragment(format!(
            "order by {columns}"
        )))
    }
}

/// `None` for a limit/offset model with neither value set.
pub(crate) fn render_paging(
    paging: &PagingModel,
    ctx: &RenderingContext<'_>,
) -> Option<FragmentAndParameters> {
    let mut collector = FragmentCollector::new();
    match paging {
        PagingModel::LimitOffset { limit, offset } => {
            if let Some(limit) = limit {
                collector.add(bound_clause("limit", *limit, "", ctx));
            }
            if let Some(offset) = offset {
                collector.add(bound_clause("offset", *offset, "", ctx));
            }
        }
        PagingModel::FetchFirst {
            offset,
            fetch_first_rows,
        } => {
            if let Some(offset) = offset {
                collector.add(bound_clause("offset", *offset, " rows", ctx));
            }
            collector.add(bound_clause(
                "fetch first",
                *fetch_first_rows,
                " rows only",
                ctx,
            ));
        }
    }
    (!collector.is_empty()).then(|| collector.to_fragment_and_parameters(" "))
}

/// `keyword <placeholder>suffix` with the number bound as a parameter.
pub(crate) fn bound_clause(
    keyword: &str,
    value: u64,
    suffix: &str,
    ctx: &RenderingContext<'_>,
) -> FragmentAndParameters {
    ctx.bind(Value::from(value), None)
        .map_fragment(|placeholder| format!("{keyword} {placeholder}{suffix}"))
}

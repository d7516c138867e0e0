//! Renders a column paired with a condition.

use model::core::value::Value;

use crate::{
    ast::{
        column::{BasicColumn, SqlColumn},
        condition::{Condition, ConditionKind},
    },
    error::Result,
    renderer::{
        Render, RenderingContext,
        fragment::{FragmentAndParameters, FragmentCollector},
        select::render_select_model,
    },
};

/// `None` when the condition does not render.
pub(crate) fn render_column_and_condition(
    column: &BasicColumn,
    condition: &Condition,
    ctx: &RenderingContext<'_>,
) -> Result<Option<FragmentAndParameters>> {
    if !condition.should_render() {
        return Ok(None);
    }
    let Some(right) = render_condition(condition, column.bindable(), ctx)? else {
        return Ok(None);
    };

    let mut left = column.render(ctx)?;
    if condition.is_case_insensitive() {
        left = left.map_fragment(|text| format!("upper({text})"));
    }

    let mut collector = FragmentCollector::new();
    collector.add(left);
    collector.add(right);
    Ok(Some(collector.to_fragment_and_parameters(" ")))
}

/// Renders the operator and right-hand side of a condition.
fn render_condition(
    condition: &Condition,
    column: Option<&SqlColumn>,
    ctx: &RenderingContext<'_>,
) -> Result<Option<FragmentAndParameters>> {
    let rendered = match condition.kind() {
        ConditionKind::NoValue { operator } => FragmentAndParameters::from_fragment(operator),
        ConditionKind::SingleValue { operator, value } => {
            let Some(value) = value else {
                return Ok(None);
            };
            bind(value, column, ctx).map_fragment(|placeholder| format!("{operator} {placeholder}"))
        }
        ConditionKind::TwoValue {
            operator1,
            operator2,
            values,
        } => {
            let Some((value1, value2)) = values else {
                return Ok(None);
            };
            let mut collector = FragmentCollector::new();
            collector.add_text(operator1.clone());
            collector.add(bind(value1, column, ctx));
            collector.add_text(operator2.clone());
            collector.add(bind(value2, column, ctx));
            collector.to_fragment_and_parameters(" ")
        }
        ConditionKind::ListValue { operator, values } => {
            if values.is_empty() {
                return Ok(None);
            }
            values
                .iter()
                .map(|value| bind(value, column, ctx))
                .collect::<FragmentCollector>()
                .to_fragment_and_parameters_with(",", &format!("{operator} ("), ")")
        }
        ConditionKind::Subselect { operator, select } => render_select_model(select, ctx)?
            .map_fragment(|sub| format!("{operator} ({sub})")),
        ConditionKind::ColumnComparison { operator, column } => column
            .render(ctx)?
            .map_fragment(|right| format!("{operator} {right}")),
    };
    Ok(Some(rendered))
}

fn bind(
    value: &Value,
    column: Option<&SqlColumn>,
    ctx: &RenderingContext<'_>,
) -> FragmentAndParameters {
    let converted = match column {
        Some(column) => column.convert(value),
        None => value.clone(),
    };
    ctx.bind(converted, column)
}

use crate::{
    ast::column::BasicColumn,
    error::Result,
    renderer::{Render, RenderingContext, fragment::FragmentAndParameters},
};

impl Render for BasicColumn {
    /// Renders the expression without its select-list alias.
    fn render(&self, ctx: &RenderingContext<'_>) -> Result<FragmentAndParameters> {
        match self {
            BasicColumn::Column(column) => Ok(FragmentAndParameters::from_fragment(
                ctx.aliased_column_name(column),
            )),
            BasicColumn::Function(function, argument) => Ok(argument
                .render(ctx)?
                .map_fragment(|inner| function.wrap(&inner))),
            BasicColumn::CountAll => Ok(FragmentAndParameters::from_fragment("count(*)")),
            BasicColumn::Constant(constant) => Ok(FragmentAndParameters::from_fragment(constant)),
            BasicColumn::StringConstant(constant) => Ok(FragmentAndParameters::from_fragment(
                format!("'{}'", constant.replace('\'', "''")),
            )),
            BasicColumn::Bound(value) => Ok(ctx.bind(value.clone(), None)),
            BasicColumn::Aliased(inner, _) => inner.render(ctx),
        }
    }
}

/// Renders a select-list entry, appending `as alias` when one is set.
pub(crate) fn render_select_item(
    column: &BasicColumn,
    ctx: &RenderingContext<'_>,
) -> Result<FragmentAndParameters> {
    let rendered = column.render(ctx)?;
    Ok(match column.select_alias() {
        Some(alias) => rendered.map_fragment(|text| format!("{text} as {alias}")),
        None => rendered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{column::Function, table::{SqlTable, TableAliases}},
        renderer::{ParameterSequence, alias::ExplicitTableAliasCalculator, strategy::RenderingStrategies},
    };
    use model::core::value::Value;
    use std::rc::Rc;

    #[test]
    fn renders_functions_and_constants() {
        let seq = ParameterSequence::new();
        let ctx = RenderingContext::new(&seq, RenderingStrategies::spring_named_parameter());
        let person = SqlTable::new("Person");
        let id = BasicColumn::from(person.column("id"));

        let max = BasicColumn::Function(Function::Max, Box::new(id.clone()));
        assert_eq!(max.render(&ctx).unwrap().fragment(), "max(id)");

        let distinct = BasicColumn::Function(Function::CountDistinct, Box::new(id));
        assert_eq!(distinct.render(&ctx).unwrap().fragment(), "count(distinct id)");

        let quoted = BasicColumn::StringConstant("it's".into());
        assert_eq!(quoted.render(&ctx).unwrap().fragment(), "'it''s'");

        let bound = BasicColumn::Bound(Value::Int(3));
        let rendered = bound.render(&ctx).unwrap();
        assert_eq!(rendered.fragment(), ":p1");
        assert_eq!(rendered.parameters().get("p1"), Some(&Value::Int(3)));
    }

    #[test]
    fn select_items_carry_aliases_and_qualifiers() {
        let seq = ParameterSequence::new();
        let person = SqlTable::new("Person");
        let ctx = RenderingContext::new(&seq, RenderingStrategies::mybatis3())
            .with_table_alias_calculator(Rc::new(ExplicitTableAliasCalculator::new(
                TableAliases::of(&person, "p"),
            )));

        let column = BasicColumn::from(person.column("first_name").as_alias("fn"));
        assert_eq!(
            render_select_item(&column, &ctx).unwrap().fragment(),
            "p.first_name as fn"
        );

        let count = BasicColumn::CountAll.alias("total").unwrap();
        assert_eq!(render_select_item(&count, &ctx).unwrap().fragment(), "count(*) as total");
        assert_eq!(
            BasicColumn::from(person.all_columns()).render(&ctx).unwrap().fragment(),
            "p.*"
        );
    }
}

use tracing::{debug, warn};

use crate::{
    ast::delete::DeleteModel,
    error::Result,
    renderer::{
        ParameterSequence, Render, RenderedStatement, RenderingContext, SqlStatement,
        composer::{StatementComposer, single_table_context},
        criterion::render_where_clause,
        fragment::FragmentAndParameters,
        select::bound_clause,
        strategy::RenderingStrategy,
    },
};

impl SqlStatement for DeleteModel {
    fn render(&self, strategy: &dyn RenderingStrategy) -> Result<RenderedStatement> {
        let sequence = ParameterSequence::new();
        let root = RenderingContext::new(&sequence, strategy);
        let ctx = single_table_context(&root, &self.table, self.table_alias.as_deref());

        let mut composer = StatementComposer::configured(&self.configuration);
        composer.start_of_statement = Some(FragmentAndParameters::from_fragment("delete from"));
        composer.table_fragment = Some(FragmentAndParameters::from_fragment(
            ctx.aliased_table_name(&self.table),
        ));

        if let Some(where_model) = &self.where_model {
            let clause = render_where_clause(where_model, "where", &ctx)?;
            if clause.is_none() {
                warn!(
                    "Where clause did not render; delete from {} affects every row",
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
            "Rendered delete statement with {} parameters: {}",
            rendered.parameters().len(),
            rendered.sql()
        );
        Ok(rendered)
    }
}

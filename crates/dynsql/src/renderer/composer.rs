use std::rc::Rc;

use crate::{
    ast::table::{SqlTable, TableAliases},
    config::StatementConfiguration,
    renderer::{
        RenderingContext,
        alias::ExplicitTableAliasCalculator,
        fragment::{FragmentAndParameters, FragmentCollector},
    },
};

/// Fixed slots of a statement, joined with single spaces in slot order.
/// Empty slots are skipped.
#[derive(Debug, Default)]
pub struct StatementComposer {
    pub initial_fragment: Option<FragmentAndParameters>,
    pub start_of_statement: Option<FragmentAndParameters>,
    pub fragment_before_table: Option<FragmentAndParameters>,
    pub table_fragment: Option<FragmentAndParameters>,
    pub fragment_after_table: Option<FragmentAndParameters>,
    pub clauses: Vec<FragmentAndParameters>,
    pub final_fragment: Option<FragmentAndParameters>,
}

impl StatementComposer {
    /// Seeds the hook slots from the statement configuration.
    pub fn configured(config: &StatementConfiguration) -> Self {
        Self {
            initial_fragment: config
                .sql_before_statement()
                .map(FragmentAndParameters::from_fragment),
            fragment_before_table: config
                .sql_after_keyword()
                .map(FragmentAndParameters::from_fragment),
            fragment_after_table: config
                .sql_after_table()
                .map(FragmentAndParameters::from_fragment),
            final_fragment: config
                .sql_after_statement()
                .map(FragmentAndParameters::from_fragment),
            ..Self::default()
        }
    }

    pub fn add_clause(&mut self, clause: Option<FragmentAndParameters>) {
        if let Some(clause) = clause {
            self.clauses.push(clause);
        }
    }

    pub fn compose(self) -> FragmentAndParameters {
        let mut collector = FragmentCollector::new();
        collector.add_if_some(self.initial_fragment);
        collector.add_if_some(self.start_of_statement);
        collector.add_if_some(self.fragment_before_table);
        collector.add_if_some(self.table_fragment);
        collector.add_if_some(self.fragment_after_table);
        for clause in self.clauses {
            collector.add(clause);
        }
        collector.add_if_some(self.final_fragment);
        collector.to_fragment_and_parameters(" ")
    }
}

/// Context for a single-table statement. The statement's alias wins over
/// an alias the table instance carries.
pub(crate) fn single_table_context<'a>(
    ctx: &RenderingContext<'a>,
    table: &SqlTable,
    alias: Option<&str>,
) -> RenderingContext<'a> {
    let aliases = match alias.or_else(|| table.alias()) {
        Some(alias) => TableAliases::of(table, alias),
        None => TableAliases::new(),
    };
    ctx.with_table_alias_calculator(Rc::new(ExplicitTableAliasCalculator::new(aliases)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GlobalConfiguration;

    #[test]
    fn composes_hooks_in_slot_order() {
        let config = StatementConfiguration::from_global(&GlobalConfiguration::default())
            .with_sql_before_statement("/* before */")
            .with_sql_after_keyword("/* keyword */")
            .with_sql_after_table("/* table */")
            .with_sql_after_statement("/* after */");
        let mut composer = StatementComposer::configured(&config);
        composer.start_of_statement = Some(FragmentAndParameters::from_fragment("delete from"));
        composer.table_fragment = Some(FragmentAndParameters::from_fragment("Person"));
        composer.add_clause(None);
        composer.add_clause(Some(FragmentAndParameters::from_fragment("where id = ?")));

        assert_eq!(
            composer.compose().fragment(),
            "/* before */ delete from /* keyword */ Person /* table */ where id = ? /* after */"
        );
    }
}

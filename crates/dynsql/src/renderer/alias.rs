//! Table alias resolution for one query scope.

use std::rc::Rc;

use crate::ast::table::{SqlTable, TableAliases};

/// Resolves the alias, if any, printed for a table reference.
pub trait TableAliasCalculator {
    /// Qualifier used in front of column names.
    fn alias_for_column(&self, table: &SqlTable) -> Option<String>;

    /// Alias printed after the table name in `from`/`join` clauses.
    fn alias_for_table(&self, table: &SqlTable) -> Option<String>;
}

/// Uses only aliases the caller assigned.
#[derive(Debug, Clone, Default)]
pub struct ExplicitTableAliasCalculator {
    aliases: TableAliases,
}

impl ExplicitTableAliasCalculator {
    pub fn new(aliases: TableAliases) -> Self {
        Self { aliases }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl TableAliasCalculator for ExplicitTableAliasCalculator {
    fn alias_for_column(&self, table: &SqlTable) -> Option<String> {
        self.aliases.get(table).map(str::to_string)
    }

    fn alias_for_table(&self, table: &SqlTable) -> Option<String> {
        self.aliases.get(table).map(str::to_string)
    }
}

/// Qualifies every column, falling back to the table name for tables the
/// caller did not alias. Table references keep explicit aliases only.
#[derive(Debug, Clone, Default)]
pub struct GuaranteedTableAliasCalculator {
    explicit: ExplicitTableAliasCalculator,
}

impl GuaranteedTableAliasCalculator {
    pub fn new(aliases: TableAliases) -> Self {
        Self {
            explicit: ExplicitTableAliasCalculator::new(aliases),
        }
    }
}

impl TableAliasCalculator for GuaranteedTableAliasCalculator {
    fn alias_for_column(&self, table: &SqlTable) -> Option<String> {
        self.explicit
            .alias_for_column(table)
            .or_else(|| Some(table.table_name()))
    }

    fn alias_for_table(&self, table: &SqlTable) -> Option<String> {
        self.explicit.alias_for_table(table)
    }
}

/// A nested scope that falls back to its enclosing scope, so correlated
/// sub-queries can reference outer aliases.
pub struct TableAliasCalculatorWithParent {
    parent: Rc<dyn TableAliasCalculator>,
    child: Rc<dyn TableAliasCalculator>,
}

impl TableAliasCalculatorWithParent {
    pub fn new(parent: Rc<dyn TableAliasCalculator>, child: Rc<dyn TableAliasCalculator>) -> Self {
        Self { parent, child }
    }
}

impl TableAliasCalculator for TableAliasCalculatorWithParent {
    fn alias_for_column(&self, table: &SqlTable) -> Option<String> {
        self.child
            .alias_for_column(table)
            .or_else(|| self.parent.alias_for_column(table))
    }

    fn alias_for_table(&self, table: &SqlTable) -> Option<String> {
        self.child
            .alias_for_table(table)
            .or_else(|| self.parent.alias_for_table(table))
    }
}

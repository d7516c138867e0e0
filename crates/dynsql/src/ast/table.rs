use std::{fmt, hash::Hash, sync::Arc};

use model::core::jdbc_type::JdbcType;

use crate::{
    ast::column::SqlColumn,
    error::{DynSqlError, Result},
};

/// A table reference.
///
/// Identity is by instance: two tables created with the same name are
/// distinct entities, clones of one table are the same entity. A self-join
/// therefore needs a second instance, see [`SqlTable::with_alias`].
#[derive(Clone)]
pub struct SqlTable {
    inner: Arc<TableInner>,
}

struct TableInner {
    schema: Option<String>,
    name: String,
    alias: Option<String>,
}

impl SqlTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self::build(None, name.into(), None)
    }

    pub fn with_schema(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self::build(Some(schema.into()), name.into(), None)
    }

    fn build(schema: Option<String>, name: String, alias: Option<String>) -> Self {
        Self {
            inner: Arc::new(TableInner {
                schema,
                name,
                alias,
            }),
        }
    }

    /// A new, distinct table instance over the same name carrying its own alias.
    pub fn with_alias(&self, alias: impl Into<String>) -> SqlTable {
        Self::build(
            self.inner.schema.clone(),
            self.inner.name.clone(),
            Some(alias.into()),
        )
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn schema(&self) -> Option<&str> {
        self.inner.schema.as_deref()
    }

    pub fn alias(&self) -> Option<&str> {
        self.inner.alias.as_deref()
    }

    /// The name as it appears in SQL, schema-qualified when a schema is set.
    pub fn table_name(&self) -> String {
        match &self.inner.schema {
            Some(schema) => format!("{schema}.{}", self.inner.name),
            None => self.inner.name.clone(),
        }
    }

    pub fn column(&self, name: impl Into<String>) -> SqlColumn {
        SqlColumn::new(self.clone(), name)
    }

    pub fn typed_column(&self, name: impl Into<String>, jdbc_type: JdbcType) -> SqlColumn {
        SqlColumn::new(self.clone(), name).with_jdbc_type(jdbc_type)
    }

    /// The `*` pseudo-column, rendered as `alias.*` when the table is aliased.
    pub fn all_columns(&self) -> SqlColumn {
        SqlColumn::new(self.clone(), "*")
    }

    pub fn same(&self, other: &SqlTable) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for SqlTable {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for SqlTable {}

impl Hash for SqlTable {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.inner).hash(state);
    }
}

impl fmt::Debug for SqlTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlTable")
            .field("name", &self.table_name())
            .field("alias", &self.inner.alias)
            .finish()
    }
}

/// Explicit table aliases of one query scope.
///
/// A table maps to at most one alias, and an alias names at most one table.
#[derive(Debug, Clone, Default)]
pub struct TableAliases {
    entries: Vec<(SqlTable, String)>,
}

impl TableAliases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(table: &SqlTable, alias: impl Into<String>) -> Self {
        Self {
            entries: vec![(table.clone(), alias.into())],
        }
    }

    /// Registers an alias. Re-registering the same pair is a no-op.
    pub fn insert(&mut self, table: &SqlTable, alias: impl Into<String>) -> Result<()> {
        let alias = alias.into();
        if let Some(existing) = self.get(table) {
            if existing == alias {
                return Ok(());
            }
            return Err(DynSqlError::DuplicateAlias {
                table: table.table_name(),
                existing: existing.to_string(),
                requested: alias,
            });
        }
        if let Some((other, _)) = self.entries.iter().find(|(_, a)| *a == alias) {
            return Err(DynSqlError::AliasInUse {
                alias,
                table: table.table_name(),
                other_table: other.table_name(),
            });
        }
        self.entries.push((table.clone(), alias));
        Ok(())
    }

    /// Registers the alias a table instance carries itself, if any.
    pub fn insert_intrinsic(&mut self, table: &SqlTable) -> Result<()> {
        match table.alias() {
            Some(alias) => self.insert(table, alias.to_string()),
            None => Ok(()),
        }
    }

    pub fn get(&self, table: &SqlTable) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t.same(table))
            .map(|(_, alias)| alias.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
